//! # CRD Validation Tests
//!
//! Deserializes sample manifests to catch schema drift early.

use dvls_secret_controller::crd::{ConditionStatus, DvlsSecret};
use kube::core::CustomResourceExt;

#[test]
fn test_minimal_dvls_secret() {
    let yaml = r#"
apiVersion: dvls.devolutions.com/v1alpha1
kind: DvlsSecret
metadata:
  name: database-credentials
  namespace: default
spec:
  vaultId: 00000000-0000-0000-0000-000000000001
  entryId: 00000000-0000-0000-0000-000000000002
"#;

    let resource: DvlsSecret =
        serde_yaml::from_str(yaml).expect("Should deserialize minimal DvlsSecret");

    assert_eq!(resource.spec.vault_id, "00000000-0000-0000-0000-000000000001");
    assert_eq!(resource.spec.entry_id, "00000000-0000-0000-0000-000000000002");
    assert!(resource.status.is_none());
}

#[test]
fn test_dvls_secret_with_status() {
    let yaml = r#"
apiVersion: dvls.devolutions.com/v1alpha1
kind: DvlsSecret
metadata:
  name: database-credentials
  namespace: apps
spec:
  vaultId: vault
  entryId: entry
status:
  entryModifiedDate: "2024-01-15T10:00:00Z"
  conditions:
    - type: Available
      status: "True"
      reason: Reconciling
      message: Secret is in sync with the DVLS entry
      lastTransitionTime: "2024-01-15T10:00:05Z"
    - type: Degraded
      status: "False"
"#;

    let resource: DvlsSecret =
        serde_yaml::from_str(yaml).expect("Should deserialize DvlsSecret with status");
    let status = resource.status.expect("status should be present");

    assert!(status.is_initialized());
    assert_eq!(
        status.last_synced().map(|t| t.to_rfc3339()),
        Some("2024-01-15T10:00:00+00:00".to_string())
    );

    let available = status.condition("Available").unwrap();
    assert_eq!(available.status, ConditionStatus::True);
    assert_eq!(available.reason.as_deref(), Some("Reconciling"));
    assert_eq!(
        status.condition("Degraded").unwrap().status,
        ConditionStatus::False
    );
}

#[test]
fn test_zero_entry_modified_date_is_never_synced() {
    let yaml = r#"
apiVersion: dvls.devolutions.com/v1alpha1
kind: DvlsSecret
metadata:
  name: pending
spec:
  vaultId: vault
  entryId: entry
status:
  entryModifiedDate: "0001-01-01T00:00:00Z"
  conditions:
    - type: Available
      status: Unknown
"#;

    let resource: DvlsSecret = serde_yaml::from_str(yaml).unwrap();
    let status = resource.status.unwrap();

    assert!(status.is_initialized());
    assert!(status.last_synced().is_none());
}

#[test]
fn test_missing_entry_id_is_rejected() {
    let yaml = r#"
apiVersion: dvls.devolutions.com/v1alpha1
kind: DvlsSecret
metadata:
  name: broken
spec:
  vaultId: vault
"#;

    assert!(serde_yaml::from_str::<DvlsSecret>(yaml).is_err());
}

#[test]
fn test_unknown_condition_status_is_rejected() {
    let yaml = r#"
apiVersion: dvls.devolutions.com/v1alpha1
kind: DvlsSecret
metadata:
  name: broken
spec:
  vaultId: vault
  entryId: entry
status:
  conditions:
    - type: Available
      status: Maybe
"#;

    assert!(serde_yaml::from_str::<DvlsSecret>(yaml).is_err());
}

#[test]
fn test_generated_crd_shape() {
    let crd = DvlsSecret::crd();

    assert_eq!(crd.spec.group, "dvls.devolutions.com");
    assert_eq!(crd.spec.names.kind, "DvlsSecret");
    assert_eq!(crd.spec.names.plural, "dvlssecrets");
    assert_eq!(crd.spec.scope, "Namespaced");
    assert_eq!(
        crd.spec.names.short_names.as_deref(),
        Some(&["dvlss".to_string()][..])
    );

    let version = &crd.spec.versions[0];
    assert_eq!(version.name, "v1alpha1");
    assert!(version
        .subresources
        .as_ref()
        .and_then(|s| s.status.as_ref())
        .is_some());
}

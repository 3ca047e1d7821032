//! # DvlsSecret Spec
//!
//! Main CRD specification type.

use serde::{Deserialize, Serialize};

/// DvlsSecret Custom Resource Definition
///
/// Declares that the DVLS entry `entryId` stored in vault `vaultId` must be
/// mirrored into a Kubernetes Secret with the same name and namespace as this
/// resource.
///
/// # Example
///
/// ```yaml
/// apiVersion: dvls.devolutions.com/v1alpha1
/// kind: DvlsSecret
/// metadata:
///   name: database-credentials
///   namespace: default
/// spec:
///   vaultId: 00000000-0000-0000-0000-000000000001
///   entryId: 00000000-0000-0000-0000-000000000002
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "DvlsSecret",
    group = "dvls.devolutions.com",
    version = "v1alpha1",
    namespaced,
    status = "crate::crd::DvlsSecretStatus",
    shortname = "dvlss",
    printcolumn = r#"{"name":"Available", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Available\")].status"}, {"name":"Degraded", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Degraded\")].status"}, {"name":"Entry Modified", "type":"string", "jsonPath":".status.entryModifiedDate"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DvlsSecretSpec {
    /// Entry ID on DVLS
    pub entry_id: String,
    /// Vault ID on DVLS
    pub vault_id: String,
}

impl DvlsSecret {
    /// `namespace/name` key used for logs and per-resource backoff
    #[must_use]
    pub fn resource_key(&self) -> String {
        format!(
            "{}/{}",
            self.metadata.namespace.as_deref().unwrap_or("default"),
            self.metadata.name.as_deref().unwrap_or_default()
        )
    }
}

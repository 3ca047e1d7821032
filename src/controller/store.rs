//! # Cluster Store
//!
//! Control-plane operations used by the reconciler, behind the
//! [`ClusterStore`] trait so the reconciliation logic can run against an
//! in-memory store in tests.
//!
//! [`KubeStore`] is the implementation backed by the Kubernetes API:
//! - status writes are merge patches on the status subresource that carry the
//!   observed `resourceVersion`, so a concurrent write surfaces as `Conflict`
//! - Secret updates are full replaces carrying `resourceVersion`

use crate::constants::{DVLS_SECRET_TYPE, FIELD_MANAGER};
use crate::crd::DvlsSecret;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, Resource, ResourceExt};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Namespace and name of a namespaced object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conflicting write to {kind} {key}, object was modified concurrently")]
    Conflict { kind: &'static str, key: String },
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: &'static str, key: String },
    #[error("cannot link {child} to owner {owner}: owner has no UID")]
    OwnerLink { owner: String, child: String },
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),
}

impl StoreError {
    /// Conflicts are resolved by re-running the whole pass
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::AlreadyExists { .. })
    }
}

/// Control-plane collaborator of the reconciler
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Fetch a `DvlsSecret`; `None` when it does not exist
    async fn get_dvls_secret(&self, key: &ObjectKey) -> Result<Option<DvlsSecret>, StoreError>;

    /// Persist `resource.status`
    async fn update_dvls_secret_status(&self, resource: &DvlsSecret) -> Result<(), StoreError>;

    /// Fetch a Secret; `None` when it does not exist
    async fn get_secret(&self, key: &ObjectKey) -> Result<Option<Secret>, StoreError>;

    async fn create_secret(&self, secret: &Secret) -> Result<(), StoreError>;

    async fn update_secret(&self, secret: &Secret) -> Result<(), StoreError>;
}

/// Make `owner` the controlling owner of `child`
///
/// # Errors
/// Returns `StoreError::OwnerLink` when the owner has not been persisted yet (no UID).
pub fn set_owner_reference(owner: &DvlsSecret, child: &mut ObjectMeta) -> Result<(), StoreError> {
    let mut owner_ref = owner
        .controller_owner_ref(&())
        .ok_or_else(|| StoreError::OwnerLink {
            owner: owner.resource_key(),
            child: child.name.clone().unwrap_or_default(),
        })?;

    // kube leaves this unset; foreground deletion of the owner waits on it
    owner_ref.block_owner_deletion = Some(true);

    let refs = child.owner_references.get_or_insert_with(Vec::new);
    refs.retain(|r| r.controller != Some(true));
    refs.push(owner_ref);
    Ok(())
}

/// A Secret belongs to `owner` when it carries the controller's type marker
/// and an owner reference to `owner`'s UID
#[must_use]
pub fn is_owned_by(secret: &Secret, owner: &DvlsSecret) -> bool {
    let Some(owner_uid) = owner.uid() else {
        return false;
    };
    secret.type_.as_deref() == Some(DVLS_SECRET_TYPE)
        && secret
            .owner_references()
            .iter()
            .any(|r| r.uid == owner_uid)
}

/// [`ClusterStore`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn dvls_secrets(&self, namespace: &str) -> Api<DvlsSecret> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn object_key<K: Resource>(obj: &K) -> String {
    format!(
        "{}/{}",
        obj.meta().namespace.as_deref().unwrap_or("default"),
        obj.meta().name.as_deref().unwrap_or_default()
    )
}

fn classify_write_error(
    err: kube::Error,
    kind: &'static str,
    key: String,
    on_conflict: fn(&'static str, String) -> StoreError,
) -> StoreError {
    match err {
        kube::Error::Api(api_err) if api_err.code == 409 => on_conflict(kind, key),
        other => StoreError::Api(other),
    }
}

#[async_trait]
impl ClusterStore for KubeStore {
    async fn get_dvls_secret(&self, key: &ObjectKey) -> Result<Option<DvlsSecret>, StoreError> {
        Ok(self.dvls_secrets(&key.namespace).get_opt(&key.name).await?)
    }

    async fn update_dvls_secret_status(&self, resource: &DvlsSecret) -> Result<(), StoreError> {
        let namespace = resource.namespace().unwrap_or_else(|| "default".to_string());
        let name = resource.name_any();

        let patch = serde_json::json!({
            "metadata": {
                "resourceVersion": resource.resource_version(),
            },
            "status": resource.status,
        });

        debug!("Patching status of DvlsSecret {}/{}", namespace, name);
        self.dvls_secrets(&namespace)
            .patch_status(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(patch))
            .await
            .map_err(|e| {
                classify_write_error(e, "DvlsSecret", object_key(resource), |kind, key| {
                    StoreError::Conflict { kind, key }
                })
            })?;
        Ok(())
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Option<Secret>, StoreError> {
        Ok(self.secrets(&key.namespace).get_opt(&key.name).await?)
    }

    async fn create_secret(&self, secret: &Secret) -> Result<(), StoreError> {
        let namespace = secret.namespace().unwrap_or_else(|| "default".to_string());
        self.secrets(&namespace)
            .create(&PostParams::default(), secret)
            .await
            .map_err(|e| {
                classify_write_error(e, "Secret", object_key(secret), |kind, key| {
                    StoreError::AlreadyExists { kind, key }
                })
            })?;
        Ok(())
    }

    async fn update_secret(&self, secret: &Secret) -> Result<(), StoreError> {
        let namespace = secret.namespace().unwrap_or_else(|| "default".to_string());
        self.secrets(&namespace)
            .replace(&secret.name_any(), &PostParams::default(), secret)
            .await
            .map_err(|e| {
                classify_write_error(e, "Secret", object_key(secret), |kind, key| {
                    StoreError::Conflict { kind, key }
                })
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::DvlsSecretSpec;

    fn owner(uid: Option<&str>) -> DvlsSecret {
        let mut resource = DvlsSecret::new(
            "db-credentials",
            DvlsSecretSpec {
                entry_id: "entry".to_string(),
                vault_id: "vault".to_string(),
            },
        );
        resource.metadata.namespace = Some("apps".to_string());
        resource.metadata.uid = uid.map(str::to_string);
        resource
    }

    #[test]
    fn test_set_owner_reference_marks_controller() {
        let owner = owner(Some("uid-1"));
        let mut meta = ObjectMeta {
            name: Some("db-credentials".to_string()),
            ..ObjectMeta::default()
        };

        set_owner_reference(&owner, &mut meta).unwrap();

        let refs = meta.owner_references.unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].uid, "uid-1");
        assert_eq!(refs[0].kind, "DvlsSecret");
        assert_eq!(refs[0].api_version, "dvls.devolutions.com/v1alpha1");
        assert_eq!(refs[0].controller, Some(true));
        assert_eq!(refs[0].block_owner_deletion, Some(true));
    }

    #[test]
    fn test_set_owner_reference_requires_uid() {
        let owner = owner(None);
        let mut meta = ObjectMeta::default();

        let err = set_owner_reference(&owner, &mut meta).unwrap_err();
        assert!(matches!(err, StoreError::OwnerLink { .. }));
        assert!(meta.owner_references.is_none());
    }

    #[test]
    fn test_is_owned_by_requires_marker_and_reference() {
        let owner = owner(Some("uid-1"));
        let mut secret = Secret {
            metadata: ObjectMeta {
                name: Some("db-credentials".to_string()),
                ..ObjectMeta::default()
            },
            type_: Some(DVLS_SECRET_TYPE.to_string()),
            ..Secret::default()
        };
        assert!(!is_owned_by(&secret, &owner));

        set_owner_reference(&owner, &mut secret.metadata).unwrap();
        assert!(is_owned_by(&secret, &owner));

        secret.type_ = Some("Opaque".to_string());
        assert!(!is_owned_by(&secret, &owner));

        let other = self::owner(Some("uid-2"));
        secret.type_ = Some(DVLS_SECRET_TYPE.to_string());
        assert!(!is_owned_by(&secret, &other));
    }

    #[test]
    fn test_object_key_display() {
        assert_eq!(ObjectKey::new("apps", "db").to_string(), "apps/db");
    }
}

//! # Reconciliation Logic
//!
//! One pass over a `DvlsSecret`:
//!
//! 1. fetch the resource (absent means it was deleted)
//! 2. write the `Available=Unknown` placeholder on first sight
//! 3. fetch the DVLS entry; failures are recorded as `Degraded` and retried later
//! 4. fetch the destination Secret
//! 5. skip when the entry is unchanged since the last sync
//! 6. map the entry into Secret data
//! 7. create the Secret, or 8-9. verify ownership and overwrite its data
//! 10. record `Available=True` with the entry's modification time
//!
//! Status is never written ahead of the Secret except for the placeholder
//! and failure records.

use super::status::{clear_degraded, mark_degraded, mark_initializing, mark_synced};
use super::types::{Reconciler, ReconcilerError};
use crate::constants::{
    DVLS_SECRET_TYPE, REASON_RECONCILING, REASON_SECRET_CONFLICT, REASON_UNSUPPORTED_SUBTYPE,
};
use crate::controller::mapper::build_secret_data;
use crate::controller::store::{is_owned_by, set_owner_reference, ObjectKey};
use crate::controller::sync::needs_sync;
use crate::crd::{DvlsSecret, DvlsSecretStatus};
use crate::observability::metrics;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

const FETCH_FAILED_MESSAGE: &str = "Unable to fetch entry on DVLS instance";

/// Controller entry point: runs one pass and converts the outcome into an `Action`
///
/// Errors are handed to the error policy, which applies the per-resource backoff.
pub async fn reconcile(
    resource: Arc<DvlsSecret>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let key = ObjectKey::new(
        resource.namespace().unwrap_or_else(|| "default".to_string()),
        resource.name_any(),
    );

    let span = info_span!(
        "reconcile",
        resource.name = %key.name,
        resource.namespace = %key.namespace,
        entry.id = %resource.spec.entry_id,
        vault.id = %resource.spec.vault_id,
    );

    let start = Instant::now();
    metrics::increment_reconciliations();

    let result = ctx.reconcile_key(&key).instrument(span).await;
    metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

    match result {
        Ok(Some(requeue_after)) => Ok(Action::requeue(requeue_after)),
        Ok(None) => Ok(Action::await_change()),
        Err(e) => {
            metrics::increment_reconciliation_errors(e.class());
            Err(e)
        }
    }
}

impl Reconciler {
    /// Run one reconciliation pass for `key`
    ///
    /// Returns the delay before the next pass, or `None` when the resource is gone.
    ///
    /// # Errors
    /// Fails on errors that need a retry of the whole pass (API failures,
    /// write conflicts) or operator intervention (unsupported subtype, a
    /// foreign Secret with the same name).
    pub async fn reconcile_key(
        &self,
        key: &ObjectKey,
    ) -> Result<Option<Duration>, ReconcilerError> {
        let resource_key = key.to_string();

        let Some(mut resource) = self.store.get_dvls_secret(key).await? else {
            debug!("DvlsSecret {} not found, assuming it was deleted", key);
            self.backoff.reset(&resource_key);
            return Ok(None);
        };

        if !resource
            .status
            .as_ref()
            .is_some_and(DvlsSecretStatus::is_initialized)
        {
            info!("Initializing status of DvlsSecret {}", key);
            mark_initializing(&mut resource);
            self.store.update_dvls_secret_status(&resource).await?;

            resource = match self.store.get_dvls_secret(key).await? {
                Some(r) => r,
                None => return Ok(None),
            };
        }

        let entry = match self
            .vault
            .get_entry(&resource.spec.vault_id, &resource.spec.entry_id)
            .await
        {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to fetch DVLS entry for {}: {}", key, e);
                metrics::increment_vault_fetch_failures();

                mark_degraded(&mut resource, REASON_RECONCILING, FETCH_FAILED_MESSAGE);
                self.store.update_dvls_secret_status(&resource).await?;

                let (delay, attempts) = self.backoff.record_failure(&resource_key);
                info!(
                    "Retrying DVLS fetch for {} in {}s (attempt {})",
                    key,
                    delay.as_secs(),
                    attempts
                );
                return Ok(Some(delay));
            }
        };

        let existing = self.store.get_secret(key).await?;

        let last_synced = resource.status.as_ref().and_then(|s| s.last_synced());
        if !needs_sync(last_synced, entry.modified_on, existing.is_some()) {
            debug!("DVLS entry for {} unchanged, skipping sync", key);
            metrics::increment_syncs_skipped();

            if clear_degraded(&mut resource) {
                self.store.update_dvls_secret_status(&resource).await?;
            }
            self.backoff.reset(&resource_key);
            return Ok(Some(self.requeue_interval));
        }

        let data = match build_secret_data(&entry) {
            Ok(data) => data,
            Err(e) => {
                self.record_permanent_failure(
                    &mut resource,
                    REASON_UNSUPPORTED_SUBTYPE,
                    &e.to_string(),
                )
                .await;
                return Err(e.into());
            }
        };

        match existing {
            None => {
                let secret = build_secret(&resource, data)?;
                self.store.create_secret(&secret).await?;
                metrics::increment_secrets_created();
                info!("Created Secret {} from DVLS entry {}", key, entry.id);
            }
            Some(mut secret) => {
                if !is_owned_by(&secret, &resource) {
                    let err = ReconcilerError::OwnershipConflict {
                        namespace: key.namespace.clone(),
                        name: key.name.clone(),
                    };
                    self.record_permanent_failure(
                        &mut resource,
                        REASON_SECRET_CONFLICT,
                        &err.to_string(),
                    )
                    .await;
                    return Err(err);
                }

                secret.data = Some(to_secret_data(data));
                secret.string_data = None;
                self.store.update_secret(&secret).await?;
                metrics::increment_secrets_updated();
                info!("Updated Secret {} from DVLS entry {}", key, entry.id);
            }
        }

        // Re-read so the status write carries the latest resourceVersion
        let Some(mut resource) = self.store.get_dvls_secret(key).await? else {
            return Ok(None);
        };
        mark_synced(&mut resource, entry.modified_on);
        self.store.update_dvls_secret_status(&resource).await?;

        self.backoff.reset(&resource_key);
        Ok(Some(self.requeue_interval))
    }

    /// Best-effort `Degraded` record for errors that will not resolve on retry
    async fn record_permanent_failure(
        &self,
        resource: &mut DvlsSecret,
        reason: &str,
        message: &str,
    ) {
        mark_degraded(resource, reason, message);
        if let Err(e) = self.store.update_dvls_secret_status(resource).await {
            warn!(
                "Failed to record {} condition on {}: {}",
                reason,
                resource.resource_key(),
                e
            );
        }
    }
}

/// Destination Secret for `owner`, carrying the type marker and a controller owner reference
fn build_secret(
    owner: &DvlsSecret,
    data: BTreeMap<String, String>,
) -> Result<Secret, ReconcilerError> {
    let mut metadata = ObjectMeta {
        name: Some(owner.name_any()),
        namespace: owner.namespace(),
        ..ObjectMeta::default()
    };
    set_owner_reference(owner, &mut metadata)?;

    Ok(Secret {
        metadata,
        type_: Some(DVLS_SECRET_TYPE.to_string()),
        data: Some(to_secret_data(data)),
        ..Secret::default()
    })
}

fn to_secret_data(data: BTreeMap<String, String>) -> BTreeMap<String, ByteString> {
    data.into_iter()
        .map(|(k, v)| (k, ByteString(v.into_bytes())))
        .collect()
}

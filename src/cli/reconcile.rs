//! # Reconcile Command
//!
//! Command to trigger reconciliation for DvlsSecret resources.

use anyhow::{Context, Result};
use dvls_secret_controller::constants::{RECONCILE_ANNOTATION, ZERO_TIMESTAMP};
use dvls_secret_controller::crd::DvlsSecret;
use kube::{
    api::{Api, Patch, PatchParams},
    Client,
};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

/// Trigger reconciliation by adding/updating an annotation
///
/// With `force`, the recorded entry modification date is reset first so the
/// controller rewrites the Secret regardless of the entry's timestamp.
pub async fn reconcile_command(
    client: Client,
    name: String,
    namespace: Option<String>,
    force: bool,
) -> Result<()> {
    let ns = namespace.as_deref().unwrap_or("default");
    let api: Api<DvlsSecret> = Api::namespaced(client, ns);

    api.get(&name)
        .await
        .with_context(|| format!("Failed to get DvlsSecret '{ns}/{name}'"))?;

    if force {
        println!("🔄 Force reconciliation mode enabled");
        let status_patch = json!({
            "status": {
                "entryModifiedDate": ZERO_TIMESTAMP
            }
        });
        api.patch_status(&name, &PatchParams::default(), &Patch::Merge(status_patch))
            .await
            .with_context(|| format!("Failed to reset status of DvlsSecret '{ns}/{name}'"))?;
        println!("   ✅ Entry modification date cleared");
    }

    println!("🔄 Triggering reconciliation for DvlsSecret '{ns}/{name}'...");

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System time is before UNIX epoch")?
        .as_secs();

    let patch = json!({
        "metadata": {
            "annotations": {
                RECONCILE_ANNOTATION: timestamp.to_string()
            }
        }
    });

    api.patch(&name, &PatchParams::default(), &Patch::Merge(patch))
        .await
        .with_context(|| format!("Failed to trigger reconciliation for DvlsSecret '{ns}/{name}'"))?;

    println!("✅ Reconciliation triggered successfully");
    println!("   Resource: {ns}/{name}");
    println!("   Annotation: {RECONCILE_ANNOTATION}={timestamp}");
    println!("\nThe controller will reconcile this resource shortly.");

    Ok(())
}

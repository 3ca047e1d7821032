//! # List Command

use anyhow::{Context, Result};
use dvls_secret_controller::constants::{CONDITION_AVAILABLE, CONDITION_DEGRADED};
use dvls_secret_controller::crd::{DvlsSecret, DvlsSecretStatus};
use kube::{api::Api, Client};

/// List DvlsSecret resources in one namespace, or all of them
pub async fn list_command(client: Client, namespace: Option<String>) -> Result<()> {
    let api: Api<DvlsSecret> = if let Some(ns) = &namespace {
        println!("Listing DvlsSecret resources in namespace '{ns}'...");
        Api::namespaced(client, ns)
    } else {
        println!("Listing DvlsSecret resources in all namespaces...");
        Api::all(client)
    };

    let resources = api
        .list(&kube::api::ListParams::default())
        .await
        .context("Failed to list DvlsSecret resources")?;

    if resources.items.is_empty() {
        println!("No DvlsSecret resources found.");
        return Ok(());
    }

    println!(
        "\n{:<30} {:<20} {:<10} {:<10} {:<25}",
        "NAME", "NAMESPACE", "AVAILABLE", "DEGRADED", "ENTRY MODIFIED"
    );
    println!("{}", "-".repeat(97));

    for resource in resources.items {
        let name = resource.metadata.name.as_deref().unwrap_or("<unknown>");
        let ns = resource.metadata.namespace.as_deref().unwrap_or("<unknown>");
        let status = resource.status.as_ref();

        let available = condition_status(status, CONDITION_AVAILABLE);
        let degraded = condition_status(status, CONDITION_DEGRADED);
        let modified = status
            .and_then(DvlsSecretStatus::last_synced)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());

        println!("{name:<30} {ns:<20} {available:<10} {degraded:<10} {modified:<25}");
    }

    Ok(())
}

fn condition_status(status: Option<&DvlsSecretStatus>, condition_type: &str) -> String {
    status
        .and_then(|s| s.condition(condition_type))
        .map_or_else(|| "-".to_string(), |c| c.status.to_string())
}

//! # Status Command
//!
//! Command to show detailed status of a DvlsSecret resource.

use anyhow::{Context, Result};
use dvls_secret_controller::crd::DvlsSecret;
use k8s_openapi::api::core::v1::Secret;
use kube::{api::Api, Client};

/// Show detailed status of a DvlsSecret and its destination Secret
pub async fn status_command(client: Client, name: String, namespace: Option<String>) -> Result<()> {
    let ns = namespace.as_deref().unwrap_or("default");

    println!("📊 Status for DvlsSecret '{ns}/{name}'");
    println!();

    let api: Api<DvlsSecret> = Api::namespaced(client.clone(), ns);
    let resource = api
        .get(&name)
        .await
        .with_context(|| format!("Failed to get DvlsSecret '{ns}/{name}'"))?;

    println!("Resource Information:");
    println!(
        "  Name: {}",
        resource.metadata.name.as_deref().unwrap_or("<unknown>")
    );
    println!(
        "  Namespace: {}",
        resource.metadata.namespace.as_deref().unwrap_or("<unknown>")
    );
    if let Some(uid) = &resource.metadata.uid {
        println!("  UID: {uid}");
    }

    println!();
    println!("Spec:");
    println!("  Vault ID: {}", resource.spec.vault_id);
    println!("  Entry ID: {}", resource.spec.entry_id);

    if let Some(status) = &resource.status {
        println!();
        println!("Status:");
        match (&status.entry_modified_date, status.last_synced()) {
            (_, Some(synced)) => println!("  Entry Modified: {}", synced.to_rfc3339()),
            (Some(_), None) => println!("  Entry Modified: never synced"),
            (None, None) => println!("  Entry Modified: -"),
        }

        if !status.conditions.is_empty() {
            println!();
            println!("Conditions:");
            for condition in &status.conditions {
                println!("  {}: {}", condition.r#type, condition.status);
                if let Some(reason) = &condition.reason {
                    println!("    Reason: {reason}");
                }
                if let Some(message) = &condition.message {
                    println!("    Message: {message}");
                }
                if let Some(last_transition_time) = &condition.last_transition_time {
                    println!("    Last Transition: {last_transition_time}");
                }
            }
        }
    } else {
        println!();
        println!("Status: No status available (resource may not have been reconciled yet)");
    }

    // Keys only, values stay in the cluster
    let secrets: Api<Secret> = Api::namespaced(client, ns);
    println!();
    match secrets.get_opt(&name).await? {
        Some(secret) => {
            let keys: Vec<&str> = secret
                .data
                .as_ref()
                .map(|d| d.keys().map(String::as_str).collect())
                .unwrap_or_default();
            println!("Secret '{ns}/{name}':");
            println!("  Type: {}", secret.type_.as_deref().unwrap_or("<none>"));
            println!("  Keys: {}", keys.join(", "));
        }
        None => println!("Secret '{ns}/{name}': not created yet"),
    }

    Ok(())
}

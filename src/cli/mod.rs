//! # DVLSCTL CLI
//!
//! Command-line interface for the DVLS Secret Controller.
//!
//! ## Usage
//!
//! ```bash
//! # List all DvlsSecret resources
//! dvlsctl list
//!
//! # Show status of a DvlsSecret
//! dvlsctl status my-credentials --namespace apps
//!
//! # Trigger reconciliation
//! dvlsctl reconcile my-credentials
//!
//! # Re-sync even if the DVLS entry is unchanged
//! dvlsctl reconcile my-credentials --force
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kube::Client;

mod list;
mod reconcile;
mod status;

/// DVLS Secret Controller CLI
#[derive(Parser)]
#[command(name = "dvlsctl")]
#[command(
    about = "DVLS Secret Controller CLI",
    long_about = None,
    after_help = "\
Examples:
  dvlsctl list
  dvlsctl status my-credentials --namespace apps
  dvlsctl reconcile my-credentials --force
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Kubernetes namespace (defaults to `default`, or all namespaces for `list`)
    #[arg(short, long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List DvlsSecret resources
    List,
    /// Show status of a DvlsSecret resource
    Status {
        /// Name of the DvlsSecret resource
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Trigger reconciliation for a DvlsSecret resource
    Reconcile {
        /// Name of the DvlsSecret resource
        #[arg(value_name = "NAME")]
        name: String,

        /// Clear the recorded entry modification date so the next pass
        /// rewrites the Secret even if the DVLS entry is unchanged
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_existing| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dvlsctl=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client. Ensure kubeconfig is configured.")?;

    match cli.command {
        Commands::List => list::list_command(client, cli.namespace).await,
        Commands::Status { name } => status::status_command(client, name, cli.namespace).await,
        Commands::Reconcile { name, force } => {
            reconcile::reconcile_command(client, name, cli.namespace, force).await
        }
    }
}

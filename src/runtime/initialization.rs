//! # Initialization
//!
//! Controller initialization logic including rustls setup, tracing, metrics,
//! server startup, DVLS authentication and Kubernetes client setup.

use crate::config::{ControllerConfig, DvlsConnection};
use crate::constants::{DEFAULT_SERVER_POLL_INTERVAL_MS, DEFAULT_SERVER_STARTUP_TIMEOUT_SECS};
use crate::controller::reconciler::Reconciler;
use crate::controller::server::{start_server, ServerState};
use crate::controller::store::KubeStore;
use crate::crd::DvlsSecret;
use crate::dvls::DvlsClient;
use crate::observability;
use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, ListParams};
use kube::Client;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Initialization result containing all necessary components for the controller
pub struct InitializationResult {
    /// `DvlsSecret` API across all namespaces
    pub dvls_secrets: Api<DvlsSecret>,
    /// Secret API across all namespaces, for the `owns` watch
    pub secrets: Api<Secret>,
    pub reconciler: Arc<Reconciler>,
    pub server_state: Arc<ServerState>,
    pub config: ControllerConfig,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_ready", &self.server_state.is_ready.load(Ordering::Relaxed))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Initialize the controller runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - configuration loading
/// - tracing subscriber setup
/// - metrics registration
/// - HTTP server startup
/// - DVLS authentication
/// - Kubernetes client creation
pub async fn initialize() -> Result<InitializationResult> {
    // Must run before anything opens a TLS connection
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_existing| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let config = ControllerConfig::from_env().context("Failed to load controller configuration")?;
    observability::init_logging(&config)?;

    info!("Starting DVLS Secret Controller");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    let connection =
        DvlsConnection::from_env().context("Failed to load DVLS connection settings")?;
    info!(
        "DVLS instance: {}, requeue interval: {:?}",
        connection.base_uri, config.requeue_interval
    );

    observability::register_metrics()?;

    let server_state = Arc::new(ServerState::default());
    let server_port = config.metrics_port;
    let server_state_clone = Arc::clone(&server_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });
    wait_for_server_ready(&server_state, &server_handle).await?;

    let dvls_client = DvlsClient::new(&connection, config.dvls_request_timeout())
        .context("Failed to create DVLS client")?;
    dvls_client
        .login()
        .await
        .context("Failed to authenticate to DVLS")?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let dvls_secrets: Api<DvlsSecret> = Api::all(client.clone());
    let secrets: Api<Secret> = Api::all(client.clone());

    let reconciler = Arc::new(Reconciler::new(
        Arc::new(KubeStore::new(client)),
        Arc::new(dvls_client),
        config.requeue_interval,
    ));

    summarize_existing_resources(&dvls_secrets).await;

    info!("Controller initialized, starting watch loop...");

    Ok(InitializationResult {
        dvls_secrets,
        secrets,
        reconciler,
        server_state,
        config,
    })
}

/// Wait for the HTTP server to become ready
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
) -> Result<()> {
    let startup_timeout = Duration::from_secs(DEFAULT_SERVER_STARTUP_TIMEOUT_SECS);
    let poll_interval = Duration::from_millis(DEFAULT_SERVER_POLL_INTERVAL_MS);
    let start_time = Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if server_state.is_ready.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            return Ok(());
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Log the `DvlsSecret` resources present at startup, grouped by namespace
///
/// A failure here usually means the CRD is not installed; the watch will
/// report it again, so it is only logged.
async fn summarize_existing_resources(dvls_secrets: &Api<DvlsSecret>) {
    match dvls_secrets.list(&ListParams::default()).await {
        Ok(list) => {
            let mut by_namespace: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for item in &list.items {
                by_namespace
                    .entry(item.metadata.namespace.clone().unwrap_or_default())
                    .or_default()
                    .push(item.metadata.name.clone().unwrap_or_default());
            }

            info!(
                "Found {} existing DvlsSecret resources in {} namespaces",
                list.items.len(),
                by_namespace.len()
            );
            for (namespace, names) in &by_namespace {
                info!("  {}: {}", namespace, names.join(", "));
            }
        }
        Err(e) => {
            warn!(
                "Unable to list DvlsSecret resources, is the CRD installed? {}",
                e
            );
        }
    }
}

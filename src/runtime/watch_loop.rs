//! # Watch Loop
//!
//! Controller watch loop that monitors `DvlsSecret` resources and the Secrets
//! they own, and triggers reconciliation when changes are detected.

use crate::config::ControllerConfig;
use crate::controller::reconciler::{reconcile, Reconciler};
use crate::controller::server::ServerState;
use crate::crd::DvlsSecret;
use crate::runtime::error_policy::{handle_reconciliation_error, handle_watch_stream_error};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube_runtime::{controller, watcher, Controller};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run the controller watch loop until a shutdown signal is received
///
/// The watch is restarted whenever its stream ends or fails, with the delays
/// and backoff taken from `config`.
pub async fn run_watch_loop(
    dvls_secrets: Api<DvlsSecret>,
    secrets: Api<Secret>,
    reconciler: Arc<Reconciler>,
    server_state: Arc<ServerState>,
    config: ControllerConfig,
) -> Result<(), anyhow::Error> {
    let backoff_ms = Arc::new(AtomicU64::new(config.backoff_start_ms));
    let shutdown_requested = Arc::new(AtomicBool::new(false));

    let shutdown_flag = Arc::clone(&shutdown_requested);
    let shutdown_server_state = Arc::clone(&server_state);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal, initiating graceful shutdown...");
            shutdown_flag.store(true, Ordering::Relaxed);
            shutdown_server_state.is_ready.store(false, Ordering::Relaxed);
        }
    });

    loop {
        if shutdown_requested.load(Ordering::Relaxed) {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        info!(
            "Starting controller watch loop (max {} concurrent reconciliations)...",
            config.max_concurrent_reconciliations
        );

        let stream_backoff = Arc::clone(&backoff_ms);
        let backoff_start_ms = config.backoff_start_ms;
        let backoff_max_ms = config.backoff_max_ms;
        let restart_delay = config.watch_restart_delay_duration();

        Controller::new(dvls_secrets.clone(), watcher::Config::default().any_semantic())
            .owns(secrets.clone(), watcher::Config::default())
            .with_config(
                controller::Config::default().concurrency(config.max_concurrent_reconciliations),
            )
            .shutdown_on_signal()
            .run(reconcile, handle_reconciliation_error, Arc::clone(&reconciler))
            .filter_map(move |event| {
                let backoff = Arc::clone(&stream_backoff);
                async move {
                    match &event {
                        Ok((obj, _action)) => {
                            backoff.store(backoff_start_ms, Ordering::Relaxed);
                            debug!(
                                "Reconciled {}/{}",
                                obj.namespace.as_deref().unwrap_or("default"),
                                obj.name
                            );
                            Some(event)
                        }
                        Err(e) => {
                            let error_string = format!("{e:?}");
                            handle_watch_stream_error(
                                &error_string,
                                &backoff,
                                backoff_max_ms,
                                restart_delay,
                            )
                            .await
                            .then_some(event)
                        }
                    }
                }
            })
            .for_each(|_| futures::future::ready(()))
            .await;

        if shutdown_requested.load(Ordering::Relaxed) {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        let delay = config.watch_restart_delay_after_end_duration();
        warn!(
            "Controller watch stream ended, restarting in {} seconds...",
            delay.as_secs()
        );
        tokio::time::sleep(delay).await;
    }

    info!("Controller stopped gracefully");
    Ok(())
}

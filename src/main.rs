//! # DVLS Secret Controller
//!
//! Kubernetes controller that mirrors Devolutions Server credential entries
//! into Kubernetes Secrets.
//!
//! ## Configuration
//!
//! - `DEVO_OPERATOR_DVLS_BASEURI` - DVLS base URL
//! - `DEVO_OPERATOR_DVLS_APPID` / `DEVO_OPERATOR_DVLS_APPSECRET` - application credentials
//! - `DEVO_OPERATOR_REQUEUE_DURATION` - entry re-check interval (default `1m`)

use anyhow::Result;
use dvls_secret_controller::runtime::{initialize, run_watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;

    run_watch_loop(
        init.dvls_secrets,
        init.secrets,
        init.reconciler,
        init.server_state,
        init.config,
    )
    .await
}

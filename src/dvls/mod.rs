//! # DVLS
//!
//! Access to Devolutions Server (DVLS) credential entries.
//!
//! The reconciler only depends on the [`VaultClient`] trait so tests can swap
//! in an in-memory vault; [`DvlsClient`] is the REST implementation used in
//! production.

mod client;
pub mod entry;
mod responses;

pub use client::DvlsClient;
pub use entry::{
    AccessCodeCredential, ApiKeyCredential, AzureServicePrincipalCredential,
    ConnectionStringCredential, Credential, DefaultCredential, PrivateKeyCredential, VaultEntry,
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned while fetching entries from DVLS
///
/// Messages never contain credential values.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("request to DVLS failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("DVLS authentication failed: {0}")]
    Authentication(String),
    #[error("entry {entry_id} not found in vault {vault_id}")]
    NotFound { vault_id: String, entry_id: String },
    #[error("DVLS returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unable to decode DVLS entry: {0}")]
    Decode(String),
}

/// Read access to vault entries
#[async_trait]
pub trait VaultClient: Send + Sync {
    /// Fetch entry `entry_id` from vault `vault_id`
    async fn get_entry(&self, vault_id: &str, entry_id: &str) -> Result<VaultEntry, VaultError>;
}

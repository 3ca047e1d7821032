//! DVLS REST client
//!
//! Uses reqwest with rustls (no OpenSSL dependencies). Authentication is an
//! application key / secret pair exchanged for a session token, which is sent
//! in the `tokenId` header of every subsequent request. When DVLS rejects the
//! token (session expired) the client logs in again once and retries.

use super::responses::{EntryResponse, LoginRequest, LoginResponse};
use super::{VaultClient, VaultEntry, VaultError};
use crate::config::DvlsConnection;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

const TOKEN_HEADER: &str = "tokenId";

/// DVLS REST client
pub struct DvlsClient {
    http_client: Client,
    base_url: String,
    app_id: String,
    app_secret: Zeroizing<String>,
    token: RwLock<Option<Zeroizing<String>>>,
}

impl std::fmt::Debug for DvlsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DvlsClient")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

impl DvlsClient {
    /// Create a client; no request is sent until [`login`](Self::login) or the first fetch
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(connection: &DvlsConnection, timeout: Duration) -> Result<Self, VaultError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: connection.base_uri.trim_end_matches('/').to_string(),
            app_id: connection.app_id.clone(),
            app_secret: connection.app_secret.clone(),
            token: RwLock::new(None),
        })
    }

    /// Exchange the application credentials for a session token
    ///
    /// # Errors
    /// Returns `VaultError::Authentication` when DVLS rejects the credentials
    pub async fn login(&self) -> Result<(), VaultError> {
        let url = format!("{}/api/v1/login", self.base_url);
        let request = LoginRequest {
            app_key: &self.app_id,
            app_secret: &self.app_secret,
        };

        let response = self.http_client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaultError::Authentication(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body = response.bytes().await?;
        let login: LoginResponse = serde_json::from_slice(&body).map_err(|e| {
            VaultError::Authentication(format!("invalid login response ({:?})", e.classify()))
        })?;
        if login.token_id.is_empty() {
            return Err(VaultError::Authentication(
                "login response did not contain a token".to_string(),
            ));
        }

        *self.token.write().await = Some(Zeroizing::new(login.token_id));
        info!("Authenticated to DVLS at {}", self.base_url);
        Ok(())
    }

    async fn current_token(&self) -> Result<Zeroizing<String>, VaultError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        self.login().await?;
        self.token.read().await.clone().ok_or_else(|| {
            VaultError::Authentication("no session token after login".to_string())
        })
    }

    async fn send_get(&self, url: &str, token: &str) -> Result<Response, VaultError> {
        Ok(self
            .http_client
            .get(url)
            .header(TOKEN_HEADER, token)
            .header("Accept", "application/json")
            .send()
            .await?)
    }
}

#[async_trait]
impl VaultClient for DvlsClient {
    async fn get_entry(&self, vault_id: &str, entry_id: &str) -> Result<VaultEntry, VaultError> {
        let url = format!(
            "{}/api/v1/vault/{}/entry/{}",
            self.base_url, vault_id, entry_id
        );

        let token = self.current_token().await?;
        let mut response = self.send_get(&url, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("DVLS session token rejected, logging in again");
            self.login().await?;
            let token = self.current_token().await?;
            response = self.send_get(&url, &token).await?;
        }

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(VaultError::NotFound {
                vault_id: vault_id.to_string(),
                entry_id: entry_id.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(
                "DVLS returned HTTP {} for entry {} in vault {}",
                status.as_u16(),
                entry_id,
                vault_id
            );
            return Err(VaultError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let entry: EntryResponse = serde_json::from_slice(&body).map_err(|e| {
            VaultError::Decode(format!("invalid entry response ({:?})", e.classify()))
        })?;
        entry.into_entry()
    }
}

//! Pact contract tests for the DVLS REST API
//!
//! These tests define the contract between the DVLS Secret Controller and
//! Devolutions Server. The real `DvlsClient` is pointed at the Pact mock
//! server so the recorded interactions match what the controller sends.

mod common;

use common::init_rustls;
use dvls_secret_controller::config::DvlsConnection;
use dvls_secret_controller::dvls::{Credential, DvlsClient, VaultClient, VaultError};
use pact_consumer::prelude::*;
use serde_json::json;
use std::time::Duration;
use zeroize::Zeroizing;

const CONSUMER: &str = "DVLS-Secret-Controller";
const PROVIDER: &str = "Devolutions-Server";
const VAULT_ID: &str = "8c1d5e7a-0000-4000-8000-000000000001";
const ENTRY_ID: &str = "8c1d5e7a-0000-4000-8000-000000000002";
const ENTRY_PATH: &str =
    "/api/v1/vault/8c1d5e7a-0000-4000-8000-000000000001/entry/8c1d5e7a-0000-4000-8000-000000000002";
const MISSING_ENTRY_PATH: &str = "/api/v1/vault/8c1d5e7a-0000-4000-8000-000000000001/entry/missing";

fn login_interaction(pact_builder: &mut PactBuilder) {
    pact_builder.interaction("log in with application credentials", "", |mut i| {
        i.given("an application key exists");
        i.request
            .method("POST")
            .path("/api/v1/login")
            .header("content-type", "application/json")
            .json_body(json!({
                "appKey": "test-app-id",
                "appSecret": "test-app-secret"
            }));
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "tokenId": "test-token"
            }));
        i
    });
}

fn client_for(base_uri: String) -> DvlsClient {
    let connection = DvlsConnection {
        base_uri,
        app_id: "test-app-id".to_string(),
        app_secret: Zeroizing::new("test-app-secret".to_string()),
    };
    DvlsClient::new(&connection, Duration::from_secs(5)).expect("Failed to build DVLS client")
}

#[tokio::test]
async fn test_dvls_get_credential_entry_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);
    login_interaction(&mut pact_builder);

    pact_builder.interaction("get a Default credential entry", "", |mut i| {
        i.given("a Default credential entry exists in the vault");
        i.request
            .method("GET")
            .path(ENTRY_PATH)
            .header("tokenId", "test-token");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": ENTRY_ID,
                "vaultId": VAULT_ID,
                "name": "Database",
                "type": "Credential",
                "subType": "Default",
                "modifiedOn": "2024-01-15T10:00:00Z",
                "data": {
                    "username": "app",
                    "password": "s3cret",
                    "domain": "CORP"
                }
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().to_string());

    client.login().await.expect("login should succeed");
    let entry = client
        .get_entry(VAULT_ID, ENTRY_ID)
        .await
        .expect("entry should be returned");

    assert_eq!(entry.id, ENTRY_ID);
    assert_eq!(entry.name, "Database");
    assert_eq!(
        entry.modified_on.map(|t| t.to_rfc3339()),
        Some("2024-01-15T10:00:00+00:00".to_string())
    );
    match &entry.credential {
        Credential::Default(c) => {
            assert_eq!(c.username, "app");
            assert_eq!(c.password, "s3cret");
            assert_eq!(c.domain, "CORP");
        }
        other => panic!("unexpected credential {other:?}"),
    }
}

#[tokio::test]
async fn test_dvls_get_api_key_entry_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);
    login_interaction(&mut pact_builder);

    pact_builder.interaction("get an ApiKey credential entry", "", |mut i| {
        i.given("an ApiKey credential entry exists in the vault");
        i.request
            .method("GET")
            .path(ENTRY_PATH)
            .header("tokenId", "test-token");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": ENTRY_ID,
                "vaultId": VAULT_ID,
                "name": "Billing API",
                "type": "Credential",
                "subType": "ApiKey",
                "modifiedOn": "2024-02-01T08:30:00Z",
                "data": {
                    "apiId": "billing",
                    "apiKey": "key-123",
                    "tenantId": "tenant-1"
                }
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().to_string());

    // No explicit login: the first fetch authenticates lazily
    let entry = client.get_entry(VAULT_ID, ENTRY_ID).await.unwrap();

    match &entry.credential {
        Credential::ApiKey(c) => {
            assert_eq!(c.api_id, "billing");
            assert_eq!(c.api_key, "key-123");
            assert_eq!(c.tenant_id, "tenant-1");
        }
        other => panic!("unexpected credential {other:?}"),
    }
}

#[tokio::test]
async fn test_dvls_entry_not_found_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);
    login_interaction(&mut pact_builder);

    pact_builder.interaction("get an entry that does not exist", "", |mut i| {
        i.given("the entry does not exist in the vault");
        i.request
            .method("GET")
            .path(MISSING_ENTRY_PATH)
            .header("tokenId", "test-token");
        i.response.status(404);
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().to_string());

    let err = client.get_entry(VAULT_ID, "missing").await.unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));
}

#[tokio::test]
async fn test_dvls_rejected_login_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("log in with revoked application credentials", "", |mut i| {
        i.given("the application key has been revoked");
        i.request
            .method("POST")
            .path("/api/v1/login")
            .header("content-type", "application/json")
            .json_body(json!({
                "appKey": "test-app-id",
                "appSecret": "test-app-secret"
            }));
        i.response
            .status(401)
            .header("content-type", "application/json")
            .json_body(json!({
                "message": "Invalid application key"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().to_string());

    let err = client.login().await.unwrap_err();
    assert!(matches!(err, VaultError::Authentication(_)));
    assert!(!err.to_string().contains("test-app-secret"));
}

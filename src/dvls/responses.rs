//! DVLS REST API wire types

use super::entry::{
    AccessCodeCredential, ApiKeyCredential, AzureServicePrincipalCredential,
    ConnectionStringCredential, Credential, DefaultCredential, PrivateKeyCredential, VaultEntry,
};
use super::VaultError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Entry type carrying credential payloads
const CREDENTIAL_ENTRY_TYPE: &str = "Credential";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub app_key: &'a str,
    pub app_secret: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub token_id: String,
}

/// Entry as returned by `GET /api/v1/vault/{vaultId}/entry/{entryId}`
///
/// Not `Debug`: `data` holds the raw credential values.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub sub_type: String,
    #[serde(default)]
    pub modified_on: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EntryResponse {
    /// Decode the subtype-tagged payload into a [`VaultEntry`]
    pub(crate) fn into_entry(self) -> Result<VaultEntry, VaultError> {
        let modified_on = match self.modified_on.as_deref() {
            Some(raw) if !raw.is_empty() => Some(parse_modified_on(raw)?),
            _ => None,
        };

        let credential = if self.entry_type == CREDENTIAL_ENTRY_TYPE {
            decode_credential(&self.sub_type, self.data)?
        } else {
            let sub_type = if self.sub_type.is_empty() {
                self.entry_type
            } else {
                self.sub_type
            };
            Credential::Unsupported { sub_type }
        };

        Ok(VaultEntry {
            id: self.id,
            name: self.name,
            modified_on,
            credential,
        })
    }
}

fn decode_credential(sub_type: &str, data: serde_json::Value) -> Result<Credential, VaultError> {
    let credential = match sub_type {
        "Default" => Credential::Default(decode_payload::<DefaultCredential>(sub_type, data)?),
        "AccessCode" => {
            Credential::AccessCode(decode_payload::<AccessCodeCredential>(sub_type, data)?)
        }
        "ApiKey" => Credential::ApiKey(decode_payload::<ApiKeyCredential>(sub_type, data)?),
        "AzureServicePrincipal" => Credential::AzureServicePrincipal(decode_payload::<
            AzureServicePrincipalCredential,
        >(sub_type, data)?),
        "ConnectionString" => Credential::ConnectionString(decode_payload::<
            ConnectionStringCredential,
        >(sub_type, data)?),
        "PrivateKey" => {
            Credential::PrivateKey(decode_payload::<PrivateKeyCredential>(sub_type, data)?)
        }
        other => Credential::Unsupported {
            sub_type: other.to_string(),
        },
    };
    Ok(credential)
}

fn decode_payload<T: DeserializeOwned>(
    sub_type: &str,
    data: serde_json::Value,
) -> Result<T, VaultError> {
    let data = if data.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        data
    };
    // serde_json errors quote the offending value, which may be a secret
    serde_json::from_value(data).map_err(|e| {
        VaultError::Decode(format!("invalid {sub_type} payload ({:?})", e.classify()))
    })
}

/// DVLS reports times either as RFC3339 or as a naive UTC timestamp
fn parse_modified_on(raw: &str) -> Result<DateTime<Utc>, VaultError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| VaultError::Decode(format!("invalid modifiedOn '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn response(value: serde_json::Value) -> EntryResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decodes_default_credential() {
        let entry = response(json!({
            "id": "e1",
            "vaultId": "v1",
            "name": "db",
            "type": "Credential",
            "subType": "Default",
            "modifiedOn": "2024-01-02T03:04:05Z",
            "data": { "username": "admin", "password": "pw" }
        }))
        .into_entry()
        .unwrap();

        assert_eq!(entry.id, "e1");
        assert_eq!(
            entry.modified_on,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );
        match &entry.credential {
            Credential::Default(c) => {
                assert_eq!(c.username, "admin");
                assert_eq!(c.password, "pw");
                assert!(c.domain.is_empty());
            }
            other => panic!("unexpected credential {other:?}"),
        }
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let entry = response(json!({
            "id": "e1",
            "type": "Credential",
            "subType": "Default",
            "data": { "username": "svc", "password": null, "domain": null }
        }))
        .into_entry()
        .unwrap();

        match &entry.credential {
            Credential::Default(c) => {
                assert_eq!(c.username, "svc");
                assert!(c.password.is_empty());
                assert!(c.domain.is_empty());
            }
            other => panic!("unexpected credential {other:?}"),
        }
    }

    #[test]
    fn test_null_private_key_fields_decode_as_empty() {
        let entry = response(json!({
            "id": "e1",
            "type": "Credential",
            "subType": "PrivateKey",
            "data": { "privateKey": "-----BEGIN KEY-----", "passphrase": null, "username": null }
        }))
        .into_entry()
        .unwrap();

        match &entry.credential {
            Credential::PrivateKey(c) => {
                assert_eq!(c.private_key, "-----BEGIN KEY-----");
                assert!(c.passphrase.is_empty());
                assert!(c.username.is_empty());
            }
            other => panic!("unexpected credential {other:?}"),
        }
    }

    #[test]
    fn test_naive_modified_on_is_utc() {
        let entry = response(json!({
            "id": "e1",
            "type": "Credential",
            "subType": "AccessCode",
            "modifiedOn": "2024-01-02T03:04:05.123",
            "data": { "password": "code" }
        }))
        .into_entry()
        .unwrap();

        let modified = entry.modified_on.unwrap();
        assert_eq!(modified.timestamp(), 1_704_164_645);
        assert_eq!(modified.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_missing_data_and_modified_on() {
        let entry = response(json!({
            "id": "e1",
            "type": "Credential",
            "subType": "ConnectionString"
        }))
        .into_entry()
        .unwrap();

        assert!(entry.modified_on.is_none());
        assert!(matches!(entry.credential, Credential::ConnectionString(_)));
    }

    #[test]
    fn test_unknown_subtype_is_unsupported() {
        let entry = response(json!({
            "id": "e1",
            "type": "Credential",
            "subType": "SshKey",
            "data": {}
        }))
        .into_entry()
        .unwrap();

        assert_eq!(entry.credential.sub_type(), "SshKey");
        assert!(matches!(entry.credential, Credential::Unsupported { .. }));
    }

    #[test]
    fn test_non_credential_entry_is_unsupported() {
        let entry = response(json!({
            "id": "e1",
            "type": "Document",
            "subType": "",
            "data": {}
        }))
        .into_entry()
        .unwrap();

        assert_eq!(entry.credential.sub_type(), "Document");
    }

    #[test]
    fn test_decode_error_does_not_leak_values() {
        let err = response(json!({
            "id": "e1",
            "type": "Credential",
            "subType": "Default",
            "data": { "password": ["top-secret"] }
        }))
        .into_entry()
        .unwrap_err();

        assert!(matches!(err, VaultError::Decode(_)));
        assert!(!err.to_string().contains("top-secret"));
    }
}

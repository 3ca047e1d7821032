//! # Credential Mapper
//!
//! Flattens a DVLS entry into the key/value map stored in the destination Secret.
//!
//! Every map starts with `entry-id` and `entry-name`, followed by the
//! subtype-specific keys. Empty values are omitted.
//!
//! | Subtype | Keys |
//! |---|---|
//! | Default | `username`, `password`, `domain` |
//! | AccessCode | `password` |
//! | ApiKey | `api-id`, `api-key`, `tenant-id` |
//! | AzureServicePrincipal | `client-id`, `client-secret`, `tenant-id` |
//! | ConnectionString | `connection-string` |
//! | PrivateKey | `username`, `password`, `private-key`, `public-key`, `passphrase` |

use crate::dvls::{Credential, VaultEntry};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapperError {
    #[error("entry subtype {sub_type} is not supported")]
    UnsupportedSubtype { sub_type: String },
}

/// Build the Secret data for `entry`
///
/// # Errors
/// Returns `MapperError::UnsupportedSubtype` for subtypes without a mapping.
pub fn build_secret_data(entry: &VaultEntry) -> Result<BTreeMap<String, String>, MapperError> {
    let mut data = BTreeMap::new();
    data.insert("entry-id".to_string(), entry.id.clone());
    data.insert("entry-name".to_string(), entry.name.clone());

    let fields: Vec<(&str, &str)> = match &entry.credential {
        Credential::Default(c) => vec![
            ("username", c.username.as_str()),
            ("password", c.password.as_str()),
            ("domain", c.domain.as_str()),
        ],
        Credential::AccessCode(c) => vec![("password", c.password.as_str())],
        Credential::ApiKey(c) => vec![
            ("api-id", c.api_id.as_str()),
            ("api-key", c.api_key.as_str()),
            ("tenant-id", c.tenant_id.as_str()),
        ],
        Credential::AzureServicePrincipal(c) => vec![
            ("client-id", c.client_id.as_str()),
            ("client-secret", c.client_secret.as_str()),
            ("tenant-id", c.tenant_id.as_str()),
        ],
        Credential::ConnectionString(c) => vec![("connection-string", c.connection_string.as_str())],
        Credential::PrivateKey(c) => vec![
            ("username", c.username.as_str()),
            ("password", c.password.as_str()),
            ("private-key", c.private_key.as_str()),
            ("public-key", c.public_key.as_str()),
            ("passphrase", c.passphrase.as_str()),
        ],
        Credential::Unsupported { sub_type } => {
            return Err(MapperError::UnsupportedSubtype {
                sub_type: sub_type.clone(),
            });
        }
    };

    for (key, value) in fields {
        if !value.is_empty() {
            data.insert(key.to_string(), value.to_string());
        }
    }

    Ok(data)
}

//! # Vault Entries
//!
//! Domain model for a DVLS credential entry.
//!
//! The payload of an entry depends on its subtype, so it is modelled as the
//! [`Credential`] sum type with one variant per supported subtype and an
//! `Unsupported` variant keeping the raw subtype name for error reporting.
//!
//! Every credential struct zeroizes its fields on drop and prints only
//! `<redacted>` in `Debug` output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A credential entry fetched from DVLS
#[derive(Debug, Clone)]
pub struct VaultEntry {
    pub id: String,
    pub name: String,
    /// Last modification time reported by DVLS, when present
    pub modified_on: Option<DateTime<Utc>>,
    pub credential: Credential,
}

/// Subtype-specific credential payload
#[derive(Clone)]
pub enum Credential {
    Default(DefaultCredential),
    AccessCode(AccessCodeCredential),
    ApiKey(ApiKeyCredential),
    AzureServicePrincipal(AzureServicePrincipalCredential),
    ConnectionString(ConnectionStringCredential),
    PrivateKey(PrivateKeyCredential),
    Unsupported { sub_type: String },
}

impl Credential {
    /// DVLS subtype name of this credential
    #[must_use]
    pub fn sub_type(&self) -> &str {
        match self {
            Self::Default(_) => "Default",
            Self::AccessCode(_) => "AccessCode",
            Self::ApiKey(_) => "ApiKey",
            Self::AzureServicePrincipal(_) => "AzureServicePrincipal",
            Self::ConnectionString(_) => "ConnectionString",
            Self::PrivateKey(_) => "PrivateKey",
            Self::Unsupported { sub_type } => sub_type,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("sub_type", &self.sub_type())
            .finish_non_exhaustive()
    }
}

/// Implements a `Debug` that names the type but never prints field values
macro_rules! redacted_debug {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(concat!(stringify!($ty), " { <redacted> }"))
                }
            }
        )+
    };
}

redacted_debug!(
    DefaultCredential,
    AccessCodeCredential,
    ApiKeyCredential,
    AzureServicePrincipalCredential,
    ConnectionStringCredential,
    PrivateKeyCredential,
);

/// DVLS sends `null` for fields that were never filled in
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Username / password pair, optionally scoped to a domain
#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct DefaultCredential {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub domain: String,
}

#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeCredential {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
}

#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyCredential {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub api_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub api_key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tenant_id: String,
}

#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct AzureServicePrincipalCredential {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_secret: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tenant_id: String,
}

#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStringCredential {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub connection_string: String,
}

#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct PrivateKeyCredential {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub private_key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub public_key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub passphrase: String,
}

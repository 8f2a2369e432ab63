use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Canonical network identifier used by the dapp framework, independent of
/// vendor vocabulary. Serialized as the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkName {
    Mainnet,
    Testnet,
    Devnet,
}

impl NetworkName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
        }
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkName {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            other => Err(WalletError::Network(format!(
                "unknown network name: {other}"
            ))),
        }
    }
}

/// Normalized network descriptor handed to the dapp framework. Vendors
/// respond with either a bare name or a name-keyed object; adapters collapse
/// both shapes into this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub name: NetworkName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

/// Account details as produced by a vendor on connect/account calls.
/// `public_key` defaults to empty when the vendor exposes it through a
/// separate call that returns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub address: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ans_name: Option<String>,
}

/// Message-signing request forwarded to the vendor. A nonce is mandatory;
/// adapters reject an empty one before touching the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessagePayload {
    pub message: String,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub full_message: String,
    pub message: String,
    pub nonce: String,
    pub prefix: String,
    pub signature: String,
}

/// Result of a sign-and-submit call: the transaction hash, nothing else.
/// Transaction payloads themselves stay opaque blobs end to end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedTransaction {
    pub hash: String,
}

/// Network-change notification in its canonical shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkChangeEvent {
    pub name: NetworkName,
    pub chain_id: Option<String>,
    pub api: Option<String>,
}

/// Account-change notification in its canonical shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountChangeEvent {
    pub address: String,
    pub public_key: String,
}

pub type NetworkChangeCallback = Arc<dyn Fn(NetworkChangeEvent) + Send + Sync>;
pub type AccountChangeCallback = Arc<dyn Fn(AccountChangeEvent) + Send + Sync>;

const ICON_EXTENSIONS: &[&str] = &["svg+xml", "webp", "png", "gif"];

/// Static identity of one wallet plugin: display name, install/app URL and
/// an inline icon. Immutable after construction; constructing one validates
/// the icon data-URI shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletIdentity {
    name: String,
    url: String,
    icon: String,
}

impl WalletIdentity {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        icon: impl Into<String>,
    ) -> Result<Self, WalletError> {
        let icon = icon.into();
        validate_icon(&icon)?;
        Ok(Self {
            name: name.into(),
            url: url.into(),
            icon,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }
}

fn validate_icon(icon: &str) -> Result<(), WalletError> {
    let rest = icon
        .strip_prefix("data:image/")
        .ok_or_else(|| WalletError::InvalidIdentity("icon must be an image data URI".to_owned()))?;
    let (ext, payload) = rest.split_once(";base64,").ok_or_else(|| {
        WalletError::InvalidIdentity("icon data URI must be base64 encoded".to_owned())
    })?;
    if !ICON_EXTENSIONS.contains(&ext) {
        return Err(WalletError::InvalidIdentity(format!(
            "unsupported icon image type: {ext}"
        )));
    }
    if payload.is_empty() {
        return Err(WalletError::InvalidIdentity(
            "icon data URI has no payload".to_owned(),
        ));
    }
    Ok(())
}

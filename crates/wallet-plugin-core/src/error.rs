use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure surfaced to the dapp framework. Messages carry the vendor's
/// original text where the vendor supplied one; otherwise adapters
/// synthesize a `"<Wallet> <Operation> Error"` string. An absent provider
/// handle is not a distinct kind — it shows up as whichever
/// operation-specific variant fires first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    AccountLookup(String),
    #[error("{0}")]
    Sign(String),
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    TransactionSubmission(String),
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
    #[error("invalid wallet identity: {0}")]
    InvalidIdentity(String),
}

impl WalletError {
    /// The message as the dapp framework sees it.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(m)
            | Self::AccountLookup(m)
            | Self::Sign(m)
            | Self::Network(m)
            | Self::TransactionSubmission(m)
            | Self::HandshakeFailed(m)
            | Self::InvalidIdentity(m) => m,
        }
    }
}

/// Raw failure as a vendor provider reports it: an optional numeric code
/// plus the vendor's diagnostic message. Adapters rethrow the message
/// unchanged inside the matching [`WalletError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

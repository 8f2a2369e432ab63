pub mod domain;
pub mod error;
pub mod handshake;
pub mod ports;

pub use domain::{
    AccountChangeCallback, AccountChangeEvent, AccountInfo, NetworkChangeCallback,
    NetworkChangeEvent, NetworkInfo, NetworkName, SignMessagePayload, SignMessageResponse,
    SubmittedTransaction, WalletIdentity,
};
pub use error::{ProviderError, WalletError};
pub use handshake::{Handshake, HandshakePhase};
pub use ports::WalletPlugin;

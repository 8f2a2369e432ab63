use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    AccountChangeCallback, AccountInfo, NetworkChangeCallback, NetworkInfo, SignMessagePayload,
    SignMessageResponse, SubmittedTransaction, WalletIdentity,
};
use crate::error::WalletError;

/// The plugin contract every wallet adapter exposes to the dapp framework.
///
/// All operations are asynchronous requests awaited by the caller; there are
/// no retries, timeouts or cancellation — an unresponsive provider blocks
/// the awaiter, which is the vendor's responsibility. Change listeners stay
/// registered until adapter teardown; there is no unsubscribe.
#[async_trait]
pub trait WalletPlugin: Send + Sync {
    /// Static name/url/icon tuple, fixed at construction.
    fn identity(&self) -> &WalletIdentity;

    async fn connect(&self) -> Result<AccountInfo, WalletError>;

    async fn account(&self) -> Result<AccountInfo, WalletError>;

    /// Best-effort; vendor errors propagate unchanged.
    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Forwards an opaque transaction payload. A vendor response carrying an
    /// error-code field is converted into a thrown error with the vendor's
    /// message, never returned as success.
    async fn sign_and_submit_transaction(
        &self,
        transaction: Value,
        options: Option<Value>,
    ) -> Result<SubmittedTransaction, WalletError>;

    async fn sign_message(
        &self,
        payload: SignMessagePayload,
    ) -> Result<SignMessageResponse, WalletError>;

    async fn network(&self) -> Result<NetworkInfo, WalletError>;

    async fn on_network_change(
        &self,
        callback: NetworkChangeCallback,
    ) -> Result<(), WalletError>;

    async fn on_account_change(
        &self,
        callback: AccountChangeCallback,
    ) -> Result<(), WalletError>;
}

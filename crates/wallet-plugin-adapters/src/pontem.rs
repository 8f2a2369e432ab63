use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use wallet_plugin_core::{
    AccountChangeCallback, AccountInfo, NetworkChangeCallback, NetworkInfo, NetworkName,
    ProviderError, SignMessagePayload, SignMessageResponse, SubmittedTransaction, WalletError,
    WalletIdentity, WalletPlugin,
};

use crate::events::{
    reshape_account_change, reshape_network_change, ConnectFn, RawAccountListener,
    RawNetworkListener, Subscriptions,
};
use crate::network::lookup_network;
use crate::response::{network_from_response, submitted_from_response};

pub const PONTEM_WALLET_NAME: &str = "Pontem";

const PONTEM_URL: &str =
    "https://chrome.google.com/webstore/detail/pontem-wallet/phkbamefinggmakgklpkljjmgibohnba";

const PONTEM_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzYiIGhlaWdodD0iMzYiIHZpZXdCb3g9IjAgMCAzNiAzNiIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj4KPHBhdGggZD0iTTE4IDBDOC4wNzMwNCAwIDAgOC4wNzEzOSAwIDE3Ljk5NjNDMCAyNS4xMjk4IDQuMTczMTYgMzEuMzEwOCAxMC4yMDc2IDM0LjIyMDNWMzQuMjM1MUgxMC4yMzcyQzEyLjU4NiAzNS4zNjQ5IDE1LjIyMjggMzYgMTggMzZDMjcuOTI3IDM2IDM2IDI3LjkyODYgMzYgMTguMDAzN0MzNiA4LjA3MTM4IDI3LjkyNyAwIDE4IDBaTTE4IDEuNDc2OTJDMjcuMTA3MSAxLjQ3NjkyIDM0LjUyMjggOC44OTEwOCAzNC41MjI4IDE3Ljk5NjNDMzQuNTIyOCAyMC42MTA1IDMzLjkwOTcgMjMuMDkxNyAzMi44MjQgMjUuMjkyM0MzMC40NDU2IDI0LjE0MDMgMjguMDMwNCAyMy4yODM3IDI1LjU5MjkgMjIuNzAwM1Y4LjkyMDYyQzI1LjU5MjkgOC40NDA2MiAyNS4yMTYyIDguMDU2NjIgMjQuNzQzNSA4LjA1NjYySDIxLjcxNTJIMTQuMDg1NEgxMS4wNTdDMTAuNTkxNyA4LjA1NjYyIDEwLjIwNzYgOC40NDA2MiAxMC4yMDc2IDguOTIwNjJWMjIuNzY2OEM3Ljg0NDA3IDIzLjM1MDIgNS40OTUyOCAyNC4xOTIgMy4xODM0MiAyNS4yOTk3QzIuMDkwMjcgMjMuMDkxNyAxLjQ3NzIzIDIwLjYxNzggMS40NzcyMyAxNy45OTYzQzEuNDc3MjMgOC44OTEwOCA4Ljg5MjkgMS40NzY5MiAxOCAxLjQ3NjkyWk00LjEzNjIzIDI2Ljk2MTJDNi4wOTM1NiAyNS45OTM4IDguMTI0NzQgMjUuMjQ4IDEwLjIxNSAyNC43MzExVjMyLjU1ODhDNy43NDA2NiAzMS4yMzY5IDUuNjUwMzkgMjkuMzAyMiA0LjEzNjIzIDI2Ljk2MTJaTTE0LjA4NTQgMzQuMDQzMVYxNS42MDM3QzE0LjA4NTQgMTMuNDY5NSAxNS44MzU5IDExLjcwNDYgMTcuOTI2MSAxMS43MDQ2QzIwLjAxNjQgMTEuNzA0NiAyMS43MTUyIDEzLjQzMjYgMjEuNzE1MiAxNS41NTk0QzIxLjcxNTIgMTUuNTc0MiAyMS43MDc4IDE1LjU4ODkgMjEuNzA3OCAxNS42MDM3SDIxLjcxNTJWMjIuMDIwOUMxOS45MzUyIDIxLjgxNDIgMTguMTQ3NyAyMS43NDc3IDE2LjM2MDMgMjEuODQzN0wxNC44OTA0IDIzLjk3NzhDMTcuMTgwMSAyMy43ODU4IDE5LjQxMDcgMjMuODAwNiAyMS42MTE4IDI0LjA1MTdDMjEuNjM0IDI0LjA1MTcgMjEuNjQ4NyAyNC4wNTE3IDIxLjY3MDkgMjQuMDU5MUMyMS42ODU3IDI0LjA1OTEgMjEuNzAwNSAyNC4wNTkxIDIxLjcyMjYgMjQuMDY2NUMyMi4xMDY3IDI0LjExMDggMjMuNTAyNyAyNC4yODggMjQuNzgwNSAyNC42MDU1TDIxLjcyMjYgMjUuNjQ2OFYzNC4xMDIyQzIwLjUyNjEgMzQuMzc1NCAxOS4yODUyIDM0LjUzMDUgMTguMDE0OCAzNC41MzA1QzE2LjY0ODMgMzQuNTE1NyAxNS4zNDEgMzQuMzQ1OCAxNC4wODU0IDM0LjA0MzFaTTI1LjU4NTYgMzIuNjYyMlYyNC43NjhDMjcuNjY4NCAyNS4yOTIzIDI5LjcyOTIgMjYuMDYwMyAzMS43OTczIDI3LjA2NDZDMzAuMjQ2MiAyOS40MjAzIDI4LjEwNDIgMzEuMzU1MSAyNS41ODU2IDMyLjY2MjJaIiBmaWxsPSJ1cmwoI3BhaW50MF9saW5lYXJfMjIyXzE2NzApIi8+CjxkZWZzPgo8bGluZWFyR3JhZGllbnQgaWQ9InBhaW50MF9saW5lYXJfMjIyXzE2NzAiIHgxPSIxNy45OTk3IiB5MT0iMzYuNzc4OSIgeDI9IjE3Ljk5OTciIHkyPSItNS41MTk3OCIgZ3JhZGllbnRVbml0cz0idXNlclNwYWNlT25Vc2UiPgo8c3RvcCBvZmZzZXQ9IjAuMDg1OCIgc3RvcC1jb2xvcj0iIzhEMjlDMSIvPgo8c3RvcCBvZmZzZXQ9IjAuMjM4MyIgc3RvcC1jb2xvcj0iIzk0MkJCQiIvPgo8c3RvcCBvZmZzZXQ9IjAuNDY2NyIgc3RvcC1jb2xvcj0iI0E5MkZBQyIvPgo8c3RvcCBvZmZzZXQ9IjAuNzQxMyIgc3RvcC1jb2xvcj0iI0NBMzc5MyIvPgo8c3RvcCBvZmZzZXQ9IjEiIHN0b3AtY29sb3I9IiNGMDNGNzciLz4KPC9saW5lYXJHcmFkaWVudD4KPC9kZWZzPgo8L3N2Zz4K";

/// Pontem's vocabulary for its network responses and change events.
pub static PONTEM_NETWORKS: &[(&str, NetworkName)] = &[
    ("Aptos mainnet", NetworkName::Mainnet),
    ("Aptos testnet", NetworkName::Testnet),
    ("Aptos devnet", NetworkName::Devnet),
];

pub fn map_pontem_network(raw: &str) -> Result<NetworkName, WalletError> {
    lookup_network(PONTEM_WALLET_NAME, PONTEM_NETWORKS, raw)
}

/// Native surface of the Pontem extension provider. Every call is
/// asynchronous by contract; `Ok(None)` models the vendor resolving with
/// nothing. The public key lives behind a separate call.
#[async_trait]
pub trait PontemProvider: Send + Sync + 'static {
    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError>;
    async fn account(&self) -> Result<Option<AccountInfo>, ProviderError>;
    async fn public_key(&self) -> Result<Option<String>, ProviderError>;
    async fn disconnect(&self) -> Result<(), ProviderError>;
    async fn sign_and_submit_transaction(
        &self,
        transaction: Value,
        options: Option<Value>,
    ) -> Result<Option<Value>, ProviderError>;
    async fn sign_message(
        &self,
        payload: SignMessagePayload,
    ) -> Result<Option<SignMessageResponse>, ProviderError>;
    /// Either a bare name string or a `{name, chainId?, api?}` object.
    async fn network(&self) -> Result<Option<Value>, ProviderError>;
    async fn on_network_change(&self, listener: RawNetworkListener) -> Result<(), ProviderError>;
    async fn on_account_change(&self, listener: RawAccountListener) -> Result<(), ProviderError>;
}

pub struct PontemWallet<P: PontemProvider> {
    identity: WalletIdentity,
    provider: Option<Arc<P>>,
    subscriptions: Subscriptions,
}

impl<P: PontemProvider> PontemWallet<P> {
    /// `provider` is the injected handle; `None` means the extension is not
    /// installed, and every operation then fails with its own error kind.
    pub fn new(provider: Option<Arc<P>>) -> Result<Self, WalletError> {
        Ok(Self {
            identity: WalletIdentity::new(PONTEM_WALLET_NAME, PONTEM_URL, PONTEM_ICON)?,
            provider,
            subscriptions: Subscriptions::default(),
        })
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    fn provider(
        &self,
        absent: fn(String) -> WalletError,
        operation: &str,
    ) -> Result<&Arc<P>, WalletError> {
        self.provider
            .as_ref()
            .ok_or_else(|| absent(format!("{PONTEM_WALLET_NAME} {operation} Error")))
    }
}

async fn connect_round_trip<P: PontemProvider>(provider: &P) -> Result<AccountInfo, WalletError> {
    let info = provider
        .connect()
        .await
        .map_err(|e| WalletError::Connection(e.message))?;
    info.ok_or_else(|| WalletError::Connection(format!("{PONTEM_WALLET_NAME} Address Info Error")))
}

#[async_trait]
impl<P: PontemProvider> WalletPlugin for PontemWallet<P> {
    fn identity(&self) -> &WalletIdentity {
        &self.identity
    }

    async fn connect(&self) -> Result<AccountInfo, WalletError> {
        let provider = self.provider(WalletError::Connection, "Connect")?;
        connect_round_trip(provider.as_ref()).await
    }

    async fn account(&self) -> Result<AccountInfo, WalletError> {
        let provider = self.provider(WalletError::AccountLookup, "Account")?;
        let response = provider
            .account()
            .await
            .map_err(|e| WalletError::AccountLookup(e.message))?;
        let mut info = response.ok_or_else(|| {
            WalletError::AccountLookup(format!("{PONTEM_WALLET_NAME} Account Error"))
        })?;
        // Pontem exposes the public key through a separate call; merge it,
        // defaulting to empty when the vendor has nothing.
        info.public_key = provider
            .public_key()
            .await
            .map_err(|e| WalletError::AccountLookup(e.message))?
            .unwrap_or_default();
        Ok(info)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        let provider = self.provider(WalletError::Connection, "Disconnect")?;
        provider
            .disconnect()
            .await
            .map_err(|e| WalletError::Connection(e.message))?;
        self.subscriptions.teardown(PONTEM_WALLET_NAME);
        Ok(())
    }

    async fn sign_and_submit_transaction(
        &self,
        transaction: Value,
        options: Option<Value>,
    ) -> Result<SubmittedTransaction, WalletError> {
        let provider =
            self.provider(WalletError::TransactionSubmission, "Sign and Submit Transaction")?;
        let response = provider
            .sign_and_submit_transaction(transaction, options)
            .await
            .map_err(|e| WalletError::TransactionSubmission(e.message))?
            .ok_or_else(|| {
                WalletError::TransactionSubmission(format!(
                    "{PONTEM_WALLET_NAME} Sign and Submit Transaction Error"
                ))
            })?;
        submitted_from_response(PONTEM_WALLET_NAME, response)
    }

    async fn sign_message(
        &self,
        payload: SignMessagePayload,
    ) -> Result<SignMessageResponse, WalletError> {
        if payload.nonce.is_empty() {
            return Err(WalletError::Sign(format!(
                "{PONTEM_WALLET_NAME} Invalid signMessage Payload"
            )));
        }
        let provider = self.provider(WalletError::Sign, "Sign Message")?;
        let response = provider
            .sign_message(payload)
            .await
            .map_err(|e| WalletError::Sign(e.message))?;
        response
            .ok_or_else(|| WalletError::Sign(format!("{PONTEM_WALLET_NAME} Sign Message Error")))
    }

    async fn network(&self) -> Result<NetworkInfo, WalletError> {
        let provider = self.provider(WalletError::Network, "Network")?;
        let response = provider
            .network()
            .await
            .map_err(|e| WalletError::Network(e.message))?
            .ok_or_else(|| WalletError::Network(format!("{PONTEM_WALLET_NAME} Network Error")))?;
        network_from_response(PONTEM_WALLET_NAME, map_pontem_network, response)
    }

    async fn on_network_change(&self, callback: NetworkChangeCallback) -> Result<(), WalletError> {
        let provider = self.provider(WalletError::Network, "Network Change Subscription")?;
        let listener = reshape_network_change(PONTEM_WALLET_NAME, map_pontem_network, callback);
        provider
            .on_network_change(listener)
            .await
            .map_err(|e| WalletError::Network(e.message))?;
        self.subscriptions.register_network(PONTEM_WALLET_NAME);
        Ok(())
    }

    async fn on_account_change(&self, callback: AccountChangeCallback) -> Result<(), WalletError> {
        let provider = self
            .provider(WalletError::AccountLookup, "Account Change Subscription")?
            .clone();
        let connect_provider = Arc::clone(&provider);
        let connect: ConnectFn = Arc::new(move || -> BoxFuture<'static, _> {
            let provider = Arc::clone(&connect_provider);
            Box::pin(async move { connect_round_trip(provider.as_ref()).await })
        });
        let listener = reshape_account_change(PONTEM_WALLET_NAME, connect, callback);
        provider
            .on_account_change(listener)
            .await
            .map_err(|e| WalletError::AccountLookup(e.message))?;
        self.subscriptions.register_account(PONTEM_WALLET_NAME);
        Ok(())
    }
}

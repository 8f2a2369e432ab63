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

pub const FEWCHA_WALLET_NAME: &str = "Fewcha";

const FEWCHA_URL: &str = "https://fewcha.app";

const FEWCHA_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjQiIGhlaWdodD0iMjQiIHZpZXdCb3g9IjAgMCAyNCAyNCIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMjQiIGhlaWdodD0iMjQiIHJ4PSIxMiIgZmlsbD0iIzE2NjNGNSIvPjxwYXRoIGQ9Ik04IDZoOXYyLjZoLTZ2M2g1djIuNmgtNVYxOEg4VjZ6IiBmaWxsPSIjZmZmIi8+PC9zdmc+";

/// Fewcha capitalizes its network names.
pub static FEWCHA_NETWORKS: &[(&str, NetworkName)] = &[
    ("Mainnet", NetworkName::Mainnet),
    ("Testnet", NetworkName::Testnet),
    ("Devnet", NetworkName::Devnet),
];

pub fn map_fewcha_network(raw: &str) -> Result<NetworkName, WalletError> {
    lookup_network(FEWCHA_WALLET_NAME, FEWCHA_NETWORKS, raw)
}

/// Native surface of the Fewcha extension provider.
#[async_trait]
pub trait FewchaProvider: Send + Sync + 'static {
    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError>;
    async fn account(&self) -> Result<Option<AccountInfo>, ProviderError>;
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
    async fn network(&self) -> Result<Option<Value>, ProviderError>;
    async fn on_network_change(&self, listener: RawNetworkListener) -> Result<(), ProviderError>;
    async fn on_account_change(&self, listener: RawAccountListener) -> Result<(), ProviderError>;
}

pub struct FewchaWallet<P: FewchaProvider> {
    identity: WalletIdentity,
    provider: Option<Arc<P>>,
    subscriptions: Subscriptions,
}

impl<P: FewchaProvider> FewchaWallet<P> {
    pub fn new(provider: Option<Arc<P>>) -> Result<Self, WalletError> {
        Ok(Self {
            identity: WalletIdentity::new(FEWCHA_WALLET_NAME, FEWCHA_URL, FEWCHA_ICON)?,
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
            .ok_or_else(|| absent(format!("{FEWCHA_WALLET_NAME} {operation} Error")))
    }
}

async fn connect_round_trip<P: FewchaProvider>(provider: &P) -> Result<AccountInfo, WalletError> {
    let info = provider
        .connect()
        .await
        .map_err(|e| WalletError::Connection(e.message))?;
    info.ok_or_else(|| WalletError::Connection(format!("{FEWCHA_WALLET_NAME} Address Info Error")))
}

#[async_trait]
impl<P: FewchaProvider> WalletPlugin for FewchaWallet<P> {
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
        response.ok_or_else(|| {
            WalletError::AccountLookup(format!("{FEWCHA_WALLET_NAME} Account Error"))
        })
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        let provider = self.provider(WalletError::Connection, "Disconnect")?;
        provider
            .disconnect()
            .await
            .map_err(|e| WalletError::Connection(e.message))?;
        self.subscriptions.teardown(FEWCHA_WALLET_NAME);
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
                    "{FEWCHA_WALLET_NAME} Sign and Submit Transaction Error"
                ))
            })?;
        submitted_from_response(FEWCHA_WALLET_NAME, response)
    }

    async fn sign_message(
        &self,
        payload: SignMessagePayload,
    ) -> Result<SignMessageResponse, WalletError> {
        if payload.nonce.is_empty() {
            return Err(WalletError::Sign(format!(
                "{FEWCHA_WALLET_NAME} Invalid signMessage Payload"
            )));
        }
        let provider = self.provider(WalletError::Sign, "Sign Message")?;
        let response = provider
            .sign_message(payload)
            .await
            .map_err(|e| WalletError::Sign(e.message))?;
        response
            .ok_or_else(|| WalletError::Sign(format!("{FEWCHA_WALLET_NAME} Sign Message Error")))
    }

    async fn network(&self) -> Result<NetworkInfo, WalletError> {
        let provider = self.provider(WalletError::Network, "Network")?;
        let response = provider
            .network()
            .await
            .map_err(|e| WalletError::Network(e.message))?
            .ok_or_else(|| WalletError::Network(format!("{FEWCHA_WALLET_NAME} Network Error")))?;
        network_from_response(FEWCHA_WALLET_NAME, map_fewcha_network, response)
    }

    async fn on_network_change(&self, callback: NetworkChangeCallback) -> Result<(), WalletError> {
        let provider = self.provider(WalletError::Network, "Network Change Subscription")?;
        let listener = reshape_network_change(FEWCHA_WALLET_NAME, map_fewcha_network, callback);
        provider
            .on_network_change(listener)
            .await
            .map_err(|e| WalletError::Network(e.message))?;
        self.subscriptions.register_network(FEWCHA_WALLET_NAME);
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
        let listener = reshape_account_change(FEWCHA_WALLET_NAME, connect, callback);
        provider
            .on_account_change(listener)
            .await
            .map_err(|e| WalletError::AccountLookup(e.message))?;
        self.subscriptions.register_account(FEWCHA_WALLET_NAME);
        Ok(())
    }
}

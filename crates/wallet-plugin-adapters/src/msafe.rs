use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use wallet_plugin_core::{
    AccountChangeCallback, AccountInfo, Handshake, HandshakePhase, NetworkChangeCallback,
    NetworkChangeEvent, NetworkInfo, NetworkName, ProviderError, SignMessagePayload,
    SignMessageResponse, SubmittedTransaction, WalletError, WalletIdentity, WalletPlugin,
};

use crate::config::{AdapterConfig, HostContext};
use crate::events::{reshape_account_change, ConnectFn, RawAccountListener, Subscriptions};
use crate::network::lookup_network;

pub const MSAFE_WALLET_NAME: &str = "MSafe";

const MSAFE_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjQiIGhlaWdodD0iMjQiIHZpZXdCb3g9IjAgMCAyNCAyNCIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMjQiIGhlaWdodD0iMjQiIHJ4PSI2IiBmaWxsPSIjMEYyQTQzIi8+PHBhdGggZD0iTTEyIDNsNyAzdjZjMCA0LjQtMyA3LjYtNyA5LTQtMS40LTctNC42LTctOVY2bDctM3oiIGZpbGw9IiMzRUM2QTgiLz48cGF0aCBkPSJNOSAxMmwyIDIgNC00IiBzdHJva2U9IiMwRjJBNDMiIHN0cm9rZS13aWR0aD0iMS44IiBmaWxsPSJub25lIi8+PC9zdmc+";

/// MSafe already reports canonical network names; the empty table leaves
/// only the canonical pass-through path.
pub static MSAFE_NETWORKS: &[(&str, NetworkName)] = &[];

pub fn map_msafe_network(raw: &str) -> Result<NetworkName, WalletError> {
    lookup_network(MSAFE_WALLET_NAME, MSAFE_NETWORKS, raw)
}

/// MSafe delivers network changes as a bare name string; the chain id has
/// to be fetched separately on every delivery.
pub type MsafeNetworkListener = Box<dyn Fn(String) -> BoxFuture<'static, ()> + Send + Sync>;

/// Native surface of the MSafe multisig provider, reachable only after the
/// origin-restricted handshake has produced a handle.
#[async_trait]
pub trait MsafeProvider: Send + Sync + 'static {
    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError>;
    async fn account(&self) -> Result<Option<AccountInfo>, ProviderError>;
    async fn disconnect(&self) -> Result<(), ProviderError>;
    /// Resolves to the raw bytes of the submitted transaction hash.
    async fn sign_and_submit(
        &self,
        transaction: Value,
        options: Option<Value>,
    ) -> Result<Vec<u8>, ProviderError>;
    async fn network(&self) -> Result<Option<String>, ProviderError>;
    async fn chain_id(&self) -> Result<Option<u64>, ProviderError>;
    async fn on_change_network(&self, listener: MsafeNetworkListener)
        -> Result<(), ProviderError>;
    async fn on_change_account(&self, listener: RawAccountListener) -> Result<(), ProviderError>;
}

/// Negotiates the MSafe provider handle. The dapp only ever runs inside the
/// MSafe application shell; outside of it no negotiation is attempted and
/// the wallet stays unusable.
#[async_trait]
pub trait MsafeTransport: Send + Sync + 'static {
    type Provider: MsafeProvider;

    fn in_app_shell(&self, host: &HostContext) -> bool;

    async fn negotiate(&self, host: &HostContext) -> Result<Arc<Self::Provider>, ProviderError>;
}

pub struct MsafeWallet<T: MsafeTransport> {
    identity: WalletIdentity,
    handshake: Handshake<T::Provider>,
    subscriptions: Subscriptions,
}

impl<T: MsafeTransport> MsafeWallet<T> {
    /// Builds the adapter and, when hosted inside the MSafe shell, runs the
    /// handshake. A refused or failed negotiation still yields a usable
    /// adapter object whose operations fail as if no provider existed.
    pub async fn initialize(
        transport: T,
        host: HostContext,
        config: &AdapterConfig,
    ) -> Result<Self, WalletError> {
        let url = msafe_url(&host, &config.msafe_origins)?;
        let identity = WalletIdentity::new(MSAFE_WALLET_NAME, url, MSAFE_ICON)?;
        let handshake = Handshake::new();

        if transport.in_app_shell(&host) {
            handshake.begin()?;
            debug!(wallet = MSAFE_WALLET_NAME, origin = %host.origin, "negotiating provider handle");
            match transport.negotiate(&host).await {
                Ok(provider) => handshake.complete(provider)?,
                Err(err) => {
                    warn!(wallet = MSAFE_WALLET_NAME, error = %err.message, "handshake failed");
                    handshake.fail(err.message)?;
                }
            }
        } else {
            handshake.fail("not hosted inside the MSafe application shell")?;
        }

        Ok(Self {
            identity,
            handshake,
            subscriptions: Subscriptions::default(),
        })
    }

    pub fn phase(&self) -> HandshakePhase {
        self.handshake.phase()
    }

    /// Awaitable readiness of the negotiated handle.
    pub async fn ready(&self) -> Result<(), WalletError> {
        self.handshake.ready().await.map(|_| ())
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    fn provider(
        &self,
        absent: fn(String) -> WalletError,
        operation: &str,
    ) -> Result<Arc<T::Provider>, WalletError> {
        self.handshake
            .handle()
            .ok_or_else(|| absent(format!("{MSAFE_WALLET_NAME} {operation} Error")))
    }
}

/// Public URL of the adapter: the app-URL form pointing back at the current
/// page when running as a full page, the bare allowed origin otherwise. The
/// current origin is used when allowlisted, else the first configured one.
fn msafe_url(host: &HostContext, origins: &[String]) -> Result<String, WalletError> {
    let base = origins
        .iter()
        .find(|candidate| candidate.as_str() == host.origin)
        .or_else(|| origins.first())
        .ok_or_else(|| {
            WalletError::InvalidIdentity("MSafe origin allowlist is empty".to_owned())
        })?;
    if !host.full_page {
        return Ok(base.clone());
    }
    let mut url = Url::parse(base)
        .map_err(|e| WalletError::InvalidIdentity(format!("invalid MSafe origin {base}: {e}")))?;
    url.set_path("/apps/0");
    url.query_pairs_mut().append_pair("url", &host.href);
    Ok(url.to_string())
}

async fn connect_round_trip<P: MsafeProvider>(provider: &P) -> Result<AccountInfo, WalletError> {
    let info = provider
        .connect()
        .await
        .map_err(|e| WalletError::Connection(e.message))?;
    info.ok_or_else(|| WalletError::Connection(format!("{MSAFE_WALLET_NAME} Address Info Error")))
}

#[async_trait]
impl<T: MsafeTransport> WalletPlugin for MsafeWallet<T> {
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
            WalletError::AccountLookup(format!("{MSAFE_WALLET_NAME} Account Error"))
        })
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        let provider = self.provider(WalletError::Connection, "Disconnect")?;
        provider
            .disconnect()
            .await
            .map_err(|e| WalletError::Connection(e.message))?;
        self.subscriptions.teardown(MSAFE_WALLET_NAME);
        Ok(())
    }

    async fn sign_and_submit_transaction(
        &self,
        transaction: Value,
        options: Option<Value>,
    ) -> Result<SubmittedTransaction, WalletError> {
        let provider =
            self.provider(WalletError::TransactionSubmission, "Sign and Submit Transaction")?;
        let bytes = provider
            .sign_and_submit(transaction, options)
            .await
            .map_err(|e| WalletError::TransactionSubmission(e.message))?;
        if bytes.is_empty() {
            return Err(WalletError::TransactionSubmission(format!(
                "{MSAFE_WALLET_NAME} Sign and Submit Transaction Error"
            )));
        }
        Ok(SubmittedTransaction {
            hash: format!("0x{}", hex::encode(bytes)),
        })
    }

    async fn sign_message(
        &self,
        _payload: SignMessagePayload,
    ) -> Result<SignMessageResponse, WalletError> {
        // The MSafe provider has no message-signing surface.
        Err(WalletError::Sign(format!(
            "{MSAFE_WALLET_NAME} signMessage is not supported"
        )))
    }

    async fn network(&self) -> Result<NetworkInfo, WalletError> {
        let provider = self.provider(WalletError::Network, "Network")?;
        let raw = provider
            .network()
            .await
            .map_err(|e| WalletError::Network(e.message))?
            .ok_or_else(|| WalletError::Network(format!("{MSAFE_WALLET_NAME} Network Error")))?;
        let name = map_msafe_network(&raw)?;
        let chain_id = provider
            .chain_id()
            .await
            .map_err(|e| WalletError::Network(e.message))?
            .map(|id| id.to_string());
        Ok(NetworkInfo {
            name,
            chain_id,
            api: None,
        })
    }

    async fn on_network_change(&self, callback: NetworkChangeCallback) -> Result<(), WalletError> {
        let provider = self.provider(WalletError::Network, "Network Change Subscription")?;
        let proxy_provider = Arc::clone(&provider);
        let listener: MsafeNetworkListener = Box::new(move |raw: String| {
            let provider = Arc::clone(&proxy_provider);
            let callback = Arc::clone(&callback);
            Box::pin(async move {
                let name = match map_msafe_network(&raw) {
                    Ok(name) => name,
                    Err(err) => {
                        warn!(wallet = MSAFE_WALLET_NAME, %err, "dropping network change");
                        return;
                    }
                };
                let chain_id = match provider.chain_id().await {
                    Ok(id) => id.map(|id| id.to_string()),
                    Err(err) => {
                        warn!(wallet = MSAFE_WALLET_NAME, error = %err.message, "chain id fetch failed");
                        None
                    }
                };
                callback(NetworkChangeEvent {
                    name,
                    chain_id,
                    api: None,
                });
            })
        });
        provider
            .on_change_network(listener)
            .await
            .map_err(|e| WalletError::Network(e.message))?;
        self.subscriptions.register_network(MSAFE_WALLET_NAME);
        Ok(())
    }

    async fn on_account_change(&self, callback: AccountChangeCallback) -> Result<(), WalletError> {
        let provider = self.provider(WalletError::AccountLookup, "Account Change Subscription")?;
        let connect_provider = Arc::clone(&provider);
        let connect: ConnectFn = Arc::new(move || -> BoxFuture<'static, _> {
            let provider = Arc::clone(&connect_provider);
            Box::pin(async move { connect_round_trip(provider.as_ref()).await })
        });
        let listener = reshape_account_change(MSAFE_WALLET_NAME, connect, callback);
        provider
            .on_change_account(listener)
            .await
            .map_err(|e| WalletError::AccountLookup(e.message))?;
        self.subscriptions.register_account(MSAFE_WALLET_NAME);
        Ok(())
    }
}

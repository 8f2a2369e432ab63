use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::{debug, warn};

use wallet_plugin_core::{
    AccountChangeCallback, AccountChangeEvent, AccountInfo, NetworkChangeCallback,
    NetworkChangeEvent, NetworkInfo, NetworkName, WalletError,
};

/// Network-change notification as vendors deliver it. Depending on the
/// vendor it carries a vendor-vocabulary `name`, a full descriptor under
/// `network_name`, or both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNetworkChange {
    pub name: Option<String>,
    pub network_name: Option<NetworkInfo>,
    pub chain_id: Option<String>,
    pub api: Option<String>,
}

/// Account-change notification as vendors deliver it; the public key may be
/// missing and then has to be recovered through a connect round-trip.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAccountChange {
    pub address: String,
    pub public_key: Option<String>,
}

pub type RawNetworkListener =
    Box<dyn Fn(RawNetworkChange) -> BoxFuture<'static, ()> + Send + Sync>;
pub type RawAccountListener =
    Box<dyn Fn(RawAccountChange) -> BoxFuture<'static, ()> + Send + Sync>;

pub(crate) type ConnectFn =
    Arc<dyn Fn() -> BoxFuture<'static, Result<AccountInfo, WalletError>> + Send + Sync>;

/// Wraps a canonical network callback into a vendor-shape listener. The
/// canonical callback fires once per populated field, name-keyed field
/// first, so a dual-field payload yields exactly two invocations.
pub(crate) fn reshape_network_change(
    wallet: &'static str,
    map_name: fn(&str) -> Result<NetworkName, WalletError>,
    callback: NetworkChangeCallback,
) -> RawNetworkListener {
    Box::new(move |raw: RawNetworkChange| {
        let callback = Arc::clone(&callback);
        Box::pin(async move {
            if let Some(name) = raw.name.as_deref() {
                match map_name(name) {
                    Ok(canonical) => callback(NetworkChangeEvent {
                        name: canonical,
                        chain_id: raw.chain_id.clone(),
                        api: raw.api.clone(),
                    }),
                    Err(err) => {
                        warn!(wallet, %err, "dropping network change with unmappable name")
                    }
                }
            }
            if let Some(info) = raw.network_name {
                callback(NetworkChangeEvent {
                    name: info.name,
                    chain_id: info.chain_id,
                    api: info.api,
                });
            }
        })
    })
}

/// Wraps a canonical account callback into a vendor-shape listener. A
/// payload that already carries the public key is forwarded directly;
/// otherwise delivery performs a fresh connect round-trip to obtain it, and
/// inherits connect's failure modes.
pub(crate) fn reshape_account_change(
    wallet: &'static str,
    connect: ConnectFn,
    callback: AccountChangeCallback,
) -> RawAccountListener {
    Box::new(move |raw: RawAccountChange| {
        let callback = Arc::clone(&callback);
        let connect = Arc::clone(&connect);
        Box::pin(async move {
            match raw.public_key {
                Some(public_key) => callback(AccountChangeEvent {
                    address: raw.address,
                    public_key,
                }),
                None => match connect().await {
                    Ok(info) => callback(AccountChangeEvent {
                        address: info.address,
                        public_key: info.public_key,
                    }),
                    Err(err) => {
                        warn!(wallet, %err, "account change connect round-trip failed")
                    }
                },
            }
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    #[default]
    Unregistered,
    Registered,
}

/// Listener lifecycle per adapter: Unregistered -> Registered -> Unregistered
/// on disconnect/teardown. There is no other unsubscribe path.
#[derive(Debug, Default)]
pub struct Subscriptions {
    network: Mutex<SubscriptionState>,
    account: Mutex<SubscriptionState>,
}

impl Subscriptions {
    pub fn register_network(&self, wallet: &str) {
        *lock(&self.network) = SubscriptionState::Registered;
        debug!(wallet, "network change listener registered");
    }

    pub fn register_account(&self, wallet: &str) {
        *lock(&self.account) = SubscriptionState::Registered;
        debug!(wallet, "account change listener registered");
    }

    pub fn teardown(&self, wallet: &str) {
        *lock(&self.network) = SubscriptionState::Unregistered;
        *lock(&self.account) = SubscriptionState::Unregistered;
        debug!(wallet, "change listeners torn down");
    }

    pub fn network_state(&self) -> SubscriptionState {
        *lock(&self.network)
    }

    pub fn account_state(&self) -> SubscriptionState {
        *lock(&self.account)
    }
}

fn lock(slot: &Mutex<SubscriptionState>) -> std::sync::MutexGuard<'_, SubscriptionState> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

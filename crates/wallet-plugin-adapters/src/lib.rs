pub mod config;
pub mod events;
pub mod fewcha;
pub mod msafe;
pub mod network;
pub mod pontem;
pub mod response;
pub mod rise;

pub use config::{AdapterConfig, HostContext};
pub use events::{
    RawAccountChange, RawAccountListener, RawNetworkChange, RawNetworkListener, SubscriptionState,
    Subscriptions,
};
pub use fewcha::{FewchaProvider, FewchaWallet, FEWCHA_WALLET_NAME};
pub use msafe::{MsafeNetworkListener, MsafeProvider, MsafeTransport, MsafeWallet, MSAFE_WALLET_NAME};
pub use network::lookup_network;
pub use pontem::{PontemProvider, PontemWallet, PONTEM_WALLET_NAME};
pub use rise::{RiseProvider, RiseWallet, RISE_WALLET_NAME};

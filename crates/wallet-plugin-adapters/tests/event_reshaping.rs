mod common;

use std::sync::Arc;

use common::{account, account_recorder, network_recorder, MockExtension, Reply};
use wallet_plugin_adapters::{
    PontemWallet, RawAccountChange, RawNetworkChange, SubscriptionState,
};
use wallet_plugin_core::{NetworkInfo, NetworkName, ProviderError, WalletPlugin};

fn wallet(mock: &Arc<MockExtension>) -> PontemWallet<MockExtension> {
    PontemWallet::new(Some(Arc::clone(mock))).expect("identity is valid")
}

#[tokio::test]
async fn dual_field_network_event_fires_twice_name_first() {
    let mock = Arc::new(MockExtension::default());
    let wallet = wallet(&mock);
    let (callback, events) = network_recorder();
    wallet.on_network_change(callback).await.expect("register");

    mock.fire_network(RawNetworkChange {
        name: Some("Aptos mainnet".to_owned()),
        network_name: Some(NetworkInfo {
            name: NetworkName::Devnet,
            chain_id: Some("34".to_owned()),
            api: None,
        }),
        chain_id: Some("1".to_owned()),
        api: Some("https://fullnode.mainnet.aptoslabs.com".to_owned()),
    })
    .await;

    let events = events.lock().expect("events");
    assert_eq!(events.len(), 2);
    // Name-keyed field first, full descriptor second.
    assert_eq!(events[0].name, NetworkName::Mainnet);
    assert_eq!(events[0].chain_id.as_deref(), Some("1"));
    assert_eq!(
        events[0].api.as_deref(),
        Some("https://fullnode.mainnet.aptoslabs.com")
    );
    assert_eq!(events[1].name, NetworkName::Devnet);
    assert_eq!(events[1].chain_id.as_deref(), Some("34"));
    assert!(events[1].api.is_none());
}

#[tokio::test]
async fn single_field_network_event_fires_once() {
    let mock = Arc::new(MockExtension::default());
    let wallet = wallet(&mock);
    let (callback, events) = network_recorder();
    wallet.on_network_change(callback).await.expect("register");

    mock.fire_network(RawNetworkChange {
        name: Some("Aptos devnet".to_owned()),
        ..RawNetworkChange::default()
    })
    .await;

    let events = events.lock().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, NetworkName::Devnet);
}

#[tokio::test]
async fn unmappable_name_is_dropped_but_descriptor_still_delivered() {
    let mock = Arc::new(MockExtension::default());
    let wallet = wallet(&mock);
    let (callback, events) = network_recorder();
    wallet.on_network_change(callback).await.expect("register");

    mock.fire_network(RawNetworkChange {
        name: Some("Aptos localnet".to_owned()),
        network_name: Some(NetworkInfo {
            name: NetworkName::Testnet,
            chain_id: None,
            api: None,
        }),
        ..RawNetworkChange::default()
    })
    .await;

    let events = events.lock().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, NetworkName::Testnet);
}

#[tokio::test]
async fn account_event_with_public_key_skips_connect() {
    let mock = Arc::new(MockExtension::default());
    let wallet = wallet(&mock);
    let (callback, events) = account_recorder();
    wallet.on_account_change(callback).await.expect("register");

    mock.fire_account(RawAccountChange {
        address: "0xa11ce".to_owned(),
        public_key: Some("0xfeed".to_owned()),
    })
    .await;

    assert_eq!(mock.connect_calls(), 0);
    let events = events.lock().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].address, "0xa11ce");
    assert_eq!(events[0].public_key, "0xfeed");
}

#[tokio::test]
async fn account_event_without_public_key_round_trips_through_connect() {
    let mock = Arc::new(MockExtension::default());
    mock.set_connect(Reply::Value(account("0xb0b", "0xcafe")));
    let wallet = wallet(&mock);
    let (callback, events) = account_recorder();
    wallet.on_account_change(callback).await.expect("register");

    mock.fire_account(RawAccountChange {
        address: "0xb0b".to_owned(),
        public_key: None,
    })
    .await;

    assert_eq!(mock.connect_calls(), 1);
    let events = events.lock().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].public_key, "0xcafe");
}

#[tokio::test]
async fn account_event_connect_failure_drops_the_delivery() {
    let mock = Arc::new(MockExtension::default());
    mock.set_connect(Reply::Failure(ProviderError::new("wallet locked")));
    let wallet = wallet(&mock);
    let (callback, events) = account_recorder();
    wallet.on_account_change(callback).await.expect("register");

    mock.fire_account(RawAccountChange {
        address: "0xb0b".to_owned(),
        public_key: None,
    })
    .await;

    assert_eq!(mock.connect_calls(), 1);
    assert!(events.lock().expect("events").is_empty());
}

#[tokio::test]
async fn subscriptions_track_registration_and_teardown() {
    let mock = Arc::new(MockExtension::default());
    let wallet = wallet(&mock);
    assert_eq!(
        wallet.subscriptions().network_state(),
        SubscriptionState::Unregistered
    );

    let (network_callback, _) = network_recorder();
    let (account_callback, _) = account_recorder();
    wallet
        .on_network_change(network_callback)
        .await
        .expect("register network");
    wallet
        .on_account_change(account_callback)
        .await
        .expect("register account");
    assert_eq!(
        wallet.subscriptions().network_state(),
        SubscriptionState::Registered
    );
    assert_eq!(
        wallet.subscriptions().account_state(),
        SubscriptionState::Registered
    );

    wallet.disconnect().await.expect("disconnect");
    assert_eq!(
        wallet.subscriptions().network_state(),
        SubscriptionState::Unregistered
    );
    assert_eq!(
        wallet.subscriptions().account_state(),
        SubscriptionState::Unregistered
    );
}

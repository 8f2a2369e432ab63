#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use wallet_plugin_adapters::msafe::{MsafeNetworkListener, MsafeProvider, MsafeTransport};
use wallet_plugin_adapters::{
    FewchaProvider, HostContext, PontemProvider, RawAccountChange, RawAccountListener,
    RawNetworkChange, RawNetworkListener, RiseProvider,
};
use wallet_plugin_core::{
    AccountChangeCallback, AccountChangeEvent, AccountInfo, NetworkChangeCallback,
    NetworkChangeEvent, ProviderError, SignMessagePayload, SignMessageResponse,
};

/// What a mocked vendor call resolves to: nothing, a value, or a rejection.
#[derive(Debug, Clone, Default)]
pub enum Reply<T> {
    #[default]
    Missing,
    Value(T),
    Failure(ProviderError),
}

impl<T: Clone> Reply<T> {
    pub fn resolve(&self) -> Result<Option<T>, ProviderError> {
        match self {
            Reply::Missing => Ok(None),
            Reply::Value(value) => Ok(Some(value.clone())),
            Reply::Failure(err) => Err(err.clone()),
        }
    }
}

fn set<T>(slot: &Mutex<T>, value: T) {
    *slot.lock().expect("mock lock") = value;
}

/// One mock standing in for all three extension-style providers; the
/// Pontem-only `public_key` surface is simply unused by the others.
#[derive(Default)]
pub struct MockExtension {
    pub connect_reply: Mutex<Reply<AccountInfo>>,
    pub connect_calls: AtomicUsize,
    pub account_reply: Mutex<Reply<AccountInfo>>,
    pub public_key_reply: Mutex<Reply<String>>,
    pub disconnect_error: Mutex<Option<ProviderError>>,
    pub tx_reply: Mutex<Reply<Value>>,
    pub sign_reply: Mutex<Reply<SignMessageResponse>>,
    pub sign_calls: AtomicUsize,
    pub network_reply: Mutex<Reply<Value>>,
    pub subscribe_error: Mutex<Option<ProviderError>>,
    pub network_listener: Mutex<Option<RawNetworkListener>>,
    pub account_listener: Mutex<Option<RawAccountListener>>,
}

impl MockExtension {
    pub fn with_connect(info: AccountInfo) -> Arc<Self> {
        let mock = Arc::new(Self::default());
        mock.set_connect(Reply::Value(info));
        mock
    }

    pub fn set_connect(&self, reply: Reply<AccountInfo>) {
        set(&self.connect_reply, reply);
    }

    pub fn set_account(&self, reply: Reply<AccountInfo>) {
        set(&self.account_reply, reply);
    }

    pub fn set_public_key(&self, reply: Reply<String>) {
        set(&self.public_key_reply, reply);
    }

    pub fn set_tx(&self, reply: Reply<Value>) {
        set(&self.tx_reply, reply);
    }

    pub fn set_sign(&self, reply: Reply<SignMessageResponse>) {
        set(&self.sign_reply, reply);
    }

    pub fn set_network(&self, reply: Reply<Value>) {
        set(&self.network_reply, reply);
    }

    pub fn set_subscribe_error(&self, err: ProviderError) {
        set(&self.subscribe_error, Some(err));
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    /// Delivers a vendor network-change notification through the listener
    /// the adapter registered.
    pub async fn fire_network(&self, raw: RawNetworkChange) {
        let fut = {
            let guard = self.network_listener.lock().expect("mock lock");
            let listener = guard.as_ref().expect("network listener registered");
            listener(raw)
        };
        fut.await;
    }

    pub async fn fire_account(&self, raw: RawAccountChange) {
        let fut = {
            let guard = self.account_listener.lock().expect("mock lock");
            let listener = guard.as_ref().expect("account listener registered");
            listener(raw)
        };
        fut.await;
    }

    fn check_subscribe(&self) -> Result<(), ProviderError> {
        match self.subscribe_error.lock().expect("mock lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

macro_rules! impl_extension_provider {
    ($trait_name:ident) => {
        #[async_trait]
        impl $trait_name for MockExtension {
            async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError> {
                self.connect_calls.fetch_add(1, Ordering::SeqCst);
                self.connect_reply.lock().expect("mock lock").resolve()
            }

            async fn account(&self) -> Result<Option<AccountInfo>, ProviderError> {
                self.account_reply.lock().expect("mock lock").resolve()
            }

            async fn disconnect(&self) -> Result<(), ProviderError> {
                match self.disconnect_error.lock().expect("mock lock").clone() {
                    Some(err) => Err(err),
                    None => Ok(()),
                }
            }

            async fn sign_and_submit_transaction(
                &self,
                _transaction: Value,
                _options: Option<Value>,
            ) -> Result<Option<Value>, ProviderError> {
                self.tx_reply.lock().expect("mock lock").resolve()
            }

            async fn sign_message(
                &self,
                _payload: SignMessagePayload,
            ) -> Result<Option<SignMessageResponse>, ProviderError> {
                self.sign_calls.fetch_add(1, Ordering::SeqCst);
                self.sign_reply.lock().expect("mock lock").resolve()
            }

            async fn network(&self) -> Result<Option<Value>, ProviderError> {
                self.network_reply.lock().expect("mock lock").resolve()
            }

            async fn on_network_change(
                &self,
                listener: RawNetworkListener,
            ) -> Result<(), ProviderError> {
                self.check_subscribe()?;
                *self.network_listener.lock().expect("mock lock") = Some(listener);
                Ok(())
            }

            async fn on_account_change(
                &self,
                listener: RawAccountListener,
            ) -> Result<(), ProviderError> {
                self.check_subscribe()?;
                *self.account_listener.lock().expect("mock lock") = Some(listener);
                Ok(())
            }
        }
    };
}

impl_extension_provider!(RiseProvider);
impl_extension_provider!(FewchaProvider);

#[async_trait]
impl PontemProvider for MockExtension {
    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.connect_reply.lock().expect("mock lock").resolve()
    }

    async fn account(&self) -> Result<Option<AccountInfo>, ProviderError> {
        self.account_reply.lock().expect("mock lock").resolve()
    }

    async fn public_key(&self) -> Result<Option<String>, ProviderError> {
        self.public_key_reply.lock().expect("mock lock").resolve()
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        match self.disconnect_error.lock().expect("mock lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn sign_and_submit_transaction(
        &self,
        _transaction: Value,
        _options: Option<Value>,
    ) -> Result<Option<Value>, ProviderError> {
        self.tx_reply.lock().expect("mock lock").resolve()
    }

    async fn sign_message(
        &self,
        _payload: SignMessagePayload,
    ) -> Result<Option<SignMessageResponse>, ProviderError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_reply.lock().expect("mock lock").resolve()
    }

    async fn network(&self) -> Result<Option<Value>, ProviderError> {
        self.network_reply.lock().expect("mock lock").resolve()
    }

    async fn on_network_change(&self, listener: RawNetworkListener) -> Result<(), ProviderError> {
        self.check_subscribe()?;
        *self.network_listener.lock().expect("mock lock") = Some(listener);
        Ok(())
    }

    async fn on_account_change(&self, listener: RawAccountListener) -> Result<(), ProviderError> {
        self.check_subscribe()?;
        *self.account_listener.lock().expect("mock lock") = Some(listener);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockMsafe {
    pub connect_reply: Mutex<Reply<AccountInfo>>,
    pub connect_calls: AtomicUsize,
    pub account_reply: Mutex<Reply<AccountInfo>>,
    pub disconnect_error: Mutex<Option<ProviderError>>,
    pub sign_reply: Mutex<Reply<Vec<u8>>>,
    pub network_reply: Mutex<Reply<String>>,
    pub chain_id_reply: Mutex<Reply<u64>>,
    pub network_listener: Mutex<Option<MsafeNetworkListener>>,
    pub account_listener: Mutex<Option<RawAccountListener>>,
}

impl MockMsafe {
    pub fn set_connect(&self, reply: Reply<AccountInfo>) {
        set(&self.connect_reply, reply);
    }

    pub fn set_account(&self, reply: Reply<AccountInfo>) {
        set(&self.account_reply, reply);
    }

    pub fn set_sign(&self, reply: Reply<Vec<u8>>) {
        set(&self.sign_reply, reply);
    }

    pub fn set_network(&self, reply: Reply<String>) {
        set(&self.network_reply, reply);
    }

    pub fn set_chain_id(&self, reply: Reply<u64>) {
        set(&self.chain_id_reply, reply);
    }

    pub async fn fire_network(&self, raw: &str) {
        let fut = {
            let guard = self.network_listener.lock().expect("mock lock");
            let listener = guard.as_ref().expect("network listener registered");
            listener(raw.to_owned())
        };
        fut.await;
    }

    pub async fn fire_account(&self, raw: RawAccountChange) {
        let fut = {
            let guard = self.account_listener.lock().expect("mock lock");
            let listener = guard.as_ref().expect("account listener registered");
            listener(raw)
        };
        fut.await;
    }
}

#[async_trait]
impl MsafeProvider for MockMsafe {
    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.connect_reply.lock().expect("mock lock").resolve()
    }

    async fn account(&self) -> Result<Option<AccountInfo>, ProviderError> {
        self.account_reply.lock().expect("mock lock").resolve()
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        match self.disconnect_error.lock().expect("mock lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn sign_and_submit(
        &self,
        _transaction: Value,
        _options: Option<Value>,
    ) -> Result<Vec<u8>, ProviderError> {
        let bytes = self.sign_reply.lock().expect("mock lock").resolve()?;
        Ok(bytes.unwrap_or_default())
    }

    async fn network(&self) -> Result<Option<String>, ProviderError> {
        self.network_reply.lock().expect("mock lock").resolve()
    }

    async fn chain_id(&self) -> Result<Option<u64>, ProviderError> {
        self.chain_id_reply.lock().expect("mock lock").resolve()
    }

    async fn on_change_network(
        &self,
        listener: MsafeNetworkListener,
    ) -> Result<(), ProviderError> {
        *self.network_listener.lock().expect("mock lock") = Some(listener);
        Ok(())
    }

    async fn on_change_account(&self, listener: RawAccountListener) -> Result<(), ProviderError> {
        *self.account_listener.lock().expect("mock lock") = Some(listener);
        Ok(())
    }
}

pub struct MockMsafeTransport {
    pub in_shell: bool,
    pub provider: Option<Arc<MockMsafe>>,
}

#[async_trait]
impl MsafeTransport for MockMsafeTransport {
    type Provider = MockMsafe;

    fn in_app_shell(&self, _host: &HostContext) -> bool {
        self.in_shell
    }

    async fn negotiate(&self, _host: &HostContext) -> Result<Arc<MockMsafe>, ProviderError> {
        self.provider
            .clone()
            .ok_or_else(|| ProviderError::new("origin rejected by MSafe"))
    }
}

pub fn account(address: &str, public_key: &str) -> AccountInfo {
    AccountInfo {
        address: address.to_owned(),
        public_key: public_key.to_owned(),
        ans_name: None,
    }
}

pub fn host(origin: &str, full_page: bool) -> HostContext {
    HostContext {
        origin: origin.to_owned(),
        href: format!("{origin}/trade?pair=APT-USDC"),
        full_page,
    }
}

pub fn sign_payload(nonce: &str) -> SignMessagePayload {
    SignMessagePayload {
        message: "hello".to_owned(),
        nonce: nonce.to_owned(),
        address: None,
        application: None,
        chain_id: None,
    }
}

pub fn sign_response(nonce: &str) -> SignMessageResponse {
    SignMessageResponse {
        address: None,
        application: None,
        chain_id: Some(1),
        full_message: format!("APTOS\nmessage: hello\nnonce: {nonce}"),
        message: "hello".to_owned(),
        nonce: nonce.to_owned(),
        prefix: "APTOS".to_owned(),
        signature: "0xsigned".to_owned(),
    }
}

pub fn network_recorder() -> (NetworkChangeCallback, Arc<Mutex<Vec<NetworkChangeEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: NetworkChangeCallback =
        Arc::new(move |event| sink.lock().expect("recorder lock").push(event));
    (callback, events)
}

pub fn account_recorder() -> (AccountChangeCallback, Arc<Mutex<Vec<AccountChangeEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: AccountChangeCallback =
        Arc::new(move |event| sink.lock().expect("recorder lock").push(event));
    (callback, events)
}

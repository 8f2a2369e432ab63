use std::sync::{Arc, OnceLock};

use tokio::sync::watch;

use crate::error::WalletError;

/// Connection-establishment phase for providers that only become usable
/// after an asynchronous negotiation (multisig wallets hosted in their own
/// application shell). Write-once: negotiation is never re-entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakePhase {
    Uninitialized,
    Negotiating,
    Ready,
    Failed(String),
}

/// Holds the provider handle behind the handshake state machine
/// `Uninitialized -> Negotiating -> Ready | Failed`. Until the machine
/// reaches `Ready`, [`Handshake::handle`] reports the handle as absent and
/// binding calls fail with their operation-specific errors. Readiness is
/// also exposed as an awaitable via [`Handshake::ready`].
#[derive(Debug)]
pub struct Handshake<T> {
    phase: watch::Sender<HandshakePhase>,
    handle: OnceLock<Arc<T>>,
}

impl<T> Handshake<T> {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(HandshakePhase::Uninitialized);
        Self {
            phase,
            handle: OnceLock::new(),
        }
    }

    pub fn phase(&self) -> HandshakePhase {
        self.phase.borrow().clone()
    }

    /// `Uninitialized -> Negotiating`.
    pub fn begin(&self) -> Result<(), WalletError> {
        self.transition(
            |phase| matches!(phase, HandshakePhase::Uninitialized),
            HandshakePhase::Negotiating,
            "begin",
        )
    }

    /// `Negotiating -> Ready`, caching the negotiated handle.
    pub fn complete(&self, handle: Arc<T>) -> Result<(), WalletError> {
        if self.handle.set(handle).is_err() {
            return Err(WalletError::HandshakeFailed(
                "provider handle already established".to_owned(),
            ));
        }
        self.transition(
            |phase| matches!(phase, HandshakePhase::Negotiating),
            HandshakePhase::Ready,
            "complete",
        )
    }

    /// Terminal failure. Allowed from `Uninitialized` as well, for vendors
    /// that refuse to negotiate outside their own application shell.
    pub fn fail(&self, reason: impl Into<String>) -> Result<(), WalletError> {
        self.transition(
            |phase| {
                matches!(
                    phase,
                    HandshakePhase::Uninitialized | HandshakePhase::Negotiating
                )
            },
            HandshakePhase::Failed(reason.into()),
            "fail",
        )
    }

    /// The cached provider handle, present only once negotiation completed.
    pub fn handle(&self) -> Option<Arc<T>> {
        match self.phase() {
            HandshakePhase::Ready => self.handle.get().cloned(),
            _ => None,
        }
    }

    /// Awaits a terminal phase and yields the handle or the failure reason.
    pub async fn ready(&self) -> Result<Arc<T>, WalletError> {
        let mut rx = self.phase.subscribe();
        loop {
            let phase = rx.borrow_and_update().clone();
            match phase {
                HandshakePhase::Ready => {
                    return self.handle.get().cloned().ok_or_else(|| {
                        WalletError::HandshakeFailed(
                            "ready phase reached without a provider handle".to_owned(),
                        )
                    });
                }
                HandshakePhase::Failed(reason) => {
                    return Err(WalletError::HandshakeFailed(reason));
                }
                HandshakePhase::Uninitialized | HandshakePhase::Negotiating => {
                    if rx.changed().await.is_err() {
                        return Err(WalletError::HandshakeFailed(
                            "handshake abandoned".to_owned(),
                        ));
                    }
                }
            }
        }
    }

    fn transition(
        &self,
        allowed: impl Fn(&HandshakePhase) -> bool,
        next: HandshakePhase,
        action: &str,
    ) -> Result<(), WalletError> {
        let mut rejected_from = None;
        self.phase.send_modify(|phase| {
            if allowed(phase) {
                *phase = next.clone();
            } else {
                rejected_from = Some(phase.clone());
            }
        });
        match rejected_from {
            None => Ok(()),
            Some(from) => Err(WalletError::HandshakeFailed(format!(
                "invalid {action} transition from {from:?}"
            ))),
        }
    }
}

impl<T> Default for Handshake<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Wallet session state shared by every screen.
//!
//! [`SessionProvider`] is the only writer. Everything else holds a
//! [`SessionHandle`], which can read the current session and observe changes.

use alloy_primitives::Address;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::{
    client::wallet::{Connector, Wallet, WalletEvent},
    config::Config,
    error::{ConnectionError, ReadError, WriteError},
    types::ChainId,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
}

/// Why a session cannot serve a contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFault {
    NotConnected,
    WrongNetwork { expected: ChainId, actual: u64 },
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.connected && self.account.is_some()
    }

    /// Returns the account if the session is usable against `expected`.
    pub fn require(&self, expected: ChainId) -> Result<Address, SessionFault> {
        let (true, Some(account)) = (self.connected, self.account) else {
            return Err(SessionFault::NotConnected);
        };

        match self.chain_id {
            Some(actual) if actual == expected.to_u64() => Ok(account),
            Some(actual) => Err(SessionFault::WrongNetwork { expected, actual }),
            None => Err(SessionFault::NotConnected),
        }
    }
}

impl From<SessionFault> for ReadError {
    fn from(fault: SessionFault) -> Self {
        match fault {
            SessionFault::NotConnected => ReadError::NotConnected,
            SessionFault::WrongNetwork { expected, actual } => {
                ReadError::WrongNetwork { expected, actual }
            }
        }
    }
}

impl From<SessionFault> for WriteError {
    fn from(fault: SessionFault) -> Self {
        match fault {
            SessionFault::NotConnected => WriteError::NotConnected,
            SessionFault::WrongNetwork { expected, actual } => {
                WriteError::WrongNetwork { expected, actual }
            }
        }
    }
}

/// Read-only view of the live session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    receiver: watch::Receiver<Session>,
}

impl SessionHandle {
    pub fn current(&self) -> Session {
        self.receiver.borrow().clone()
    }

    pub fn account(&self) -> Option<Address> {
        self.receiver.borrow().account
    }

    pub fn is_connected(&self) -> bool {
        self.receiver.borrow().is_connected()
    }

    /// Yields the current session immediately, then every change.
    pub fn changes(&self) -> WatchStream<Session> {
        WatchStream::new(self.receiver.clone())
    }
}

/// Owns the session and applies connect, disconnect and wallet events.
#[derive(Debug)]
pub struct SessionProvider {
    sender: watch::Sender<Session>,
    connectors: Vec<Connector>,
}

impl SessionProvider {
    pub fn new(connectors: Vec<Connector>) -> Self {
        let (sender, _) = watch::channel(Session::default());

        Self { sender, connectors }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.connectors())
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn current(&self) -> Session {
        self.sender.borrow().clone()
    }

    /// Runs the wallet's selection flow. A cancelled flow leaves the session untouched.
    pub async fn connect(&self, wallet: &dyn Wallet) -> Result<Session, ConnectionError> {
        let connector = wallet.connector();
        if !self.connectors.contains(&connector) {
            warn!(connector = connector.name(), "Connector is not offered");
            return Err(ConnectionError::NoWalletAvailable);
        }

        match wallet.request_connection().await? {
            Some(account) => {
                info!(
                    connector = connector.name(),
                    account = %account.address,
                    chain_id = account.chain_id,
                    "Wallet connected"
                );

                self.sender.send_replace(Session {
                    connected: true,
                    account: Some(account.address),
                    chain_id: Some(account.chain_id),
                });
            }
            None => debug!(connector = connector.name(), "Connection cancelled"),
        }

        Ok(self.current())
    }

    pub async fn disconnect(&self, wallet: &dyn Wallet) {
        wallet.disconnect().await;
        self.clear();
    }

    /// Applies an account or network change pushed by the wallet.
    pub fn handle_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(Some(account)) => {
                self.sender.send_if_modified(|session| {
                    if !session.connected || session.account == Some(account) {
                        return false;
                    }
                    info!(%account, "Account changed");
                    session.account = Some(account);
                    true
                });
            }
            // An empty account list means the wallet was locked
            WalletEvent::AccountsChanged(None) | WalletEvent::Disconnected => self.clear(),
            WalletEvent::ChainChanged(chain_id) => {
                self.sender.send_if_modified(|session| {
                    if !session.connected || session.chain_id == Some(chain_id) {
                        return false;
                    }
                    info!(chain_id, "Network changed");
                    session.chain_id = Some(chain_id);
                    true
                });
            }
        }
    }

    fn clear(&self) {
        self.sender.send_if_modified(|session| {
            if *session == Session::default() {
                return false;
            }
            info!("Wallet disconnected");
            *session = Session::default();
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockWallet, account_a, account_b};

    fn provider() -> SessionProvider {
        SessionProvider::from_config(&Config::sepolia())
    }

    #[tokio::test]
    async fn connect_populates_session() {
        let sessions = provider();
        let wallet = MockWallet::connected(account_a());

        let session = sessions.connect(&wallet).await.unwrap();

        assert!(session.is_connected());
        assert_eq!(session.account, Some(account_a()));
        assert_eq!(session.require(ChainId::Sepolia), Ok(account_a()));
    }

    #[tokio::test]
    async fn cancelled_connect_leaves_session_unchanged() {
        let sessions = provider();
        let wallet = MockWallet::cancelling();

        let session = sessions.connect(&wallet).await.unwrap();

        assert_eq!(session, Session::default());
        assert_eq!(sessions.current().require(ChainId::Sepolia), Err(SessionFault::NotConnected));
    }

    #[tokio::test]
    async fn connection_errors_propagate() {
        let sessions = provider();
        let wallet = MockWallet::unavailable();

        let result = sessions.connect(&wallet).await;

        assert_eq!(result, Err(ConnectionError::NoWalletAvailable));
        assert!(!sessions.current().is_connected());
    }

    #[tokio::test]
    async fn unoffered_connector_is_refused() {
        let sessions = SessionProvider::new(vec![Connector::Injected]);
        let wallet = MockWallet::connected(account_a());

        assert_eq!(
            sessions.connect(&wallet).await,
            Err(ConnectionError::NoWalletAvailable)
        );
    }

    #[tokio::test]
    async fn wallet_events_update_session() {
        let sessions = provider();
        let handle = sessions.handle();
        sessions.connect(&MockWallet::connected(account_a())).await.unwrap();

        sessions.handle_event(WalletEvent::AccountsChanged(Some(account_b())));
        assert_eq!(handle.account(), Some(account_b()));

        sessions.handle_event(WalletEvent::ChainChanged(1));
        assert_eq!(
            handle.current().require(ChainId::Sepolia),
            Err(SessionFault::WrongNetwork {
                expected: ChainId::Sepolia,
                actual: 1
            })
        );

        sessions.handle_event(WalletEvent::Disconnected);
        assert_eq!(handle.current(), Session::default());
    }

    #[tokio::test]
    async fn events_before_connect_are_ignored() {
        let sessions = provider();

        sessions.handle_event(WalletEvent::AccountsChanged(Some(account_a())));
        sessions.handle_event(WalletEvent::ChainChanged(1));

        assert_eq!(sessions.current(), Session::default());
    }

    #[tokio::test]
    async fn repeated_event_does_not_notify() {
        let sessions = provider();
        sessions.connect(&MockWallet::connected(account_a())).await.unwrap();

        let mut receiver = sessions.sender.subscribe();
        receiver.mark_unchanged();

        sessions.handle_event(WalletEvent::AccountsChanged(Some(account_a())));
        assert!(!receiver.has_changed().unwrap());

        sessions.handle_event(WalletEvent::AccountsChanged(Some(account_b())));
        assert!(receiver.has_changed().unwrap());
    }

    #[tokio::test]
    async fn disconnect_clears_session() {
        let sessions = provider();
        let wallet = MockWallet::connected(account_a());
        sessions.connect(&wallet).await.unwrap();

        sessions.disconnect(&wallet).await;

        assert!(!sessions.current().is_connected());
        assert_eq!(sessions.current().account, None);
    }
}

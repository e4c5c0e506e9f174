use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConnectionError, WalletError},
    types::receipt::TransactionRequest,
};

/// Connection mechanisms offered in the wallet-selection flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    /// Remote wallets paired through a relay; the QR modal belongs to the wallet layer.
    WalletConnect { project_id: String },
    /// A wallet injected into the host environment.
    Injected,
}

impl Connector {
    pub fn name(&self) -> &'static str {
        match self {
            Connector::WalletConnect { .. } => "WalletConnect",
            Connector::Injected => "Injected",
        }
    }
}

/// What a successful connection yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletAccount {
    pub address: Address,
    pub chain_id: u64,
}

/// Changes pushed by the wallet after a session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Option<Address>),
    ChainChanged(u64),
    Disconnected,
}

/// Seam to the wallet-connection layer, which owns keys, signing and the
/// approval UI.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn connector(&self) -> Connector;

    /// Opens the selection flow. `Ok(None)` means the user cancelled.
    async fn request_connection(&self) -> Result<Option<WalletAccount>, ConnectionError>;

    /// Asks the user to approve, then broadcasts. Returns the transaction hash.
    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, WalletError>;

    async fn disconnect(&self) {}
}

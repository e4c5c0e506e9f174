use alloy_primitives::B256;

use crate::types::ChainId;

/// Errors raised while opening or using a wallet session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("No wallet available")]
    NoWalletAvailable,

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Wallet connection failed: {0}")]
    Wallet(String),
}

/// Errors returned by the JSON-RPC provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed RPC response: {0}")]
    Decode(String),

    #[error("RPC request timed out")]
    Timeout,
}

/// Errors reported by the wallet when asked to sign and send.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("User rejected the request: {0}")]
    Rejected(String),

    #[error("Insufficient funds for gas: {0}")]
    InsufficientFunds(String),

    #[error("Wallet unavailable")]
    Unavailable,

    #[error("Wallet error: {0}")]
    Other(String),
}

/// Errors surfaced by a read binder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Wrong network: expected {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: ChainId, actual: u64 },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Could not encode call: {0}")]
    Encode(String),

    #[error("Could not decode result: {0}")]
    Decode(String),
}

/// What ended a transaction, used to pick the UI copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotConnected,
    WrongNetwork,
    Encoding,
    UserRejected,
    InsufficientFunds,
    Reverted,
    Timeout,
    Network,
}

/// Errors that terminate (or refuse) a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Wrong network: expected {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: ChainId, actual: u64 },

    #[error("A transaction from this form is already in progress")]
    AlreadyPending,

    #[error("Could not encode call: {0}")]
    Encode(String),

    #[error("Transaction rejected in wallet: {0}")]
    UserRejected(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Transaction {hash} reverted on-chain")]
    Reverted { hash: B256 },

    #[error("Timed out waiting for transaction {hash}")]
    Timeout { hash: B256 },

    #[error("Network error: {0}")]
    Network(String),
}

impl WriteError {
    /// `AlreadyPending` never reaches a handle, so it has no kind of its own.
    pub fn kind(&self) -> FailureKind {
        match self {
            WriteError::NotConnected => FailureKind::NotConnected,
            WriteError::WrongNetwork { .. } => FailureKind::WrongNetwork,
            WriteError::AlreadyPending | WriteError::Encode(_) => FailureKind::Encoding,
            WriteError::UserRejected(_) => FailureKind::UserRejected,
            WriteError::InsufficientFunds(_) => FailureKind::InsufficientFunds,
            WriteError::Reverted { .. } => FailureKind::Reverted,
            WriteError::Timeout { .. } => FailureKind::Timeout,
            WriteError::Network(_) => FailureKind::Network,
        }
    }
}

impl From<WalletError> for WriteError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rejected(reason) => WriteError::UserRejected(reason),
            WalletError::InsufficientFunds(reason) => WriteError::InsufficientFunds(reason),
            WalletError::Unavailable => WriteError::NotConnected,
            WalletError::Other(reason) => WriteError::Network(reason),
        }
    }
}

/// Input problems caught before anything is sent to the chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid address: {0}")]
    InvalidAddress(String),

    #[error("Please enter an amount")]
    EmptyAmount,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount has more than {max} decimal places")]
    TooManyDecimals { max: u8 },

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: String, available: String },

    #[error("Balance not loaded yet")]
    BalanceUnavailable,

    #[error("Please fill in {0}")]
    MissingField(&'static str),
}

/// Result of a screen's submit action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL for {key}: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("Invalid number for {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Wallet project id must not be empty")]
    MissingProjectId,

    #[error("Transaction confirmations must be at least 1")]
    ZeroConfirmations,

    #[error("Receipt poll interval must be at least 1 ms")]
    ZeroPollInterval,
}

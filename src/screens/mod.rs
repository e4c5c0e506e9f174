//! View-models for the four screens.
//!
//! Each screen owns its read binders and, where it writes, one
//! [`WriteSubmitter`](crate::submitter::WriteSubmitter). Rendering is left to
//! the host; screens only expose state and display strings.

pub mod dashboard;
pub mod governance;
pub mod nfts;
pub mod tokens;

use std::sync::Arc;

use alloy_primitives::U256;

use crate::{
    basic_elements::{args::Args, next_arg::NextArg, units::format_fixed},
    client::{rpc_client::Provider, wallet::Wallet},
    config::ReceiptPolicy,
    constants::TOKEN_DECIMALS,
    links::Explorer,
    reader::{ReadBinder, ReadStatus},
    registry::{ContractName, contract},
    session::SessionHandle,
    submitter::WriteSubmitter,
};

pub const LOADING_TEXT: &str = "...";
pub const ABSENT_TEXT: &str = "0";

/// Everything a screen needs from the shell.
#[derive(Clone)]
pub struct Services {
    pub provider: Arc<dyn Provider>,
    pub wallet: Arc<dyn Wallet>,
    pub session: SessionHandle,
    pub policy: ReceiptPolicy,
    pub explorer: Explorer,
}

impl Services {
    pub fn account_read<T>(&self, name: ContractName, method: &'static str) -> Arc<ReadBinder<T>>
    where
        T: Clone + Send + Sync + 'static,
        Args: NextArg<T>,
    {
        Arc::new(ReadBinder::account_scoped(
            Arc::clone(&self.provider),
            self.session.clone(),
            contract(name),
            method,
        ))
    }

    pub fn submitter(&self) -> Arc<WriteSubmitter> {
        Arc::new(WriteSubmitter::new(
            Arc::clone(&self.wallet),
            Arc::clone(&self.provider),
            self.session.clone(),
            self.policy,
        ))
    }
}

/// Display form of a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatValue {
    Loading,
    Value(String),
    Failed(String),
}

impl StatValue {
    /// A failed read renders as an absent value; the cause is kept for tooltips.
    pub fn text(&self) -> &str {
        match self {
            StatValue::Loading => LOADING_TEXT,
            StatValue::Value(text) => text,
            StatValue::Failed(_) => ABSENT_TEXT,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StatValue::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    fn from_status<T>(status: &ReadStatus<T>, render: impl FnOnce(&T) -> String) -> Self {
        match status {
            ReadStatus::Loading => StatValue::Loading,
            ReadStatus::Ready(value) => StatValue::Value(render(value)),
            ReadStatus::Error(err) => StatValue::Failed(err.to_string()),
        }
    }
}

/// Token amount rounded to `places` fractional digits.
pub fn token_amount(status: &ReadStatus<U256>, places: u8) -> StatValue {
    StatValue::from_status(status, |value| format_fixed(*value, TOKEN_DECIMALS, places))
}

pub fn count(status: &ReadStatus<U256>) -> StatValue {
    StatValue::from_status(status, U256::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: StatValue,
    pub unit: &'static str,
}

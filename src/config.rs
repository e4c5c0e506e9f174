//! Runtime configuration.
//!
//! Only the RPC endpoint, the wallet-integration project id and the receipt
//! policy are environment-driven; everything else is fixed to Sepolia.
//!
//! Environment variables (a `.env` file is honoured):
//! - `BUILDERHUB_RPC_URL`
//! - `BUILDERHUB_PROJECT_ID`
//! - `BUILDERHUB_POLL_INTERVAL_MS`
//! - `BUILDERHUB_TX_TIMEOUT_MS`
//! - `BUILDERHUB_TX_CONFIRMATIONS`
//! - `BUILDERHUB_LOG_LEVEL`

use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    client::wallet::Connector,
    constants::{
        DEFAULT_EXPLORER_URL, DEFAULT_MARKETPLACE_URL, DEFAULT_POLL_INTERVAL_MS,
        DEFAULT_PROJECT_ID, DEFAULT_RPC_TIMEOUT_SECS, DEFAULT_TX_CONFIRMATIONS,
        DEFAULT_TX_TIMEOUT_MS, PublicRpcUrl,
    },
    error::ConfigError,
    types::ChainId,
};

pub const RPC_URL_VAR: &str = "BUILDERHUB_RPC_URL";
pub const PROJECT_ID_VAR: &str = "BUILDERHUB_PROJECT_ID";
pub const POLL_INTERVAL_VAR: &str = "BUILDERHUB_POLL_INTERVAL_MS";
pub const TX_TIMEOUT_VAR: &str = "BUILDERHUB_TX_TIMEOUT_MS";
pub const TX_CONFIRMATIONS_VAR: &str = "BUILDERHUB_TX_CONFIRMATIONS";
pub const LOG_LEVEL_VAR: &str = "BUILDERHUB_LOG_LEVEL";

/// How the write submitter waits for a transaction to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptPolicy {
    pub poll_interval_ms: u64,
    /// Overall budget from wallet acceptance to confirmation.
    pub timeout_ms: u64,
    pub confirmations: u64,
}

impl ReceiptPolicy {
    /// Never zero; a zero interval cannot drive a timer.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(Duration::from_millis(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_TX_TIMEOUT_MS,
            confirmations: DEFAULT_TX_CONFIRMATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    /// WalletConnect cloud project id.
    pub project_id: String,
    pub chain: ChainId,
    pub explorer_url: String,
    pub marketplace_url: String,
    pub rpc_timeout_secs: u64,
    pub receipt: ReceiptPolicy,
    pub log_level: String,
}

impl Config {
    pub fn sepolia() -> Self {
        Self {
            rpc_url: PublicRpcUrl::Sepolia.url().to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            chain: ChainId::Sepolia,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            receipt: ReceiptPolicy::default(),
            log_level: "info".to_string(),
        }
    }

    /// Loads `.env` (if any), then reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup; unset keys keep defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::sepolia();

        if let Some(url) = lookup(RPC_URL_VAR) {
            config.rpc_url = url;
        }
        if let Some(project_id) = lookup(PROJECT_ID_VAR) {
            config.project_id = project_id;
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            config.log_level = level;
        }
        if let Some(value) = lookup(POLL_INTERVAL_VAR) {
            config.receipt.poll_interval_ms = parse_number(POLL_INTERVAL_VAR, &value)?;
        }
        if let Some(value) = lookup(TX_TIMEOUT_VAR) {
            config.receipt.timeout_ms = parse_number(TX_TIMEOUT_VAR, &value)?;
        }
        if let Some(value) = lookup(TX_CONFIRMATIONS_VAR) {
            config.receipt.confirmations = parse_number(TX_CONFIRMATIONS_VAR, &value)?;
        }

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            (RPC_URL_VAR, &self.rpc_url),
            ("explorer_url", &self.explorer_url),
            ("marketplace_url", &self.marketplace_url),
        ] {
            if !validate_url(value) {
                return Err(ConfigError::InvalidUrl {
                    key,
                    value: value.clone(),
                });
            }
        }

        if self.project_id.trim().is_empty() {
            return Err(ConfigError::MissingProjectId);
        }

        if self.receipt.confirmations == 0 {
            return Err(ConfigError::ZeroConfirmations);
        }

        if self.receipt.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(())
    }

    /// Connection mechanisms offered in the selection flow.
    pub fn connectors(&self) -> Vec<Connector> {
        vec![
            Connector::WalletConnect {
                project_id: self.project_id.clone(),
            },
            Connector::Injected,
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::sepolia()
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}

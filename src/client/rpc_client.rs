use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use alloy_primitives::{Address, B256, Bytes, U64};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{config::Config, error::ProviderError, types::receipt::TransactionReceipt};

/// Read-side access to the chain. Writes go through the wallet instead.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;

    /// `None` while the transaction is not yet included.
    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;

    async fn block_number(&self) -> Result<u64, ProviderError>;
}

// ---------------------------------------------------------------------------
// JSON-RPC wire types (private)
// ---------------------------------------------------------------------------

// Serializes as `[]`; a unit would become `null`
const NO_PARAMS: [u8; 0] = [];

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: serde_json::Value,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct CallObject {
    to: Address,
    data: Bytes,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP JSON-RPC provider.
#[derive(Debug)]
pub struct JsonRpcClient {
    rpc_url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            rpc_url: rpc_url.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(
            config.rpc_url.clone(),
            Duration::from_secs(config.rpc_timeout_secs),
        )
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, ProviderError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        debug!(method, id, "Sending JSON-RPC request");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(method, %status, "JSON-RPC endpoint returned an HTTP error");
            return Err(ProviderError::Transport(format!("HTTP {status}")));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(envelope.result).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Provider for JsonRpcClient {
    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let id: U64 = self.request("eth_chainId", NO_PARAMS).await?;
        Ok(id.to::<u64>())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        self.request("eth_call", (CallObject { to, data }, "latest"))
            .await
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        self.request("eth_getTransactionReceipt", [hash]).await
    }

    async fn block_number(&self) -> Result<u64, ProviderError> {
        let number: U64 = self.request("eth_blockNumber", NO_PARAMS).await?;
        Ok(number.to::<u64>())
    }
}

use alloy_primitives::{Address, B256, Bytes, U64};
use serde::{Deserialize, Serialize};

/// `eth_getTransactionReceipt` result, reduced to the fields the submitter reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: U64,
    // Absent on pre-Byzantium receipts
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn block(&self) -> u64 {
        self.block_number.to::<u64>()
    }

    pub fn succeeded(&self) -> bool {
        self.status.map(|status| status == U64::from(1)).unwrap_or(true)
    }
}

/// Unsigned call handed to the wallet for signing and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub chain_id: u64,
}

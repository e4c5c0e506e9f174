pub mod receipt;

use std::fmt;

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::constants::SEPOLIA_CHAIN_ID;

/// Identifies a deployed contract call independently of who issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadKey {
    pub contract: Address,
    pub calldata: Bytes,
}

/// Parameter and return types the deployed contracts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiType {
    Address,
    Uint256,
    Bool,
    String,
}

impl AbiType {
    /// Canonical name used when hashing a method signature.
    pub fn canonical(&self) -> &'static str {
        match self {
            AbiType::Address => "address",
            AbiType::Uint256 => "uint256",
            AbiType::Bool => "bool",
            AbiType::String => "string",
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, AbiType::String)
    }
}

/// A typed call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint256(U256),
    Bool(bool),
    String(String),
}

impl AbiValue {
    pub fn abi_type(&self) -> AbiType {
        match self {
            AbiValue::Address(_) => AbiType::Address,
            AbiValue::Uint256(_) => AbiType::Uint256,
            AbiValue::Bool(_) => AbiType::Bool,
            AbiValue::String(_) => AbiType::String,
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Address(address) => write!(f, "{address}"),
            AbiValue::Uint256(value) => write!(f, "{value}"),
            AbiValue::Bool(value) => write!(f, "{value}"),
            AbiValue::String(value) => write!(f, "{value:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    Sepolia = 11155111,
}

impl ChainId {
    pub fn to_u64(&self) -> u64 {
        match self {
            ChainId::Sepolia => SEPOLIA_CHAIN_ID,
        }
    }

    pub fn from_u64(id: u64) -> Option<Self> {
        match id {
            SEPOLIA_CHAIN_ID => Some(ChainId::Sepolia),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChainId::Sepolia => "Sepolia",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.to_u64())
    }
}

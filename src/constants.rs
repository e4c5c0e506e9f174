use alloy_primitives::{Address, address};

pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

// ERC-20 fractional-unit exponent shared by WSN and QUM
pub const TOKEN_DECIMALS: u8 = 18;

pub const WINSZN_ADDRESS: Address = address!("0x4c073e42E74775361C06A726def4Dfa2171E0774");
pub const QUORUM_ADDRESS: Address = address!("0xb2CCaf263c6a524ebFd817E93072943D4D960420");
pub const PROOF_OF_BUILD_ADDRESS: Address = address!("0xb7a6b90aD7BdC1710F39d959A64de68C5aaAe527");

pub const DEFAULT_PROJECT_ID: &str = "421bf0713fb210162a29904cf17b84b8";

/// Used for the mint's external link when the form leaves it empty.
pub const DEFAULT_EXTERNAL_LINK: &str = "https://github.com";
pub const METADATA_URI_PLACEHOLDER: &str = "ipfs://placeholder";

pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";
pub const DEFAULT_MARKETPLACE_URL: &str = "https://testnets.opensea.io/assets/sepolia";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_TX_TIMEOUT_MS: u64 = 180_000;
pub const DEFAULT_TX_CONFIRMATIONS: u64 = 1;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

pub enum PublicRpcUrl {
    Sepolia,
}

impl PublicRpcUrl {
    pub fn url(&self) -> &'static str {
        match self {
            PublicRpcUrl::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com",
        }
    }
}

//! Outbound explorer and marketplace links.

use alloy_primitives::{Address, B256};

use crate::config::Config;

/// Characters kept on each side of an abbreviated address in the contract list.
pub const REGISTRY_HEAD: usize = 10;
pub const REGISTRY_TAIL: usize = 8;

/// Characters kept on each side of the connected account on the wallet button.
pub const BUTTON_HEAD: usize = 6;
pub const BUTTON_TAIL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explorer {
    explorer_url: String,
    marketplace_url: String,
}

impl Explorer {
    pub fn new(explorer_url: impl Into<String>, marketplace_url: impl Into<String>) -> Self {
        Self {
            explorer_url: trim_slash(explorer_url.into()),
            marketplace_url: trim_slash(marketplace_url.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.explorer_url.clone(), config.marketplace_url.clone())
    }

    pub fn address_url(&self, address: Address) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }

    pub fn tx_url(&self, hash: B256) -> String {
        format!("{}/tx/{}", self.explorer_url, hash)
    }

    pub fn marketplace_url(&self, contract: Address) -> String {
        format!("{}/{}", self.marketplace_url, contract)
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// `0x1234...abcd` style abbreviation of a checksummed address.
pub fn short_address(address: Address, head: usize, tail: usize) -> String {
    let full = address.to_checksum(None);
    if head + tail >= full.len() {
        return full;
    }
    format!("{}...{}", &full[..head], &full[full.len() - tail..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WINSZN_ADDRESS;

    #[test]
    fn builds_explorer_urls() {
        let explorer = Explorer::from_config(&Config::sepolia());

        assert_eq!(
            explorer.address_url(WINSZN_ADDRESS).to_lowercase(),
            "https://sepolia.etherscan.io/address/0x4c073e42e74775361c06a726def4dfa2171e0774"
        );
        assert_eq!(
            explorer.tx_url(B256::with_last_byte(1)),
            format!("https://sepolia.etherscan.io/tx/0x{}01", "0".repeat(62))
        );
        assert_eq!(
            explorer.marketplace_url(WINSZN_ADDRESS).to_lowercase(),
            "https://testnets.opensea.io/assets/sepolia/0x4c073e42e74775361c06a726def4dfa2171e0774"
        );
    }

    #[test]
    fn trailing_slashes_are_ignored() {
        let explorer = Explorer::new("https://explorer.example/", "https://market.example//");

        assert_eq!(
            explorer.marketplace_url(Address::ZERO),
            format!("https://market.example/0x{}", "0".repeat(40))
        );
    }

    #[test]
    fn abbreviates_addresses() {
        assert_eq!(
            short_address(WINSZN_ADDRESS, REGISTRY_HEAD, REGISTRY_TAIL).to_lowercase(),
            "0x4c073e42...171e0774"
        );
        assert_eq!(
            short_address(WINSZN_ADDRESS, BUTTON_HEAD, BUTTON_TAIL).to_lowercase(),
            "0x4c07...0774"
        );
        assert_eq!(short_address(WINSZN_ADDRESS, 30, 30).len(), 42);
    }
}

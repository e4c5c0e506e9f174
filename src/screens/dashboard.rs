use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tokio::task::JoinHandle;

use crate::{
    links::{Explorer, REGISTRY_HEAD, REGISTRY_TAIL, short_address},
    reader::ReadBinder,
    registry::{BALANCE_OF, ContractName, GET_VOTES, all_contracts},
};

use super::{Services, StatCard, count, token_amount};

const BALANCE_PLACES: u8 = 2;

/// One entry of the contract list, linked to the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractLink {
    pub name: ContractName,
    pub address: Address,
    pub display_address: String,
    pub explorer_url: String,
}

/// Read-only overview: both token balances, voting power and NFT count.
pub struct Dashboard {
    winszn_balance: Arc<ReadBinder<U256>>,
    quorum_balance: Arc<ReadBinder<U256>>,
    voting_power: Arc<ReadBinder<U256>>,
    build_proofs: Arc<ReadBinder<U256>>,
    explorer: Explorer,
}

impl Dashboard {
    pub fn new(services: &Services) -> Self {
        Self {
            winszn_balance: services.account_read(ContractName::WinSzn, BALANCE_OF),
            quorum_balance: services.account_read(ContractName::Quorum, BALANCE_OF),
            voting_power: services.account_read(ContractName::Quorum, GET_VOTES),
            build_proofs: services.account_read(ContractName::ProofOfBuild, BALANCE_OF),
            explorer: services.explorer.clone(),
        }
    }

    /// Issues all four reads concurrently. Each settles on its own.
    pub async fn refresh(&self) {
        tokio::join!(
            self.winszn_balance.refresh(),
            self.quorum_balance.refresh(),
            self.voting_power.refresh(),
            self.build_proofs.refresh(),
        );
    }

    pub fn bind(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.winszn_balance.bind(),
            self.quorum_balance.bind(),
            self.voting_power.bind(),
            self.build_proofs.bind(),
        ]
    }

    pub fn stats(&self) -> [StatCard; 4] {
        [
            StatCard {
                title: "WinSZN Balance",
                value: token_amount(&self.winszn_balance.status(), BALANCE_PLACES),
                unit: ContractName::WinSzn.symbol(),
            },
            StatCard {
                title: "Quorum Balance",
                value: token_amount(&self.quorum_balance.status(), BALANCE_PLACES),
                unit: ContractName::Quorum.symbol(),
            },
            StatCard {
                title: "Voting Power",
                value: token_amount(&self.voting_power.status(), BALANCE_PLACES),
                unit: "Votes",
            },
            StatCard {
                title: "Build Proofs",
                value: count(&self.build_proofs.status()),
                unit: "NFTs",
            },
        ]
    }

    pub fn contract_links(&self) -> Vec<ContractLink> {
        all_contracts()
            .map(|descriptor| ContractLink {
                name: descriptor.name,
                address: descriptor.address,
                display_address: short_address(descriptor.address, REGISTRY_HEAD, REGISTRY_TAIL),
                explorer_url: self.explorer.address_url(descriptor.address),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ProviderError,
        screens::StatValue,
        testing::{Harness, account_a, units},
        types::AbiValue,
    };

    #[tokio::test]
    async fn one_failed_read_does_not_block_the_others() {
        let harness = Harness::connected(account_a()).await;
        let provider = &harness.provider;
        let me = [AbiValue::Address(account_a())];
        provider.set_u256(ContractName::WinSzn, BALANCE_OF, &me, units(100));
        provider.fail(
            ContractName::Quorum,
            BALANCE_OF,
            &me,
            ProviderError::Transport("node unreachable".into()),
        );
        provider.set_u256(ContractName::Quorum, GET_VOTES, &me, units(25));
        provider.set_u256(ContractName::ProofOfBuild, BALANCE_OF, &me, U256::from(2));

        let dashboard = Dashboard::new(&harness.services);
        assert!(dashboard.stats().iter().all(|card| card.value == StatValue::Loading));

        dashboard.refresh().await;
        let [winszn, quorum, votes, proofs] = dashboard.stats();

        assert_eq!(winszn.value.text(), "100.00");
        assert_eq!(winszn.unit, "WSN");
        assert_eq!(quorum.value.text(), "0");
        assert!(quorum.value.error().is_some());
        assert_eq!(votes.value.text(), "25.00");
        assert_eq!(proofs.value.text(), "2");
        assert_eq!(proofs.unit, "NFTs");
    }

    #[tokio::test]
    async fn lists_every_contract() {
        let harness = Harness::connected(account_a()).await;
        let links = Dashboard::new(&harness.services).contract_links();

        assert_eq!(links.len(), 3);
        assert_eq!(links[0].name, ContractName::WinSzn);
        assert_eq!(links[0].display_address.len(), 10 + 3 + 8);
        assert!(links[2].explorer_url.starts_with("https://sepolia.etherscan.io/address/0x"));
    }
}

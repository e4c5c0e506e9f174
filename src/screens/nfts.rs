//! Build Proofs: mint soulbound ProofOfBuild NFTs.
//!
//! The metadata URI is always [`METADATA_URI_PLACEHOLDER`]; nothing is uploaded.

use std::sync::Arc;

use alloy_primitives::U256;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    constants::{DEFAULT_EXTERNAL_LINK, METADATA_URI_PLACEHOLDER},
    error::{FormError, ValidationError},
    helpers::receipts::{StatusCopy, StatusLine, status_line},
    links::Explorer,
    reader::ReadBinder,
    registry::{BALANCE_OF, ContractName, MINT_MY_BUILD, TOTAL_BUILDS, contract},
    submitter::{TransactionHandle, TxState, WriteIntent, WriteSubmitter},
    types::AbiValue,
    validation::require_field,
};

use super::{Services, StatCard, StatValue, count};

pub const MINT_COPY: StatusCopy = StatusCopy {
    confirming: "Minting your NFT...",
    success: "NFT minted successfully!",
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintForm {
    pub project_name: String,
    pub description: String,
    /// Optional; falls back to [`DEFAULT_EXTERNAL_LINK`].
    pub external_link: String,
}

pub struct NftsScreen {
    form: MintForm,
    owned: Arc<ReadBinder<U256>>,
    total_builds: Arc<ReadBinder<U256>>,
    submitter: Arc<WriteSubmitter>,
    explorer: Explorer,
}

impl NftsScreen {
    pub fn new(services: &Services) -> Self {
        Self {
            form: MintForm::default(),
            owned: services.account_read(ContractName::ProofOfBuild, BALANCE_OF),
            total_builds: Arc::new(ReadBinder::new(
                Arc::clone(&services.provider),
                services.session.clone(),
                contract(ContractName::ProofOfBuild),
                TOTAL_BUILDS,
                Vec::new(),
            )),
            submitter: services.submitter(),
            explorer: services.explorer.clone(),
        }
    }

    pub async fn refresh(&self) {
        tokio::join!(self.owned.refresh(), self.total_builds.refresh());
    }

    pub fn bind(&self) -> Vec<JoinHandle<()>> {
        vec![self.owned.bind(), self.total_builds.bind()]
    }

    pub fn form(&self) -> &MintForm {
        &self.form
    }

    pub fn set_project_name(&mut self, value: impl Into<String>) {
        self.form.project_name = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.form.description = value.into();
    }

    pub fn set_external_link(&mut self, value: impl Into<String>) {
        self.form.external_link = value.into();
    }

    pub fn stats(&self) -> [StatCard; 3] {
        [
            StatCard {
                title: "Your NFTs",
                value: count(&self.owned.status()),
                unit: ContractName::ProofOfBuild.symbol(),
            },
            StatCard {
                title: "Total Builds",
                value: count(&self.total_builds.status()),
                unit: "Minted",
            },
            StatCard {
                title: "Soulbound",
                value: StatValue::Value("Non-transferable".to_string()),
                unit: "",
            },
        ]
    }

    /// Collection page for the contract on the marketplace.
    pub fn marketplace_url(&self) -> String {
        self.explorer
            .marketplace_url(contract(ContractName::ProofOfBuild).address)
    }

    pub fn validate(&self) -> Result<WriteIntent, ValidationError> {
        let project_name = require_field(&self.form.project_name, "project name")?;
        let description = require_field(&self.form.description, "description")?;

        let external_link = match self.form.external_link.trim() {
            "" => DEFAULT_EXTERNAL_LINK,
            link => link,
        };

        Ok(WriteIntent {
            contract: contract(ContractName::ProofOfBuild),
            method: MINT_MY_BUILD,
            args: vec![
                AbiValue::String(project_name.to_string()),
                AbiValue::String(description.to_string()),
                AbiValue::String(external_link.to_string()),
                AbiValue::String(METADATA_URI_PLACEHOLDER.to_string()),
            ],
        })
    }

    /// Both counts are re-read once the mint confirms.
    pub fn submit(&self) -> Result<JoinHandle<TransactionHandle>, FormError> {
        let intent = self.validate()?;
        let ticket = self.submitter.begin()?;

        let submitter = Arc::clone(&self.submitter);
        let owned = Arc::clone(&self.owned);
        let total_builds = Arc::clone(&self.total_builds);

        Ok(tokio::spawn(async move {
            let handle = submitter.drive(ticket, intent).await;
            if handle.state == TxState::Confirmed {
                debug!("Re-reading build counts after mint");
                tokio::join!(owned.invalidate(), total_builds.invalidate());
            }
            handle
        }))
    }

    pub fn transaction(&self) -> TransactionHandle {
        self.submitter.handle()
    }

    pub fn can_submit(&self) -> bool {
        self.submitter.can_submit()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.can_submit() {
            "Mint Build Proof"
        } else {
            "Minting..."
        }
    }

    pub fn status(&self) -> Option<StatusLine> {
        status_line(&self.submitter.handle(), &MINT_COPY, &self.explorer)
    }

    pub fn reset_form(&mut self) -> bool {
        let confirmed = self.submitter.handle().state == TxState::Confirmed;
        if !self.submitter.reset() {
            return false;
        }
        if confirmed {
            self.form = MintForm::default();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::hex;

    use super::*;
    use crate::{
        registry::TRANSFER,
        testing::{Harness, MockWallet, account_a, tx_hash},
    };

    #[tokio::test]
    async fn empty_project_name_blocks_submission() {
        let harness = Harness::connected(account_a()).await;
        let mut screen = NftsScreen::new(&harness.services);
        screen.set_description("A dashboard for builders");

        assert_eq!(
            screen.submit().err(),
            Some(FormError::Validation(ValidationError::MissingField("project name")))
        );
        assert!(harness.wallet.requests().is_empty());
        assert_eq!(screen.transaction().state, TxState::Idle);

        screen.set_project_name("BuilderHub");
        screen.set_description("  ");
        assert_eq!(
            screen.validate(),
            Err(ValidationError::MissingField("description"))
        );
    }

    #[tokio::test]
    async fn missing_link_uses_default_and_uri_is_fixed() {
        let harness = Harness::connected(account_a()).await;
        let mut screen = NftsScreen::new(&harness.services);
        screen.set_project_name(" BuilderHub ");
        screen.set_description("A dashboard for builders");

        let intent = screen.validate().unwrap();
        assert_eq!(
            intent.args,
            vec![
                AbiValue::String("BuilderHub".into()),
                AbiValue::String("A dashboard for builders".into()),
                AbiValue::String(DEFAULT_EXTERNAL_LINK.into()),
                AbiValue::String(METADATA_URI_PLACEHOLDER.into()),
            ]
        );

        screen.set_external_link("https://github.com/builder/hub");
        let intent = screen.validate().unwrap();
        assert_eq!(
            intent.args[2],
            AbiValue::String("https://github.com/builder/hub".into())
        );
        assert_eq!(
            intent.args[3],
            AbiValue::String(METADATA_URI_PLACEHOLDER.into())
        );
    }

    #[tokio::test]
    async fn confirmed_mint_rereads_counts() {
        let harness = Harness::with_wallet(
            MockWallet::connected(account_a()).with_send(Ok(tx_hash(1))),
        )
        .await;
        let me = [AbiValue::Address(account_a())];
        harness
            .provider
            .set_u256(ContractName::ProofOfBuild, BALANCE_OF, &me, U256::ZERO);
        harness
            .provider
            .set_u256(ContractName::ProofOfBuild, TOTAL_BUILDS, &[], U256::from(41));
        harness.provider.add_receipt(tx_hash(1), 3, true);

        let mut screen = NftsScreen::new(&harness.services);
        screen.refresh().await;
        assert_eq!(screen.stats()[0].value.text(), "0");
        assert_eq!(screen.stats()[1].value.text(), "41");
        assert_eq!(screen.stats()[2].value.text(), "Non-transferable");

        screen.set_project_name("BuilderHub");
        screen.set_description("A dashboard for builders");
        let task = screen.submit().unwrap();
        assert_eq!(screen.submit_label(), "Minting...");
        assert_eq!(screen.status().unwrap().text, "Waiting for wallet approval...");

        harness
            .provider
            .set_u256(ContractName::ProofOfBuild, BALANCE_OF, &me, U256::from(1));
        harness
            .provider
            .set_u256(ContractName::ProofOfBuild, TOTAL_BUILDS, &[], U256::from(42));

        assert_eq!(task.await.unwrap().state, TxState::Confirmed);
        assert_eq!(screen.stats()[0].value.text(), "1");
        assert_eq!(screen.stats()[1].value.text(), "42");
        assert_eq!(screen.status().unwrap().text, "NFT minted successfully!");

        let request = &harness.wallet.requests()[0];
        assert_eq!(request.to, contract(ContractName::ProofOfBuild).address);
        let selector = contract(ContractName::ProofOfBuild)
            .method(MINT_MY_BUILD)
            .unwrap()
            .selector();
        assert_eq!(hex::encode(&request.data[..4]), hex::encode(selector));

        assert!(screen.reset_form());
        assert_eq!(screen.form(), &MintForm::default());
    }

    #[test]
    fn soulbound_contract_cannot_encode_a_transfer() {
        assert!(
            contract(ContractName::ProofOfBuild)
                .encode_call(TRANSFER, &[])
                .is_err()
        );
    }

    #[tokio::test]
    async fn links_to_marketplace() {
        let harness = Harness::connected(account_a()).await;
        let screen = NftsScreen::new(&harness.services);

        assert!(
            screen
                .marketplace_url()
                .starts_with("https://testnets.opensea.io/assets/sepolia/0x")
        );
    }
}

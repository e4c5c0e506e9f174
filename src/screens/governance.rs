use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    error::{FormError, ValidationError, WriteError},
    helpers::receipts::{StatusCopy, StatusLine, status_line},
    links::Explorer,
    reader::{ReadBinder, ReadStatus},
    registry::{BALANCE_OF, ContractName, DELEGATE, DELEGATES, GET_VOTES, contract},
    session::SessionHandle,
    submitter::{TransactionHandle, TxState, WriteIntent, WriteSubmitter},
    types::AbiValue,
    validation::parse_address,
};

use super::{Services, StatCard, StatValue, token_amount};

const BALANCE_PLACES: u8 = 2;

pub const DELEGATE_COPY: StatusCopy = StatusCopy {
    confirming: "Delegating votes...",
    success: "Delegation successful!",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegationStatus {
    pub is_self_delegated: bool,
    pub is_undelegated: bool,
}

impl DelegationStatus {
    pub fn label(&self) -> &'static str {
        if self.is_self_delegated {
            "Self"
        } else {
            "Delegated"
        }
    }

    pub fn detail(&self) -> &'static str {
        if self.is_undelegated {
            "Not delegated"
        } else if self.is_self_delegated {
            "You control your votes"
        } else {
            "Votes delegated to another"
        }
    }
}

/// Addresses compare as bytes, so checksum casing never matters.
pub fn delegation_status(current_delegate: Address, account: Address) -> DelegationStatus {
    DelegationStatus {
        is_self_delegated: current_delegate == account,
        is_undelegated: current_delegate == Address::ZERO,
    }
}

pub struct GovernanceScreen {
    delegatee: String,
    session: SessionHandle,
    balance: Arc<ReadBinder<U256>>,
    voting_power: Arc<ReadBinder<U256>>,
    current_delegate: Arc<ReadBinder<Address>>,
    submitter: Arc<WriteSubmitter>,
    explorer: Explorer,
}

impl GovernanceScreen {
    pub fn new(services: &Services) -> Self {
        Self {
            delegatee: String::new(),
            session: services.session.clone(),
            balance: services.account_read(ContractName::Quorum, BALANCE_OF),
            voting_power: services.account_read(ContractName::Quorum, GET_VOTES),
            current_delegate: services.account_read(ContractName::Quorum, DELEGATES),
            submitter: services.submitter(),
            explorer: services.explorer.clone(),
        }
    }

    pub async fn refresh(&self) {
        tokio::join!(
            self.balance.refresh(),
            self.voting_power.refresh(),
            self.current_delegate.refresh(),
        );
    }

    pub fn bind(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.balance.bind(),
            self.voting_power.bind(),
            self.current_delegate.bind(),
        ]
    }

    pub fn delegatee(&self) -> &str {
        &self.delegatee
    }

    pub fn set_delegatee(&mut self, value: impl Into<String>) {
        self.delegatee = value.into();
    }

    /// "Use my address": fills the input with the connected account.
    pub fn use_my_address(&mut self) -> bool {
        match self.session.account() {
            Some(account) => {
                self.delegatee = account.to_checksum(None);
                true
            }
            None => false,
        }
    }

    /// `None` until both the account and its current delegate are known.
    pub fn delegation(&self) -> Option<DelegationStatus> {
        let account = self.session.account()?;
        match self.current_delegate.status() {
            ReadStatus::Ready(current) => Some(delegation_status(current, account)),
            _ => None,
        }
    }

    pub fn current_delegate(&self) -> ReadStatus<Address> {
        self.current_delegate.status()
    }

    /// Tokens are held but their votes are not active yet.
    pub fn needs_self_delegation_prompt(&self) -> bool {
        match (self.balance.status(), self.voting_power.status()) {
            (ReadStatus::Ready(balance), ReadStatus::Ready(votes)) => {
                balance > U256::ZERO && votes.is_zero()
            }
            _ => false,
        }
    }

    pub fn stats(&self) -> [StatCard; 3] {
        let delegation = match (self.current_delegate.status(), self.delegation()) {
            (ReadStatus::Loading, _) => StatCard {
                title: "Delegation",
                value: StatValue::Loading,
                unit: "",
            },
            (_, Some(status)) => StatCard {
                title: "Delegation",
                value: StatValue::Value(status.label().to_string()),
                unit: status.detail(),
            },
            (ReadStatus::Error(err), None) => StatCard {
                title: "Delegation",
                value: StatValue::Failed(err.to_string()),
                unit: "",
            },
            (ReadStatus::Ready(_), None) => StatCard {
                title: "Delegation",
                value: StatValue::Loading,
                unit: "",
            },
        };

        [
            StatCard {
                title: "Quorum Balance",
                value: token_amount(&self.balance.status(), BALANCE_PLACES),
                unit: ContractName::Quorum.symbol(),
            },
            StatCard {
                title: "Voting Power",
                value: token_amount(&self.voting_power.status(), BALANCE_PLACES),
                unit: "Votes",
            },
            delegation,
        ]
    }

    pub fn validate(&self) -> Result<WriteIntent, ValidationError> {
        let delegatee = parse_address(&self.delegatee)?;
        Ok(delegate_intent(delegatee))
    }

    pub fn submit(&self) -> Result<JoinHandle<TransactionHandle>, FormError> {
        let intent = self.validate()?;
        self.dispatch(intent)
    }

    /// The prompt's "Delegate to Myself" action.
    pub fn delegate_to_self(&self) -> Result<JoinHandle<TransactionHandle>, FormError> {
        let account = self.session.account().ok_or(WriteError::NotConnected)?;
        self.dispatch(delegate_intent(account))
    }

    fn dispatch(&self, intent: WriteIntent) -> Result<JoinHandle<TransactionHandle>, FormError> {
        let ticket = self.submitter.begin()?;

        let submitter = Arc::clone(&self.submitter);
        let balance = Arc::clone(&self.balance);
        let voting_power = Arc::clone(&self.voting_power);
        let current_delegate = Arc::clone(&self.current_delegate);

        Ok(tokio::spawn(async move {
            let handle = submitter.drive(ticket, intent).await;
            if handle.state == TxState::Confirmed {
                debug!("Re-reading governance state after delegation");
                tokio::join!(
                    balance.invalidate(),
                    voting_power.invalidate(),
                    current_delegate.invalidate(),
                );
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
            "Delegate Votes"
        } else {
            "Delegating..."
        }
    }

    pub fn status(&self) -> Option<StatusLine> {
        status_line(&self.submitter.handle(), &DELEGATE_COPY, &self.explorer)
    }

    pub fn reset_form(&mut self) -> bool {
        let confirmed = self.submitter.handle().state == TxState::Confirmed;
        if !self.submitter.reset() {
            return false;
        }
        if confirmed {
            self.delegatee.clear();
        }
        true
    }
}

fn delegate_intent(delegatee: Address) -> WriteIntent {
    WriteIntent {
        contract: contract(ContractName::Quorum),
        method: DELEGATE,
        args: vec![AbiValue::Address(delegatee)],
    }
}

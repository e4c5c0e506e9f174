use std::sync::Arc;

use alloy_primitives::U256;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    constants::TOKEN_DECIMALS,
    error::{FormError, ValidationError},
    helpers::receipts::{StatusCopy, StatusLine, status_line},
    links::Explorer,
    reader::{ReadBinder, ReadStatus},
    registry::{BALANCE_OF, TRANSFER, Token},
    submitter::{TransactionHandle, TxState, WriteIntent, WriteSubmitter},
    types::AbiValue,
    validation::{check_balance, parse_address, parse_amount},
};

use super::{Services, StatValue, token_amount};

const BALANCE_PLACES: u8 = 2;
const AVAILABLE_PLACES: u8 = 4;

pub const TRANSFER_COPY: StatusCopy = StatusCopy {
    confirming: "Transaction confirming...",
    success: "Transfer successful!",
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
}

/// Token picker plus a transfer form for the selected token.
pub struct TokensScreen {
    selected: Token,
    form: TransferForm,
    winszn_balance: Arc<ReadBinder<U256>>,
    quorum_balance: Arc<ReadBinder<U256>>,
    submitter: Arc<WriteSubmitter>,
    explorer: Explorer,
}

impl TokensScreen {
    pub fn new(services: &Services) -> Self {
        Self {
            selected: Token::default(),
            form: TransferForm::default(),
            winszn_balance: services.account_read(Token::WinSzn.contract_name(), BALANCE_OF),
            quorum_balance: services.account_read(Token::Quorum.contract_name(), BALANCE_OF),
            submitter: services.submitter(),
            explorer: services.explorer.clone(),
        }
    }

    pub async fn refresh(&self) {
        tokio::join!(self.winszn_balance.refresh(), self.quorum_balance.refresh());
    }

    pub fn bind(&self) -> Vec<JoinHandle<()>> {
        vec![self.winszn_balance.bind(), self.quorum_balance.bind()]
    }

    fn balance(&self, token: Token) -> &Arc<ReadBinder<U256>> {
        match token {
            Token::WinSzn => &self.winszn_balance,
            Token::Quorum => &self.quorum_balance,
        }
    }

    pub fn selected(&self) -> Token {
        self.selected
    }

    pub fn select(&mut self, token: Token) {
        self.selected = token;
    }

    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.form.recipient = recipient.into();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.form.amount = amount.into();
    }

    /// Balance card value for either token.
    pub fn balance_text(&self, token: Token) -> StatValue {
        token_amount(&self.balance(token).status(), BALANCE_PLACES)
    }

    /// `Available: 50.0000 WSN` under the amount input.
    pub fn available_text(&self) -> String {
        let value = token_amount(&self.balance(self.selected).status(), AVAILABLE_PLACES);
        format!("Available: {} {}", value.text(), self.selected.symbol())
    }

    /// Builds the transfer intent, or the first problem with the form.
    pub fn validate(&self) -> Result<WriteIntent, ValidationError> {
        let recipient = parse_address(&self.form.recipient)?;
        let amount = parse_amount(&self.form.amount, TOKEN_DECIMALS)?;

        match self.balance(self.selected).status() {
            ReadStatus::Ready(available) => check_balance(amount, available, TOKEN_DECIMALS)?,
            _ => return Err(ValidationError::BalanceUnavailable),
        }

        Ok(WriteIntent {
            contract: self.selected.descriptor(),
            method: TRANSFER,
            args: vec![AbiValue::Address(recipient), AbiValue::Uint256(amount)],
        })
    }

    /// Validates and submits. Both balances are re-read once the transfer confirms.
    pub fn submit(&self) -> Result<JoinHandle<TransactionHandle>, FormError> {
        let intent = self.validate()?;
        let ticket = self.submitter.begin()?;

        let submitter = Arc::clone(&self.submitter);
        let balances = [
            Arc::clone(&self.winszn_balance),
            Arc::clone(&self.quorum_balance),
        ];

        Ok(tokio::spawn(async move {
            let handle = submitter.drive(ticket, intent).await;
            if handle.state == TxState::Confirmed {
                debug!("Re-reading balances after transfer");
                let [winszn, quorum] = balances;
                tokio::join!(winszn.invalidate(), quorum.invalidate());
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

    pub fn submit_label(&self) -> String {
        if self.can_submit() {
            format!("Send {}", self.selected.symbol())
        } else {
            "Processing...".to_string()
        }
    }

    pub fn status(&self) -> Option<StatusLine> {
        status_line(&self.submitter.handle(), &TRANSFER_COPY, &self.explorer)
    }

    /// "New Transfer": returns a settled handle to idle. Inputs are cleared
    /// after a confirmed transfer and kept after a failed one.
    pub fn reset_form(&mut self) -> bool {
        let confirmed = self.submitter.handle().state == TxState::Confirmed;
        if !self.submitter.reset() {
            return false;
        }
        if confirmed {
            self.form = TransferForm::default();
        }
        true
    }
}

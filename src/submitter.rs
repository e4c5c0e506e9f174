//! Write submitter: hands a contract call to the wallet and tracks it until it
//! is confirmed or fails.
//!
//! ```text
//! idle -> awaiting-approval -> submitted -> confirming -> confirmed
//!              |                    |            |
//!              +--------------------+------------+-----> failed
//! ```
//!
//! One submitter backs one form. While a transaction is in flight a second
//! submission is refused with [`WriteError::AlreadyPending`].

use std::sync::Arc;

use alloy_primitives::B256;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    client::{rpc_client::Provider, wallet::Wallet},
    config::ReceiptPolicy,
    error::{FailureKind, WriteError},
    helpers::receipts::{ReceiptProgress, classify},
    registry::ContractDescriptor,
    session::SessionHandle,
    types::{AbiValue, receipt::TransactionRequest},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TxState {
    #[default]
    Idle,
    AwaitingApproval,
    Submitted,
    Confirming,
    Confirmed,
    Failed,
}

impl TxState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            TxState::AwaitingApproval | TxState::Submitted | TxState::Confirming
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TxState::Confirmed | TxState::Failed)
    }
}

/// Progress of one submitted write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionHandle {
    /// Known once the wallet has broadcast the transaction.
    pub id: Option<B256>,
    pub state: TxState,
    pub error: Option<WriteError>,
}

impl TransactionHandle {
    pub fn error_detail(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(WriteError::kind)
    }
}

/// A state-changing call a screen wants to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteIntent {
    pub contract: &'static ContractDescriptor,
    pub method: &'static str,
    pub args: Vec<AbiValue>,
}

/// Proof that [`WriteSubmitter::begin`] accepted a submission.
#[must_use = "a ticket must be driven or the form stays in flight"]
#[derive(Debug)]
pub struct WriteTicket {
    _private: (),
}

pub struct WriteSubmitter {
    wallet: Arc<dyn Wallet>,
    provider: Arc<dyn Provider>,
    session: SessionHandle,
    policy: ReceiptPolicy,
    handle: watch::Sender<TransactionHandle>,
}

impl WriteSubmitter {
    pub fn new(
        wallet: Arc<dyn Wallet>,
        provider: Arc<dyn Provider>,
        session: SessionHandle,
        policy: ReceiptPolicy,
    ) -> Self {
        let (handle, _) = watch::channel(TransactionHandle::default());

        Self {
            wallet,
            provider,
            session,
            policy,
            handle,
        }
    }

    pub fn handle(&self) -> TransactionHandle {
        self.handle.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionHandle> {
        self.handle.subscribe()
    }

    pub fn can_submit(&self) -> bool {
        !self.handle.borrow().state.is_in_flight()
    }

    /// Moves the handle to awaiting-approval, or refuses if a write is
    /// already in flight. The check and the transition are one step.
    pub fn begin(&self) -> Result<WriteTicket, WriteError> {
        let mut accepted = false;

        self.handle.send_if_modified(|handle| {
            if handle.state.is_in_flight() {
                return false;
            }
            *handle = TransactionHandle {
                id: None,
                state: TxState::AwaitingApproval,
                error: None,
            };
            accepted = true;
            true
        });

        if accepted {
            Ok(WriteTicket { _private: () })
        } else {
            debug!("Refusing duplicate submission");
            Err(WriteError::AlreadyPending)
        }
    }

    /// Runs an accepted submission to a terminal state.
    pub async fn drive(&self, ticket: WriteTicket, intent: WriteIntent) -> TransactionHandle {
        let WriteTicket { .. } = ticket;

        match self.run(&intent).await {
            Ok(hash) => {
                info!(%hash, method = intent.method, "Transaction confirmed");
                self.settle(TxState::Confirmed, None);
            }
            Err(err) => {
                warn!(method = intent.method, error = %err, "Transaction failed");
                self.settle(TxState::Failed, Some(err));
            }
        }

        self.handle()
    }

    /// Begins and drives on a background task.
    pub fn submit(
        self: &Arc<Self>,
        intent: WriteIntent,
    ) -> Result<JoinHandle<TransactionHandle>, WriteError> {
        let ticket = self.begin()?;
        let submitter = Arc::clone(self);

        Ok(tokio::spawn(
            async move { submitter.drive(ticket, intent).await },
        ))
    }

    /// Begins and drives inline.
    pub async fn execute(&self, intent: WriteIntent) -> Result<TransactionHandle, WriteError> {
        let ticket = self.begin()?;
        Ok(self.drive(ticket, intent).await)
    }

    /// Returns a settled handle to idle. In-flight handles are left alone.
    pub fn reset(&self) -> bool {
        self.handle.send_if_modified(|handle| {
            if !handle.state.is_terminal() {
                return false;
            }
            *handle = TransactionHandle::default();
            true
        })
    }

    async fn run(&self, intent: &WriteIntent) -> Result<B256, WriteError> {
        let from = self.session.current().require(intent.contract.chain)?;

        let data = intent
            .contract
            .encode_call(intent.method, &intent.args)
            .map_err(|e| WriteError::Encode(e.to_string()))?;

        let request = TransactionRequest {
            from,
            to: intent.contract.address,
            data,
            chain_id: intent.contract.chain.to_u64(),
        };

        debug!(contract = %intent.contract.name, method = intent.method, "Requesting wallet approval");
        let hash = self.wallet.send_transaction(request).await?;

        info!(%hash, method = intent.method, "Transaction submitted");
        self.handle.send_modify(|handle| {
            handle.id = Some(hash);
            handle.state = TxState::Submitted;
        });

        match time::timeout(self.policy.timeout(), self.await_receipt(hash)).await {
            Ok(result) => result.map(|()| hash),
            Err(_) => Err(WriteError::Timeout { hash }),
        }
    }

    async fn await_receipt(&self, hash: B256) -> Result<(), WriteError> {
        let mut ticker = time::interval(self.policy.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let receipt = match self.provider.transaction_receipt(hash).await {
                Ok(Some(receipt)) => receipt,
                Ok(None) => continue,
                Err(err) => {
                    warn!(%hash, error = %err, "Receipt lookup failed, retrying");
                    continue;
                }
            };

            if !receipt.succeeded() {
                return Err(WriteError::Reverted { hash });
            }

            self.handle.send_if_modified(|handle| {
                if handle.state == TxState::Confirming {
                    return false;
                }
                debug!(%hash, block = receipt.block(), "Transaction included");
                handle.state = TxState::Confirming;
                true
            });

            let head = match self.provider.block_number().await {
                Ok(head) => head,
                Err(err) => {
                    warn!(%hash, error = %err, "Block number lookup failed, retrying");
                    continue;
                }
            };

            match classify(&receipt, head, self.policy.confirmations) {
                ReceiptProgress::Confirmed => return Ok(()),
                ReceiptProgress::Reverted => return Err(WriteError::Reverted { hash }),
                ReceiptProgress::Confirming { remaining } => {
                    debug!(%hash, head, remaining, "Waiting for confirmations")
                }
            }
        }
    }

    fn settle(&self, state: TxState, error: Option<WriteError>) {
        self.handle.send_modify(|handle| {
            handle.state = state;
            handle.error = error;
        });
    }
}

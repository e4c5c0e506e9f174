//! Read binder: one contract view call kept in sync with the session.
//!
//! Every issuance gets a monotonically increasing sequence number. A result is
//! applied only if its sequence number is still the latest one, so a slow
//! response to an older issuance can never overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy_primitives::Bytes;
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::{
    basic_elements::{args::Args, next_arg::NextArg},
    client::rpc_client::Provider,
    error::ReadError,
    registry::ContractDescriptor,
    session::SessionHandle,
    types::{AbiValue, ReadKey},
};

/// Observable state of a read. `Loading` carries no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus<T> {
    Loading,
    Ready(T),
    Error(ReadError),
}

impl<T> ReadStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ReadStatus::Loading)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ReadStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ReadError> {
        match self {
            ReadStatus::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// A call argument, either fixed or taken from the session at issuance time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSlot {
    Account,
    Value(AbiValue),
}

#[derive(Debug, Default)]
struct Issuance {
    latest: u64,
    current_key: Option<ReadKey>,
    args: Vec<ArgSlot>,
}

pub struct ReadBinder<T> {
    provider: Arc<dyn Provider>,
    session: SessionHandle,
    contract: &'static ContractDescriptor,
    method: &'static str,
    issuance: Mutex<Issuance>,
    state: watch::Sender<ReadStatus<T>>,
}

impl<T> ReadBinder<T>
where
    T: Clone + Send + Sync + 'static,
    Args: NextArg<T>,
{
    pub fn new(
        provider: Arc<dyn Provider>,
        session: SessionHandle,
        contract: &'static ContractDescriptor,
        method: &'static str,
        args: Vec<ArgSlot>,
    ) -> Self {
        let (state, _) = watch::channel(ReadStatus::Loading);

        Self {
            provider,
            session,
            contract,
            method,
            issuance: Mutex::new(Issuance {
                args,
                ..Default::default()
            }),
            state,
        }
    }

    /// A read whose single argument is the connected account.
    pub fn account_scoped(
        provider: Arc<dyn Provider>,
        session: SessionHandle,
        contract: &'static ContractDescriptor,
        method: &'static str,
    ) -> Self {
        Self::new(provider, session, contract, method, vec![ArgSlot::Account])
    }

    pub fn contract(&self) -> &'static ContractDescriptor {
        self.contract
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn status(&self) -> ReadStatus<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReadStatus<T>> {
        self.state.subscribe()
    }

    /// Replaces the call arguments and re-issues if the resulting call differs.
    pub async fn set_args(&self, args: Vec<ArgSlot>) {
        self.issuance().args = args;
        self.refresh().await;
    }

    /// Issues the call unless the resolved key matches the one already
    /// issued, in which case the current status is left alone.
    pub async fn refresh(&self) {
        let (seq, key) = {
            let mut issuance = self.issuance();

            let key = match self.resolve(&issuance.args) {
                Ok(key) => key,
                Err(err) => {
                    // Supersede anything in flight; no provider call is made
                    issuance.latest += 1;
                    issuance.current_key = None;
                    debug!(method = self.method, error = %err, "Read not issued");
                    self.state.send_replace(ReadStatus::Error(err));
                    return;
                }
            };

            if issuance.current_key.as_ref() == Some(&key) {
                return;
            }

            issuance.latest += 1;
            issuance.current_key = Some(key.clone());
            self.state.send_replace(ReadStatus::Loading);

            (issuance.latest, key)
        };

        debug!(contract = %self.contract.name, method = self.method, seq, "Issuing read");

        let outcome = self.fetch(&key).await;

        let mut issuance = self.issuance();
        if issuance.latest != seq {
            debug!(
                method = self.method,
                seq,
                latest = issuance.latest,
                "Discarding stale read result"
            );
            return;
        }

        if outcome.error().is_some() {
            // Let the next trigger retry
            issuance.current_key = None;
        }
        self.state.send_replace(outcome);
    }

    /// Forces a new issuance even if the arguments are unchanged.
    pub async fn invalidate(&self) {
        self.issuance().current_key = None;
        self.refresh().await;
    }

    /// Re-issues the read on every session change until the session
    /// provider is dropped.
    pub fn bind(self: &Arc<Self>) -> JoinHandle<()> {
        let binder = Arc::clone(self);
        let mut changes = self.session.changes();

        tokio::spawn(async move {
            while changes.next().await.is_some() {
                let binder = Arc::clone(&binder);
                tokio::spawn(async move { binder.refresh().await });
            }
        })
    }

    fn resolve(&self, args: &[ArgSlot]) -> Result<ReadKey, ReadError> {
        let account = self.session.current().require(self.contract.chain)?;

        let values: Vec<AbiValue> = args
            .iter()
            .map(|slot| match slot {
                ArgSlot::Account => AbiValue::Address(account),
                ArgSlot::Value(value) => value.clone(),
            })
            .collect();

        let calldata = self
            .contract
            .encode_call(self.method, &values)
            .map_err(|e| ReadError::Encode(e.to_string()))?;

        Ok(ReadKey {
            contract: self.contract.address,
            calldata,
        })
    }

    async fn fetch(&self, key: &ReadKey) -> ReadStatus<T> {
        match self.provider.call(key.contract, key.calldata.clone()).await {
            Ok(data) => match self.decode(&data) {
                Ok(value) => ReadStatus::Ready(value),
                Err(err) => {
                    warn!(method = self.method, error = %err, "Malformed read result");
                    ReadStatus::Error(err)
                }
            },
            Err(err) => {
                warn!(method = self.method, error = %err, "Read failed");
                ReadStatus::Error(err.into())
            }
        }
    }

    fn decode(&self, data: &Bytes) -> Result<T, ReadError> {
        let output = self
            .contract
            .method(self.method)
            .and_then(|spec| spec.output())
            .ok_or_else(|| ReadError::Decode(format!("{} returns nothing", self.method)))?;

        Args::from_bytes(data.to_vec())
            .next_typed::<T>(output)
            .map_err(|e| ReadError::Decode(e.to_string()))
    }

    fn issuance(&self) -> MutexGuard<'_, Issuance> {
        self.issuance.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! In-memory doubles for the provider and wallet seams.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use alloy_primitives::{Address, B256, Bytes, U64, U256, address};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::{
    basic_elements::args::Args,
    client::{
        rpc_client::Provider,
        wallet::{Connector, Wallet, WalletAccount},
    },
    config::{Config, ReceiptPolicy},
    constants::{DEFAULT_PROJECT_ID, SEPOLIA_CHAIN_ID, TOKEN_DECIMALS},
    error::{ConnectionError, ProviderError, WalletError},
    links::Explorer,
    registry::{ContractName, contract},
    screens::Services,
    session::SessionProvider,
    types::{
        AbiValue,
        receipt::{TransactionReceipt, TransactionRequest},
    },
};

pub fn account_a() -> Address {
    address!("0x1111111111111111111111111111111111111111")
}

pub fn account_b() -> Address {
    address!("0x2222222222222222222222222222222222222222")
}

/// `whole` tokens in base units.
pub fn units(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10).pow(U256::from(TOKEN_DECIMALS))
}

pub fn tx_hash(n: u8) -> B256 {
    B256::with_last_byte(n)
}

pub fn fast_policy() -> ReceiptPolicy {
    ReceiptPolicy {
        poll_interval_ms: 5,
        timeout_ms: 200,
        confirmations: 1,
    }
}

fn encode_u256(value: U256) -> Bytes {
    let mut args = Args::new();
    args.add_u256(value);
    Bytes::from(args.serialize())
}

fn encode_address(value: Address) -> Bytes {
    let mut args = Args::new();
    args.add_address(value);
    Bytes::from(args.serialize())
}

type CallKey = (Address, Vec<u8>);

/// Provider backed by a mutable table of call results and receipts.
#[derive(Debug, Default)]
pub struct StateProvider {
    calls: Mutex<HashMap<CallKey, Result<Bytes, ProviderError>>>,
    receipts: Mutex<HashMap<B256, TransactionReceipt>>,
    block: AtomicU64,
    call_count: AtomicUsize,
}

impl StateProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn key(name: ContractName, method: &str, args: &[AbiValue]) -> CallKey {
        let descriptor = contract(name);
        let calldata = descriptor.encode_call(method, args).unwrap();
        (descriptor.address, calldata.to_vec())
    }

    pub fn set_raw(&self, name: ContractName, method: &str, args: &[AbiValue], output: Bytes) {
        self.calls
            .lock()
            .unwrap()
            .insert(Self::key(name, method, args), Ok(output));
    }

    pub fn set_u256(&self, name: ContractName, method: &str, args: &[AbiValue], value: U256) {
        self.set_raw(name, method, args, encode_u256(value));
    }

    pub fn set_address(&self, name: ContractName, method: &str, args: &[AbiValue], value: Address) {
        self.set_raw(name, method, args, encode_address(value));
    }

    pub fn fail(&self, name: ContractName, method: &str, args: &[AbiValue], err: ProviderError) {
        self.calls
            .lock()
            .unwrap()
            .insert(Self::key(name, method, args), Err(err));
    }

    /// Records a mined receipt and moves the head up to its block.
    pub fn add_receipt(&self, hash: B256, block: u64, success: bool) {
        self.receipts.lock().unwrap().insert(
            hash,
            TransactionReceipt {
                transaction_hash: hash,
                block_number: U64::from(block),
                status: Some(U64::from(u64::from(success))),
            },
        );
        self.block.fetch_max(block, Ordering::SeqCst);
    }

    pub fn set_block(&self, block: u64) {
        self.block.store(block, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for StateProvider {
    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(SEPOLIA_CHAIN_ID)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        self.calls
            .lock()
            .unwrap()
            .get(&(to, data.to_vec()))
            .cloned()
            .unwrap_or_else(|| {
                Err(ProviderError::Rpc {
                    code: 3,
                    message: "execution reverted".into(),
                })
            })
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        Ok(self.receipts.lock().unwrap().get(&hash).cloned())
    }

    async fn block_number(&self) -> Result<u64, ProviderError> {
        Ok(self.block.load(Ordering::SeqCst))
    }
}

/// A call held by [`GatedProvider`] until the test answers it.
#[derive(Debug)]
pub struct PendingCall {
    pub to: Address,
    pub data: Bytes,
    reply: oneshot::Sender<Result<Bytes, ProviderError>>,
}

impl PendingCall {
    pub fn reply_u256(self, value: U256) {
        let _ = self.reply.send(Ok(encode_u256(value)));
    }

    pub fn reply_err(self, err: ProviderError) {
        let _ = self.reply.send(Err(err));
    }
}

/// Provider whose calls settle only when the test replies, in any order.
#[derive(Debug)]
pub struct GatedProvider {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl GatedProvider {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { calls }), receiver)
    }
}

#[async_trait]
impl Provider for GatedProvider {
    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(SEPOLIA_CHAIN_ID)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        let (reply, response) = oneshot::channel();
        self.calls
            .send(PendingCall { to, data, reply })
            .map_err(|_| ProviderError::Transport("test harness gone".into()))?;

        response
            .await
            .unwrap_or_else(|_| Err(ProviderError::Transport("call dropped".into())))
    }

    async fn transaction_receipt(
        &self,
        _hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        Ok(None)
    }

    async fn block_number(&self) -> Result<u64, ProviderError> {
        Ok(0)
    }
}

type SendHook = Box<dyn FnMut(&TransactionRequest) + Send>;

/// Scripted wallet. Sends succeed with sequential hashes unless a result was queued.
pub struct MockWallet {
    connection: Result<Option<WalletAccount>, ConnectionError>,
    sends: Mutex<VecDeque<Result<B256, WalletError>>>,
    approval: Mutex<Option<oneshot::Receiver<()>>>,
    on_send: Mutex<Option<SendHook>>,
    requests: Mutex<Vec<TransactionRequest>>,
}

impl MockWallet {
    fn with_connection(connection: Result<Option<WalletAccount>, ConnectionError>) -> Self {
        Self {
            connection,
            sends: Mutex::new(VecDeque::new()),
            approval: Mutex::new(None),
            on_send: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn connected(address: Address) -> Self {
        Self::with_connection(Ok(Some(WalletAccount {
            address,
            chain_id: SEPOLIA_CHAIN_ID,
        })))
    }

    pub fn cancelling() -> Self {
        Self::with_connection(Ok(None))
    }

    pub fn unavailable() -> Self {
        Self::with_connection(Err(ConnectionError::NoWalletAvailable))
    }

    pub fn with_send(self, result: Result<B256, WalletError>) -> Self {
        self.sends.lock().unwrap().push_back(result);
        self
    }

    /// Holds the next send until the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<()> {
        let (approve, approval) = oneshot::channel();
        *self.approval.lock().unwrap() = Some(approval);
        approve
    }

    /// Runs `hook` whenever a transaction is approved, before the hash is returned.
    pub fn on_send(self, hook: impl FnMut(&TransactionRequest) + Send + 'static) -> Self {
        *self.on_send.lock().unwrap() = Some(Box::new(hook));
        self
    }

    pub fn requests(&self) -> Vec<TransactionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Wallet for MockWallet {
    fn connector(&self) -> Connector {
        Connector::WalletConnect {
            project_id: DEFAULT_PROJECT_ID.to_string(),
        }
    }

    async fn request_connection(&self) -> Result<Option<WalletAccount>, ConnectionError> {
        self.connection.clone()
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, WalletError> {
        let sequence = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        let approval = self.approval.lock().unwrap().take();
        if let Some(approval) = approval {
            approval.await.map_err(|_| WalletError::Unavailable)?;
        }

        let queued = self.sends.lock().unwrap().pop_front();
        let result = queued.unwrap_or_else(|| Ok(tx_hash(sequence as u8)));

        if result.is_ok() {
            if let Some(hook) = self.on_send.lock().unwrap().as_mut() {
                hook(&request);
            }
        }

        result
    }
}

/// Services wired to in-memory doubles, with the session already connected.
pub struct Harness {
    pub sessions: SessionProvider,
    pub provider: Arc<StateProvider>,
    pub wallet: Arc<MockWallet>,
    pub services: Services,
}

impl Harness {
    pub async fn connected(account: Address) -> Self {
        Self::with_wallet(MockWallet::connected(account)).await
    }

    pub async fn with_wallet(wallet: MockWallet) -> Self {
        let config = Config::sepolia();
        let sessions = SessionProvider::from_config(&config);
        sessions.connect(&wallet).await.unwrap();

        let provider = StateProvider::new();
        let wallet = Arc::new(wallet);
        let services = Services {
            provider: provider.clone(),
            wallet: wallet.clone(),
            session: sessions.handle(),
            policy: fast_policy(),
            explorer: Explorer::from_config(&config),
        };

        Self {
            sessions,
            provider,
            wallet,
            services,
        }
    }
}

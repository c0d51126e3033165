//! # Outbound Ports
//!
//! Traits for the external collaborators the core consumes: the ledger node
//! (queries, announces, event subscriptions) and the signer device. Both are
//! pure I/O boundaries; no protocol logic lives behind them.

use crate::domain::{
    EscrowError, SignedCosignature, SignedTransaction, TransactionScope, TransactionStatus,
    UnsignedPayload,
};
use async_trait::async_trait;
use escrow_types::{AccountInfo, Address, AssetId, PublicKey, TxHash};

/// Block metadata from the ledger.
#[derive(Clone, Debug)]
pub struct BlockInfo {
    /// Block height.
    pub height: u64,
    /// Block timestamp in milliseconds, relative to the network's epoch
    /// adjustment.
    pub timestamp_ms: u64,
}

/// Summary row from a bonded bundle search.
#[derive(Clone, Debug)]
pub struct BondedSummary {
    /// Content hash of the bundle.
    pub hash: TxHash,
    /// Height of the containing block; 0 while still in the partial pool.
    pub height: u64,
}

/// One inner transfer as reported by the ledger's transaction detail.
#[derive(Clone, Debug)]
pub struct TransferView {
    /// Address of the account that signed this transfer.
    pub signer: Address,
    /// Receiving address.
    pub recipient: Address,
    /// Transferred asset.
    pub asset: AssetId,
    /// Amount in the asset's minor units.
    pub amount: u64,
    /// Transfer payload.
    pub payload: String,
}

/// Full transaction detail as reported by the ledger.
#[derive(Clone, Debug)]
pub struct TransactionDetail {
    /// Content hash.
    pub hash: TxHash,
    /// Height of the containing block; 0 while still in the partial pool.
    pub height: u64,
    /// Inner transfers, in on-ledger order.
    pub transfers: Vec<TransferView>,
    /// Serialized form, as fed to the signer for cosigning.
    pub serialized_payload: Vec<u8>,
}

/// An open ledger event subscription for one address.
///
/// The wait methods resolve when a matching notification arrives and pend
/// forever otherwise; callers bound them externally (the confirmation race
/// does so with its poll branch). `close` must be called exactly once.
#[async_trait]
pub trait LedgerSubscription: Send {
    /// Resolve when a confirmed notification for `hash` arrives.
    async fn wait_confirmed(&mut self, hash: &TxHash) -> Result<(), EscrowError>;

    /// Resolve when a bonded-added notification for `hash` arrives (the
    /// bundle entered the partial pool).
    async fn wait_bonded_added(&mut self, hash: &TxHash) -> Result<(), EscrowError>;

    /// Release the subscription.
    async fn close(&mut self);
}

/// Ledger node operations - outbound port.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Resolve an address to the account the ledger has on file.
    async fn resolve_account(&self, address: &Address) -> Result<AccountInfo, EscrowError>;

    /// Current chain height.
    async fn chain_height(&self) -> Result<u64, EscrowError>;

    /// Block metadata at a height.
    async fn block_by_height(&self, height: u64) -> Result<BlockInfo, EscrowError>;

    /// Full detail of a transaction in the given scope.
    async fn get_transaction(
        &self,
        hash: &TxHash,
        scope: TransactionScope,
    ) -> Result<TransactionDetail, EscrowError>;

    /// Bonded bundles addressed to or from an address, newest first.
    async fn search_bonded(
        &self,
        address: &Address,
        scope: TransactionScope,
        page_size: u32,
    ) -> Result<Vec<BondedSummary>, EscrowError>;

    /// Announce a standard signed transaction.
    async fn announce(&self, tx: &SignedTransaction) -> Result<(), EscrowError>;

    /// Announce a signed bonded bundle into the partial pool.
    async fn announce_bonded(&self, tx: &SignedTransaction) -> Result<(), EscrowError>;

    /// Announce a cosignature over a pending bundle.
    async fn announce_cosignature(&self, cosig: &SignedCosignature) -> Result<(), EscrowError>;

    /// Current status of a transaction by hash.
    async fn transaction_status(&self, hash: &TxHash) -> Result<TransactionStatus, EscrowError>;

    /// Open an event subscription for an address.
    async fn subscribe(
        &self,
        address: &Address,
    ) -> Result<Box<dyn LedgerSubscription>, EscrowError>;
}

/// Signer device operations - outbound port.
///
/// The device holds one pending item at a time per session. It rejects two
/// signature requests issued back to back; callers must leave the mandated
/// spacing between them (the orchestrator's explicit wait step).
#[async_trait]
pub trait SignerGateway: Send + Sync {
    /// Stage an unsigned transaction on the device.
    async fn set_transaction(&self, tx: UnsignedPayload) -> Result<(), EscrowError>;

    /// Ask the user to sign the staged transaction.
    async fn request_signature(&self) -> Result<SignedTransaction, EscrowError>;

    /// Stage a serialized pending bundle for cosigning.
    async fn set_cosignature_source(&self, serialized: Vec<u8>) -> Result<(), EscrowError>;

    /// Ask the user to cosign the staged bundle.
    async fn request_cosignature(&self) -> Result<SignedCosignature, EscrowError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scriptable in-memory ledger for tests.
#[derive(Default)]
pub struct MockLedgerGateway {
    unreachable: AtomicBool,
    accounts: Mutex<HashMap<Address, AccountInfo>>,
    statuses: Mutex<HashMap<TxHash, String>>,
    confirm_events: Mutex<HashSet<TxHash>>,
    bonded_events: Mutex<HashSet<TxHash>>,
    event_delay: Mutex<Duration>,
    details: Mutex<Vec<TransactionDetail>>,
    chain_height: AtomicU64,
    block_times: Mutex<HashMap<u64, u64>>,
    /// Hashes announced via the standard path, in order.
    pub announced: Mutex<Vec<TxHash>>,
    /// Hashes announced into the partial pool, in order.
    pub announced_bonded: Mutex<Vec<TxHash>>,
    /// Parent hashes of announced cosignatures, in order.
    pub announced_cosignatures: Mutex<Vec<TxHash>>,
    /// Number of status fetches served.
    pub status_fetches: AtomicU64,
    /// Number of subscriptions opened.
    pub subscriptions_opened: Arc<AtomicU64>,
    /// Number of subscriptions closed.
    pub subscriptions_closed: Arc<AtomicU64>,
}

impl MockLedgerGateway {
    /// Fresh mock with height 100 and no scripted state.
    pub fn new() -> Self {
        let mock = Self::default();
        mock.chain_height.store(100, Ordering::Relaxed);
        *mock.event_delay.lock() = Duration::from_millis(10);
        mock
    }

    /// Make every operation fail with `NodeUnreachable`.
    pub fn set_unreachable(&self) {
        self.unreachable.store(true, Ordering::Relaxed);
    }

    /// Register a resolvable account.
    pub fn add_account(&self, info: AccountInfo) {
        self.accounts.lock().insert(info.address.clone(), info);
    }

    /// Script the status code returned for a hash. Unscripted hashes report
    /// the success sentinel (announced, not yet decided).
    pub fn set_status(&self, hash: TxHash, code: &str) {
        self.statuses.lock().insert(hash, code.to_string());
    }

    /// Script a confirmed notification for a hash.
    pub fn add_confirm_event(&self, hash: TxHash) {
        self.confirm_events.lock().insert(hash);
    }

    /// Script a bonded-added notification for a hash.
    pub fn add_bonded_event(&self, hash: TxHash) {
        self.bonded_events.lock().insert(hash);
    }

    /// Delay between subscribing and a scripted event firing.
    pub fn set_event_delay(&self, delay: Duration) {
        *self.event_delay.lock() = delay;
    }

    /// Script a transaction detail, which also appears in bonded searches.
    pub fn add_detail(&self, detail: TransactionDetail) {
        self.details.lock().push(detail);
    }

    /// Script a block timestamp (milliseconds since epoch adjustment).
    pub fn set_block_time(&self, height: u64, timestamp_ms: u64) {
        self.block_times.lock().insert(height, timestamp_ms);
    }

    fn check_reachable(&self) -> Result<(), EscrowError> {
        if self.unreachable.load(Ordering::Relaxed) {
            Err(EscrowError::NodeUnreachable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LedgerGateway for MockLedgerGateway {
    async fn resolve_account(&self, address: &Address) -> Result<AccountInfo, EscrowError> {
        self.check_reachable()?;
        self.accounts
            .lock()
            .get(address)
            .cloned()
            .ok_or_else(|| EscrowError::AddressResolution(address.to_string()))
    }

    async fn chain_height(&self) -> Result<u64, EscrowError> {
        self.check_reachable()?;
        Ok(self.chain_height.load(Ordering::Relaxed))
    }

    async fn block_by_height(&self, height: u64) -> Result<BlockInfo, EscrowError> {
        self.check_reachable()?;
        let timestamp_ms = self
            .block_times
            .lock()
            .get(&height)
            .copied()
            .unwrap_or(height * 30_000);
        Ok(BlockInfo {
            height,
            timestamp_ms,
        })
    }

    async fn get_transaction(
        &self,
        hash: &TxHash,
        _scope: TransactionScope,
    ) -> Result<TransactionDetail, EscrowError> {
        self.check_reachable()?;
        self.details
            .lock()
            .iter()
            .find(|d| d.hash == *hash)
            .cloned()
            .ok_or_else(|| EscrowError::TransactionNotFound(hash.to_hex()))
    }

    async fn search_bonded(
        &self,
        _address: &Address,
        scope: TransactionScope,
        page_size: u32,
    ) -> Result<Vec<BondedSummary>, EscrowError> {
        self.check_reachable()?;
        let rows: Vec<BondedSummary> = self
            .details
            .lock()
            .iter()
            .filter(|d| match scope {
                TransactionScope::Pending => d.height == 0,
                TransactionScope::Finalized => d.height > 0,
            })
            .take(page_size as usize)
            .map(|d| BondedSummary {
                hash: d.hash,
                height: d.height,
            })
            .collect();
        Ok(rows)
    }

    async fn announce(&self, tx: &SignedTransaction) -> Result<(), EscrowError> {
        self.check_reachable()?;
        self.announced.lock().push(tx.hash);
        Ok(())
    }

    async fn announce_bonded(&self, tx: &SignedTransaction) -> Result<(), EscrowError> {
        self.check_reachable()?;
        self.announced_bonded.lock().push(tx.hash);
        Ok(())
    }

    async fn announce_cosignature(&self, cosig: &SignedCosignature) -> Result<(), EscrowError> {
        self.check_reachable()?;
        self.announced_cosignatures.lock().push(cosig.parent_hash);
        Ok(())
    }

    async fn transaction_status(&self, hash: &TxHash) -> Result<TransactionStatus, EscrowError> {
        self.check_reachable()?;
        self.status_fetches.fetch_add(1, Ordering::Relaxed);
        let code = self
            .statuses
            .lock()
            .get(hash)
            .cloned()
            .unwrap_or_else(|| crate::domain::SUCCESS_CODE.to_string());
        Ok(TransactionStatus { code })
    }

    async fn subscribe(
        &self,
        _address: &Address,
    ) -> Result<Box<dyn LedgerSubscription>, EscrowError> {
        self.check_reachable()?;
        self.subscriptions_opened.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(MockSubscription {
            confirm_events: self.confirm_events.lock().clone(),
            bonded_events: self.bonded_events.lock().clone(),
            delay: *self.event_delay.lock(),
            closed: Arc::clone(&self.subscriptions_closed),
        }))
    }
}

/// Subscription handle produced by [`MockLedgerGateway`].
pub struct MockSubscription {
    confirm_events: HashSet<TxHash>,
    bonded_events: HashSet<TxHash>,
    delay: Duration,
    closed: Arc<AtomicU64>,
}

#[async_trait]
impl LedgerSubscription for MockSubscription {
    async fn wait_confirmed(&mut self, hash: &TxHash) -> Result<(), EscrowError> {
        if self.confirm_events.contains(hash) {
            tokio::time::sleep(self.delay).await;
            Ok(())
        } else {
            std::future::pending().await
        }
    }

    async fn wait_bonded_added(&mut self, hash: &TxHash) -> Result<(), EscrowError> {
        if self.bonded_events.contains(hash) {
            tokio::time::sleep(self.delay).await;
            Ok(())
        } else {
            std::future::pending().await
        }
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Scriptable signer device for tests.
pub struct MockSignerGateway {
    pending: Mutex<Option<UnsignedPayload>>,
    pending_cosig: Mutex<Option<Vec<u8>>>,
    scripted_hashes: Mutex<VecDeque<TxHash>>,
    cosig_parent: Mutex<Option<TxHash>>,
    cancel: AtomicBool,
    next_hash: AtomicU64,
    signer_key: PublicKey,
    /// Instants at which signature requests were received.
    pub request_times: Mutex<Vec<tokio::time::Instant>>,
    /// Everything staged on the device, in order.
    pub staged_history: Mutex<Vec<UnsignedPayload>>,
}

impl Default for MockSignerGateway {
    fn default() -> Self {
        Self {
            pending: Mutex::new(None),
            pending_cosig: Mutex::new(None),
            scripted_hashes: Mutex::new(VecDeque::new()),
            cosig_parent: Mutex::new(None),
            cancel: AtomicBool::new(false),
            next_hash: AtomicU64::new(1),
            signer_key: PublicKey::from_bytes([0xEE; 32]),
            request_times: Mutex::new(Vec::new()),
            staged_history: Mutex::new(Vec::new()),
        }
    }
}

impl MockSignerGateway {
    /// Fresh mock that signs everything with derived hashes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the hashes returned by successive signature requests.
    pub fn script_hashes(&self, hashes: impl IntoIterator<Item = TxHash>) {
        self.scripted_hashes.lock().extend(hashes);
    }

    /// Script the parent hash embedded in the next cosignature.
    pub fn script_cosignature_parent(&self, parent: TxHash) {
        *self.cosig_parent.lock() = Some(parent);
    }

    /// Make the user decline every request.
    pub fn set_cancelled(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    fn next_hash(&self) -> TxHash {
        let n = self.next_hash.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&n.to_be_bytes());
        TxHash::from_bytes(bytes)
    }
}

#[async_trait]
impl SignerGateway for MockSignerGateway {
    async fn set_transaction(&self, tx: UnsignedPayload) -> Result<(), EscrowError> {
        self.staged_history.lock().push(tx.clone());
        *self.pending.lock() = Some(tx);
        Ok(())
    }

    async fn request_signature(&self) -> Result<SignedTransaction, EscrowError> {
        self.request_times.lock().push(tokio::time::Instant::now());
        if self.cancel.load(Ordering::Relaxed) {
            return Err(EscrowError::SignerCancelled);
        }
        let pending = self.pending.lock().take();
        if pending.is_none() {
            return Err(EscrowError::SignerRejected(
                "no transaction staged".to_string(),
            ));
        }
        let hash = self
            .scripted_hashes
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.next_hash());
        Ok(SignedTransaction {
            payload: hash.as_bytes().to_vec(),
            hash,
            signer: self.signer_key,
        })
    }

    async fn set_cosignature_source(&self, serialized: Vec<u8>) -> Result<(), EscrowError> {
        *self.pending_cosig.lock() = Some(serialized);
        Ok(())
    }

    async fn request_cosignature(&self) -> Result<SignedCosignature, EscrowError> {
        self.request_times.lock().push(tokio::time::Instant::now());
        if self.cancel.load(Ordering::Relaxed) {
            return Err(EscrowError::SignerCancelled);
        }
        if self.pending_cosig.lock().take().is_none() {
            return Err(EscrowError::SignerRejected("no bundle staged".to_string()));
        }
        let parent_hash = self
            .cosig_parent
            .lock()
            .take()
            .ok_or_else(|| EscrowError::SignerRejected("no parent scripted".to_string()))?;
        Ok(SignedCosignature {
            parent_hash,
            signature: vec![0xC0; 64],
            signer: self.signer_key,
        })
    }
}

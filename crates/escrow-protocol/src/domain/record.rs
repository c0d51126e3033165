//! # Escrow Records
//!
//! Transient view of an escrow rebuilt from ledger history. Recomputed on
//! every search; never persisted, never written back to the ledger.

use escrow_types::{Address, AssetId, TxHash};
use serde::{Deserialize, Serialize};

/// Which ledger pool a query addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionScope {
    /// Bundles sitting in the partial pool, awaiting cosignatures.
    Pending,
    /// Bundles included in a finalized block.
    Finalized,
}

/// One escrow as reconstructed from a bonded bundle's three inner transfers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Party that initiated the escrow (signer of the payment transfer).
    pub requester: Address,
    /// Party delivering the asset (recipient of the payment transfer).
    pub counterparty: Address,
    /// Unix milliseconds of the containing block; 0 while the bundle is
    /// still in the partial pool.
    pub block_time_ms: u64,
    /// Expiration instant carried in the payment transfer's payload.
    pub expires_at_ms: u64,
    /// Traded asset.
    pub asset: AssetId,
    /// Asset quantity.
    pub quantity: u64,
    /// Price in settlement-currency major units (minor units on the wire,
    /// divided back down on read).
    pub price: u64,
    /// Free-text message from the asset transfer.
    pub message: String,
    /// Content hash of the bundle.
    pub hash: TxHash,
}

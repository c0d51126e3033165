//! # Bundle Entities
//!
//! The three-party bonded bundle, its collateral lock, and the signed forms
//! returned by the signer device.

use super::config::ProtocolConfig;
use escrow_types::{Address, AssetId, PublicKey, TxHash};
use serde::{Deserialize, Serialize};

/// One inner transfer of the bonded bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerTransfer {
    /// Public key of the account that must sign this transfer.
    pub signer: PublicKey,
    /// Receiving address.
    pub recipient: Address,
    /// Transferred asset.
    pub asset: AssetId,
    /// Amount in the asset's minor units.
    pub amount: u64,
    /// Transfer payload (expiration instant, free text, or the service
    /// marker, depending on position).
    pub payload: String,
}

/// The unsigned three-party bonded bundle.
///
/// Inner order is fixed and is the sole mechanism by which reconstruction
/// later assigns semantic roles: position 0 is the payment, 1 the asset
/// transfer, 2 the service fee. Reordering breaks reconstruction silently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowBundle {
    /// The three inner transfers, in protocol order.
    pub transfers: [InnerTransfer; 3],
    /// Fee multiplier applied when the bundle is announced.
    pub max_fee_multiplier: u64,
}

impl EscrowBundle {
    /// The requester's settlement-currency payment (position 0).
    pub fn payment(&self) -> &InnerTransfer {
        &self.transfers[0]
    }

    /// The counterparty's asset transfer (position 1).
    pub fn asset_transfer(&self) -> &InnerTransfer {
        &self.transfers[1]
    }

    /// The requester's service fee (position 2).
    pub fn service_fee(&self) -> &InnerTransfer {
        &self.transfers[2]
    }
}

/// Collateral lock posted ahead of a bonded bundle.
///
/// The ledger rejects a bonded bundle whose collateral has not confirmed, so
/// the lock must reach finality before the bundle is announced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralLock {
    /// Asset the stake is posted in (the settlement currency).
    pub stake_asset: AssetId,
    /// Stake amount in settlement minor units.
    pub stake: u64,
    /// Validity window, in blocks. The stake is forfeited if the bundle is
    /// not completed within it.
    pub duration_blocks: u64,
    /// Content hash of the signed bundle this lock covers.
    pub bundle_hash: TxHash,
    /// Fee multiplier applied when the lock is announced.
    pub max_fee_multiplier: u64,
}

impl CollateralLock {
    /// Build the lock covering an already-signed bundle.
    pub fn for_bundle(signed_bundle: &SignedTransaction, config: &ProtocolConfig) -> Self {
        Self {
            stake_asset: config.settlement_asset,
            stake: config.collateral_stake,
            duration_blocks: config.lock_duration_blocks,
            bundle_hash: signed_bundle.hash,
            max_fee_multiplier: config.max_fee_multiplier,
        }
    }
}

/// What the signer device is asked to sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnsignedPayload {
    /// The three-party bonded bundle.
    Bundle(EscrowBundle),
    /// The collateral lock covering a signed bundle.
    Lock(CollateralLock),
}

/// A transaction signed by the external signer device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Serialized signed transaction, ready to announce.
    pub payload: Vec<u8>,
    /// Content hash identifying the transaction on the ledger.
    pub hash: TxHash,
    /// Public key of the signing account.
    pub signer: PublicKey,
}

/// A cosignature over a pending bonded bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCosignature {
    /// Hash of the parent bundle being completed. Confirmation is watched on
    /// this hash, not on the cosignature itself.
    pub parent_hash: TxHash,
    /// The cosignature bytes.
    pub signature: Vec<u8>,
    /// Public key of the cosigning account.
    pub signer: PublicKey,
}

//! # Inbound Ports
//!
//! API trait defining what the escrow core can do for its callers.

use crate::domain::{
    EscrowError, EscrowProposal, EscrowRecord, TransactionOutcome, TransactionScope,
};
use async_trait::async_trait;
use escrow_types::{Address, TxHash};

/// Escrow use cases - inbound port.
#[async_trait]
pub trait EscrowApi: Send + Sync {
    /// Run the full escrow-creation flow: build the bundle, obtain both
    /// signatures, confirm the collateral lock, then announce the bundle and
    /// wait for it to enter the partial pool.
    ///
    /// Non-success outcomes are terminal; nothing is retried.
    async fn create_escrow(
        &self,
        proposal: EscrowProposal,
    ) -> Result<TransactionOutcome, EscrowError>;

    /// Complete a pending bundle with the counterparty's cosignature and
    /// wait for the parent bundle's confirmation.
    async fn cosign_escrow(
        &self,
        party: &Address,
        bundle_hash: &TxHash,
    ) -> Result<TransactionOutcome, EscrowError>;

    /// Rebuild the escrow records addressed to or from a party by replaying
    /// the ledger's bonded bundles in the given scope.
    ///
    /// An unreachable node is an error, distinct from an empty result.
    async fn search_escrows(
        &self,
        party: &Address,
        scope: TransactionScope,
    ) -> Result<Vec<EscrowRecord>, EscrowError>;
}

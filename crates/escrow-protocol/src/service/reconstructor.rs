//! # Escrow Reconstructor
//!
//! Rebuilds escrow records by replaying the ledger's bonded bundles for a
//! party. Stateless: every search recomputes from ledger history, and no
//! write path back to the ledger exists here.
//!
//! A bundle qualifies only when it has exactly the three-transfer escrow
//! layout and its fee transfer carries the service marker; everything else
//! on the same addresses is someone else's traffic. Malformed or foreign
//! items are skipped with a logged reason, never failing the whole scan.

use crate::domain::{EscrowError, EscrowRecord, ProtocolConfig, TransactionScope};
use crate::ports::outbound::{BondedSummary, LedgerGateway};
use escrow_types::{Address, MINOR_UNITS_PER_MAJOR};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Number of inner transfers in a well-formed escrow bundle.
const ESCROW_SHAPE: usize = 3;

/// Why one scanned bundle produced no record.
enum SkipReason {
    /// Detail fetch failed for this item.
    Detail(EscrowError),
    /// Block timestamp lookup failed for this item.
    Block(EscrowError),
    /// Not the three-transfer escrow layout.
    Shape(usize),
    /// Fee transfer does not carry the service marker.
    ForeignMarker,
    /// Payment payload is not a parsable expiration instant.
    BadExpiration,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detail(err) => write!(f, "detail unavailable: {}", err),
            Self::Block(err) => write!(f, "block unavailable: {}", err),
            Self::Shape(n) => write!(f, "expected {} inner transfers, found {}", ESCROW_SHAPE, n),
            Self::ForeignMarker => f.write_str("fee payload is not the service marker"),
            Self::BadExpiration => f.write_str("payment payload is not an expiration instant"),
        }
    }
}

/// Replays bonded bundles into escrow records.
pub struct EscrowReconstructor<L: LedgerGateway> {
    ledger: Arc<L>,
    config: ProtocolConfig,
}

impl<L: LedgerGateway> EscrowReconstructor<L> {
    /// Create a reconstructor over a ledger gateway.
    pub fn new(ledger: Arc<L>, config: ProtocolConfig) -> Self {
        Self { ledger, config }
    }

    /// Rebuild the escrow records addressed to or from `party`.
    ///
    /// Results preserve the ledger's descending order (newest first). An
    /// unreachable node is an error, distinct from "searched, found
    /// nothing".
    pub async fn search(
        &self,
        party: &Address,
        scope: TransactionScope,
    ) -> Result<Vec<EscrowRecord>, EscrowError> {
        let account = self.ledger.resolve_account(party).await?;
        let rows = self
            .ledger
            .search_bonded(&account.address, scope, self.config.search_page_size)
            .await?;
        debug!(party = %party, scope = ?scope, candidates = rows.len(), "Scanning bonded bundles");

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match self.rebuild(&row, scope).await {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!(hash = %row.hash, %reason, "Skipping bonded bundle");
                }
            }
        }
        Ok(records)
    }

    async fn rebuild(
        &self,
        row: &BondedSummary,
        scope: TransactionScope,
    ) -> Result<EscrowRecord, SkipReason> {
        // Height 0 means the bundle still sits in the partial pool; only an
        // included bundle has a block timestamp to resolve.
        let block_time_ms = if row.height > 0 {
            let block = self
                .ledger
                .block_by_height(row.height)
                .await
                .map_err(SkipReason::Block)?;
            block.timestamp_ms + self.config.epoch_adjustment_secs * 1000
        } else {
            0
        };

        let detail = self
            .ledger
            .get_transaction(&row.hash, scope)
            .await
            .map_err(SkipReason::Detail)?;
        if detail.transfers.len() != ESCROW_SHAPE {
            return Err(SkipReason::Shape(detail.transfers.len()));
        }
        let payment = &detail.transfers[0];
        let asset_transfer = &detail.transfers[1];
        let fee = &detail.transfers[2];

        if fee.payload != self.config.service_discriminator {
            return Err(SkipReason::ForeignMarker);
        }
        let expires_at_ms = payment
            .payload
            .parse::<u64>()
            .map_err(|_| SkipReason::BadExpiration)?;

        Ok(EscrowRecord {
            requester: payment.signer.clone(),
            counterparty: payment.recipient.clone(),
            block_time_ms,
            expires_at_ms,
            asset: asset_transfer.asset,
            quantity: asset_transfer.amount,
            price: payment.amount / MINOR_UNITS_PER_MAJOR,
            message: asset_transfer.payload.clone(),
            hash: detail.hash,
        })
    }
}

//! # Domain Errors
//!
//! Error taxonomy for the escrow protocol core.
//!
//! `NodeUnreachable` is a typed variant rather than a panic or an `Option`:
//! callers must distinguish "could not ask the ledger" from "asked, got an
//! answer". The reconstructor additionally swallows per-item shape errors
//! internally; those never surface through this enum.

use escrow_types::ParseError;
use thiserror::Error;

/// Escrow protocol error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// No healthy ledger endpoint could be reached.
    #[error("No ledger node reachable")]
    NodeUnreachable,

    /// The ledger does not know the given address.
    #[error("Address not known to the ledger: {0}")]
    AddressResolution(String),

    /// The signer device returned an error.
    #[error("Signer rejected the request: {0}")]
    SignerRejected(String),

    /// The user declined the signature request.
    #[error("Signer request cancelled")]
    SignerCancelled,

    /// A queried transaction is missing from the requested group.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Terms validation failed before any ledger interaction.
    #[error("Invalid escrow terms: {0}")]
    InvalidTerms(String),

    /// A primitive failed to parse at the gateway boundary.
    #[error("Malformed wire value: {0}")]
    Malformed(#[from] ParseError),

    /// The ledger event subscription closed before delivering a decision.
    #[error("Ledger subscription closed")]
    SubscriptionClosed,
}

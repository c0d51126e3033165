//! # Parse Errors
//!
//! Error types for wire-format parsing at the workspace boundary.

use thiserror::Error;

/// Errors raised while parsing ledger primitives from their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Address string has the wrong length or alphabet.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Transaction hash is not 64 hex characters.
    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),

    /// Asset identifier is not 16 hex characters.
    #[error("Invalid asset id: {0}")]
    InvalidAssetId(String),

    /// Public key is not 64 hex characters.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

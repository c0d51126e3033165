//! # Posting Outcomes
//!
//! Terminal result of every posting operation. Never silently dropped: each
//! announce path returns one of these, and callers decide what to do with
//! non-success.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code the ledger reports for a fully accepted transaction.
pub const SUCCESS_CODE: &str = "Success";

/// Transaction status as reported by the ledger's status endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    /// Raw ledger status code. [`SUCCESS_CODE`] means accepted; anything
    /// else names the rejection reason.
    pub code: String,
}

impl TransactionStatus {
    /// Whether the code is the success sentinel.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Terminal outcome of announcing a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionOutcome {
    /// The ledger accepted the transaction.
    Success,
    /// The ledger rejected it; carries the ledger's status code.
    Failure(String),
    /// No decisive signal: no node reachable, or the signer declined before
    /// anything was announced.
    Undetermined,
}

impl TransactionOutcome {
    /// Whether this outcome permits the flow to advance.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<TransactionStatus> for TransactionOutcome {
    fn from(status: TransactionStatus) -> Self {
        if status.is_success() {
            Self::Success
        } else {
            Self::Failure(status.code)
        }
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure(code) => write!(f, "failure({})", code),
            Self::Undetermined => f.write_str("undetermined"),
        }
    }
}

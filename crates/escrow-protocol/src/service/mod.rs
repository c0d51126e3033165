//! # Service Layer
//!
//! The orchestrated use cases: confirmation tracking, escrow creation and
//! cosignature completion, and ledger replay.

pub mod orchestrator;
pub mod reconstructor;
pub mod tracker;

pub use orchestrator::EscrowOrchestrator;
pub use reconstructor::EscrowReconstructor;
pub use tracker::{ConfirmationTracker, Submission, Watch, WatchKind};

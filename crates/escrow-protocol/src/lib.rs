//! # Escrow Transaction Protocol Core
//!
//! Client-side protocol core for escrowed asset swaps between two mutually
//! untrusting parties, anchored on a public ledger's bonded aggregate
//! primitive instead of a custodian.
//!
//! ## Purpose
//!
//! - Build the three-party atomic bundle (payment, asset transfer, service fee)
//! - Post and confirm the collateral lock the ledger requires ahead of it
//! - Detect finality by racing an event subscription against a bounded poll
//! - Complete pending bundles with the counterparty's cosignature
//! - Rebuild escrow records by replaying bonded bundles from ledger history
//!
//! ## Module Structure
//!
//! ```text
//! escrow-protocol/
//! ├── domain/          # Terms, bundle, record, outcome, flow states, config
//! ├── algorithms/      # Pure bundle construction
//! ├── ports/           # EscrowApi, LedgerGateway, SignerGateway
//! └── service/         # ConfirmationTracker, EscrowOrchestrator, EscrowReconstructor
//! ```
//!
//! ## Trust Model
//!
//! | Concern | Where it lives |
//! |---------|----------------|
//! | Consensus & signature validation | the ledger network, not here |
//! | Key material | the external signer device, not here |
//! | Escrow state | recovered from the ledger on every query |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::build_bundle;
pub use domain::{
    CollateralLock, CosignFlowState, CreateFlowState, EscrowBundle, EscrowError, EscrowProposal,
    EscrowRecord, EscrowTerms, InnerTransfer, ProtocolConfig, SignedCosignature,
    SignedTransaction, TransactionOutcome, TransactionScope, TransactionStatus, UnsignedPayload,
    MAX_MESSAGE_LEN, SERVICE_DISCRIMINATOR, SUCCESS_CODE,
};
pub use ports::{
    BlockInfo, BondedSummary, EscrowApi, LedgerGateway, LedgerSubscription, MockLedgerGateway,
    MockSignerGateway, SignerGateway, TransactionDetail, TransferView,
};
pub use service::{
    ConfirmationTracker, EscrowOrchestrator, EscrowReconstructor, Submission, Watch, WatchKind,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

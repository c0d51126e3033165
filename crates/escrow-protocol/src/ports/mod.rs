//! # Ports
//!
//! Hexagonal boundaries: the inbound API this crate offers, and the outbound
//! gateways it consumes (ledger node, signer device).

pub mod inbound;
pub mod outbound;

pub use inbound::EscrowApi;
pub use outbound::{
    BlockInfo, BondedSummary, LedgerGateway, LedgerSubscription, MockLedgerGateway,
    MockSignerGateway, SignerGateway, TransactionDetail, TransferView,
};

//! # Escrow Types Crate
//!
//! Ledger primitive types shared across the workspace: textual addresses,
//! transaction content hashes, asset identifiers, and account descriptors.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every crate in the workspace speaks these
//!   types at its boundaries; no crate re-derives its own address format.
//! - **Parse, don't validate twice**: a constructed value is well-formed by
//!   construction. Malformed wire input fails at the edge with a typed
//!   [`ParseError`].

pub mod errors;
pub mod primitives;

pub use errors::ParseError;
pub use primitives::{
    AccountInfo, Address, AssetId, PublicKey, TxHash, ADDRESS_LEN, MINOR_UNITS_PER_MAJOR,
};

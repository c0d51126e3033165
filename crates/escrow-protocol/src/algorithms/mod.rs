//! # Algorithms
//!
//! Pure protocol logic with no I/O: bundle construction.

pub mod bundle_builder;

pub use bundle_builder::build_bundle;

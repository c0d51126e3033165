//! # Bonded-Escrow Test Suite
//!
//! Unified test crate containing cross-crate integration flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Full-flow choreography over mock gateways
//!     ├── fixtures.rs   # Shared accounts, config, scripted gateways
//!     ├── creation.rs   # Create flow end to end, then reconstruct
//!     └── concurrency.rs# Independent flows racing side by side
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p escrow-tests
//! cargo test -p escrow-tests integration::
//! ```

pub mod integration;

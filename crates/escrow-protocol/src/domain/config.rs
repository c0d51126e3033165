//! # Protocol Configuration
//!
//! Every tunable the protocol needs, passed explicitly into services at
//! construction. Defaults preserve the values the original deployment was
//! operated with; none of them is load-bearing for correctness, only for
//! interoperability with nodes that expect the same pacing.

use escrow_types::{Address, AssetId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wire-level marker distinguishing this protocol's bundles from unrelated
/// bonded bundles on the same addresses. Compared verbatim against the fee
/// transfer's payload during reconstruction; changing it orphans every
/// already-posted escrow.
pub const SERVICE_DISCRIMINATOR: &str = "bonded-escrow:v1";

/// Protocol configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Address collecting the service fee transfer.
    pub service_address: Address,
    /// Settlement currency asset identifier.
    pub settlement_asset: AssetId,
    /// Service fee in permille of the price (100 = 10%).
    pub fee_permille: u64,
    /// Collateral stake posted with the lock, in settlement minor units.
    pub collateral_stake: u64,
    /// Collateral lock validity, in blocks.
    pub lock_duration_blocks: u64,
    /// Ledger block time in seconds; used to derive expiration instants.
    pub block_time_secs: u64,
    /// Ledger epoch adjustment in seconds (block timestamps are relative to it).
    pub epoch_adjustment_secs: u64,
    /// Fee multiplier applied when announcing transactions.
    pub max_fee_multiplier: u64,
    /// Spacing the signer device requires between two signature requests in
    /// the same session.
    pub signer_spacing: Duration,
    /// Delay before the single status poll in the confirmation race.
    pub poll_delay: Duration,
    /// Delay between lock confirmation and bundle announcement, so that all
    /// nodes recognize the just-confirmed lock.
    pub settle_delay: Duration,
    /// Page size for bonded bundle searches.
    pub search_page_size: u32,
    /// Marker string written into the fee transfer's payload.
    pub service_discriminator: String,
}

impl ProtocolConfig {
    /// Build a configuration with the original deployment's defaults for
    /// everything but the deployment-specific service address and settlement
    /// asset.
    pub fn new(service_address: Address, settlement_asset: AssetId) -> Self {
        Self {
            service_address,
            settlement_asset,
            fee_permille: 100,                             // 10%
            collateral_stake: 10 * 1_000_000,              // 10 units
            lock_duration_blocks: 480,
            block_time_secs: 30,
            epoch_adjustment_secs: 1_615_853_185,
            max_fee_multiplier: 100,
            signer_spacing: Duration::from_secs(1),
            poll_delay: Duration::from_secs(1),
            settle_delay: Duration::from_secs(5),
            search_page_size: 100,
            service_discriminator: SERVICE_DISCRIMINATOR.to_string(),
        }
    }

    /// Lock validity expressed in milliseconds of expected chain time.
    pub fn lock_duration_ms(&self) -> u64 {
        self.lock_duration_blocks * self.block_time_secs * 1000
    }

    /// Service fee for a given price in major units, in settlement minor units.
    pub fn service_fee_minor(&self, price: u64) -> u64 {
        price * escrow_types::MINOR_UNITS_PER_MAJOR / 1000 * self.fee_permille
    }
}

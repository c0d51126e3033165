//! # Bundle Builder
//!
//! Pure construction of the three-party bonded bundle from validated terms
//! and resolved accounts. Given identical inputs the output is structurally
//! identical; no side effects, no I/O.

use crate::domain::{EscrowBundle, EscrowTerms, InnerTransfer, ProtocolConfig};
use escrow_types::{AccountInfo, MINOR_UNITS_PER_MAJOR};

/// Assemble the bonded bundle for the given terms.
///
/// Inner order is load-bearing:
/// 0. requester pays the price to the counterparty, payload = expiration;
/// 1. counterparty sends the asset to the requester, payload = message;
/// 2. requester pays the service fee, payload = the service marker.
pub fn build_bundle(
    terms: &EscrowTerms,
    requester: &AccountInfo,
    counterparty: &AccountInfo,
    config: &ProtocolConfig,
) -> EscrowBundle {
    let payment = InnerTransfer {
        signer: requester.public_key,
        recipient: counterparty.address.clone(),
        asset: config.settlement_asset,
        amount: terms.price * MINOR_UNITS_PER_MAJOR,
        payload: terms.expires_at_ms.to_string(),
    };

    let asset_transfer = InnerTransfer {
        signer: counterparty.public_key,
        recipient: requester.address.clone(),
        asset: terms.asset,
        amount: terms.quantity,
        payload: terms.message.clone(),
    };

    let service_fee = InnerTransfer {
        signer: requester.public_key,
        recipient: config.service_address.clone(),
        asset: config.settlement_asset,
        amount: config.service_fee_minor(terms.price),
        payload: config.service_discriminator.clone(),
    };

    EscrowBundle {
        transfers: [payment, asset_transfer, service_fee],
        max_fee_multiplier: config.max_fee_multiplier,
    }
}

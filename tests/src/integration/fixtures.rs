//! # Test Fixtures
//!
//! Shared accounts, configuration, and gateway scripting helpers for the
//! integration flows.

use escrow_protocol::{
    EscrowBundle, EscrowProposal, MockLedgerGateway, ProtocolConfig, TransactionDetail,
    TransferView,
};
use escrow_types::{AccountInfo, Address, AssetId, PublicKey, TxHash};
use std::sync::Arc;

/// Install a compact subscriber so failing flows explain themselves.
/// Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Requester-side test account address.
pub fn requester_address() -> Address {
    Address::parse("TAREQQLXXWUUXGEARF5DGRZWVGVGJGRSMJWFEPA").unwrap()
}

/// Counterparty-side test account address.
pub fn counterparty_address() -> Address {
    Address::parse("TBCNTRQLXXWUUXGEARF5DGRZWVGVGJGRSMJWFEP").unwrap()
}

/// Fee-collecting service address.
pub fn service_address() -> Address {
    Address::parse("TBONDQLXXWUUXGEARF5DGRZWVGVGJGRSMJWFEPA").unwrap()
}

/// Traded asset used across the flows.
pub fn traded_asset() -> AssetId {
    AssetId::from_hex("3A8416DB2D53B6C8").unwrap()
}

/// Protocol configuration with original defaults.
pub fn config() -> ProtocolConfig {
    ProtocolConfig::new(
        service_address(),
        AssetId::from_hex("72C0212E67A08BCE").unwrap(),
    )
}

/// The canonical test proposal: 5 units of the asset for 100 currency units.
pub fn proposal() -> EscrowProposal {
    EscrowProposal {
        requester: requester_address(),
        counterparty: counterparty_address(),
        asset: traded_asset(),
        quantity: 5,
        price: 100,
        message: "m".to_string(),
    }
}

/// Mock ledger with both trading accounts registered.
pub fn ledger_with_accounts() -> Arc<MockLedgerGateway> {
    let ledger = Arc::new(MockLedgerGateway::new());
    ledger.add_account(AccountInfo {
        address: requester_address(),
        public_key: PublicKey::from_bytes([1; 32]),
    });
    ledger.add_account(AccountInfo {
        address: counterparty_address(),
        public_key: PublicKey::from_bytes([2; 32]),
    });
    ledger
}

/// Map a bundle the signer saw into the detail the ledger would later report
/// for it, attributing each transfer back to its signing account's address.
pub fn detail_from_bundle(bundle: &EscrowBundle, hash: TxHash, height: u64) -> TransactionDetail {
    let address_of = |key: &PublicKey| -> Address {
        if *key == PublicKey::from_bytes([1; 32]) {
            requester_address()
        } else {
            counterparty_address()
        }
    };
    TransactionDetail {
        hash,
        height,
        transfers: bundle
            .transfers
            .iter()
            .map(|t| TransferView {
                signer: address_of(&t.signer),
                recipient: t.recipient.clone(),
                asset: t.asset,
                amount: t.amount,
                payload: t.payload.clone(),
            })
            .collect(),
        serialized_payload: hash.as_bytes().to_vec(),
    }
}

//! # Concurrency Integration
//!
//! Unrelated flows share nothing mutable: each owns its gateway handles, and
//! running them side by side must not cross their races or their hashes.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use escrow_protocol::{
        EscrowApi, EscrowOrchestrator, MockSignerGateway, TransactionOutcome, SUCCESS_CODE,
    };
    use escrow_types::TxHash;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_independent_flows_run_concurrently() {
        init_tracing();
        let ledger = ledger_with_accounts();

        let signer_a = Arc::new(MockSignerGateway::new());
        let bundle_a = TxHash::from_bytes([0xA1; 32]);
        let lock_a = TxHash::from_bytes([0xA2; 32]);
        signer_a.script_hashes([bundle_a, lock_a]);

        let signer_b = Arc::new(MockSignerGateway::new());
        let bundle_b = TxHash::from_bytes([0xB1; 32]);
        let lock_b = TxHash::from_bytes([0xB2; 32]);
        signer_b.script_hashes([bundle_b, lock_b]);

        for hash in [lock_a, lock_b] {
            ledger.add_confirm_event(hash);
            ledger.set_status(hash, SUCCESS_CODE);
        }
        for hash in [bundle_a, bundle_b] {
            ledger.add_bonded_event(hash);
            ledger.set_status(hash, SUCCESS_CODE);
        }

        let flow_a = EscrowOrchestrator::new(config(), Arc::clone(&ledger), signer_a);
        let flow_b = EscrowOrchestrator::new(config(), Arc::clone(&ledger), signer_b);

        let (outcome_a, outcome_b) = tokio::join!(
            flow_a.create_escrow(proposal()),
            flow_b.create_escrow(proposal()),
        );

        assert_eq!(outcome_a.unwrap(), TransactionOutcome::Success);
        assert_eq!(outcome_b.unwrap(), TransactionOutcome::Success);

        // Each flow announced its own pair, nothing more.
        let mut locks = ledger.announced.lock().clone();
        locks.sort_by_key(|h| *h.as_bytes());
        assert_eq!(locks, vec![lock_a, lock_b]);
        let mut bundles = ledger.announced_bonded.lock().clone();
        bundles.sort_by_key(|h| *h.as_bytes());
        assert_eq!(bundles.len(), 2);

        // Every subscription opened by either race was torn down exactly once.
        use std::sync::atomic::Ordering;
        assert_eq!(
            ledger.subscriptions_opened.load(Ordering::Relaxed),
            ledger.subscriptions_closed.load(Ordering::Relaxed),
        );
    }
}

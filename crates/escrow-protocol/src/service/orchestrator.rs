//! # Escrow Orchestrator
//!
//! Sequences builder → signer → confirmation tracker for the two flows:
//! escrow creation (bundle + collateral lock) and cosignature completion.
//!
//! Both flows are linear state machines with no retry edge: any non-success
//! outcome at any stage resolves the flow and is surfaced to the caller
//! as-is. Signer failure or cancellation resolves `Undetermined` — nothing
//! was announced, so nothing is known to the ledger.
//!
//! ## Pacing
//!
//! Two waits are load-bearing and deliberately explicit:
//! - `signer_spacing` between the bundle and lock signatures, because the
//!   signer device rejects back-to-back requests in one session;
//! - `settle_delay` between lock confirmation and bundle announcement,
//!   because nodes that have not yet seen the lock reject the bundle.

use crate::algorithms::build_bundle;
use crate::domain::{
    CollateralLock, CosignFlowState, CreateFlowState, EscrowError, EscrowProposal, EscrowRecord,
    EscrowTerms, ProtocolConfig, TransactionOutcome, TransactionScope, UnsignedPayload,
};
use crate::ports::inbound::EscrowApi;
use crate::ports::outbound::{LedgerGateway, SignerGateway};
use crate::service::reconstructor::EscrowReconstructor;
use crate::service::tracker::{ConfirmationTracker, Submission, Watch, WatchKind};
use async_trait::async_trait;
use escrow_types::{AccountInfo, Address, TxHash};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Drives the escrow use cases over a ledger gateway and a signer gateway.
///
/// Each flow owns its own subscription handles; callers may run unrelated
/// flows concurrently with no shared mutable state between them.
pub struct EscrowOrchestrator<L, S>
where
    L: LedgerGateway,
    S: SignerGateway,
{
    config: ProtocolConfig,
    ledger: Arc<L>,
    signer: Arc<S>,
    tracker: ConfirmationTracker<L>,
    reconstructor: EscrowReconstructor<L>,
}

impl<L, S> EscrowOrchestrator<L, S>
where
    L: LedgerGateway,
    S: SignerGateway,
{
    /// Wire the orchestrator to its gateways.
    pub fn new(config: ProtocolConfig, ledger: Arc<L>, signer: Arc<S>) -> Self {
        let tracker = ConfirmationTracker::new(Arc::clone(&ledger), config.poll_delay);
        let reconstructor = EscrowReconstructor::new(Arc::clone(&ledger), config.clone());
        Self {
            config,
            ledger,
            signer,
            tracker,
            reconstructor,
        }
    }

    /// Current ledger time in unix milliseconds, read from the latest block
    /// rather than the local wall clock.
    async fn ledger_now_ms(&self) -> Result<u64, EscrowError> {
        let height = self.ledger.chain_height().await?;
        let block = self.ledger.block_by_height(height).await?;
        Ok(block.timestamp_ms + self.config.epoch_adjustment_secs * 1000)
    }

    /// Resolve an account, mapping an unreachable node to `Undetermined`
    /// (surfaced by the caller) while unknown addresses stay hard errors.
    async fn resolve(
        &self,
        address: &Address,
    ) -> Result<Result<AccountInfo, TransactionOutcome>, EscrowError> {
        match self.ledger.resolve_account(address).await {
            Ok(info) => Ok(Ok(info)),
            Err(EscrowError::NodeUnreachable) => Ok(Err(TransactionOutcome::Undetermined)),
            Err(err) => Err(err),
        }
    }

    async fn request_signature(
        &self,
        payload: UnsignedPayload,
    ) -> Result<crate::domain::SignedTransaction, EscrowError> {
        self.signer.set_transaction(payload).await?;
        self.signer.request_signature().await
    }

    fn advance_create(state: &mut CreateFlowState, next: CreateFlowState, flow_id: Uuid) {
        debug_assert!(state.can_transition_to(next));
        debug!(flow_id = %flow_id, from = ?state, to = ?next, "Creation flow transition");
        *state = next;
    }

    fn advance_cosign(state: &mut CosignFlowState, next: CosignFlowState, flow_id: Uuid) {
        debug_assert!(state.can_transition_to(next));
        debug!(flow_id = %flow_id, from = ?state, to = ?next, "Cosign flow transition");
        *state = next;
    }

    async fn run_create(
        &self,
        proposal: EscrowProposal,
    ) -> Result<TransactionOutcome, EscrowError> {
        // Terms validation runs before any ledger or signer interaction.
        proposal.validate()?;
        let flow_id = Uuid::new_v4();
        info!(
            flow_id = %flow_id,
            requester = %proposal.requester,
            counterparty = %proposal.counterparty,
            "Starting escrow creation"
        );

        let now_ms = match self.ledger_now_ms().await {
            Ok(now) => now,
            Err(EscrowError::NodeUnreachable) => return Ok(TransactionOutcome::Undetermined),
            Err(err) => return Err(err),
        };
        let terms = EscrowTerms::from_proposal(proposal, now_ms + self.config.lock_duration_ms())?;

        let requester = match self.resolve(&terms.requester).await? {
            Ok(info) => info,
            Err(outcome) => return Ok(outcome),
        };
        let counterparty = match self.resolve(&terms.counterparty).await? {
            Ok(info) => info,
            Err(outcome) => return Ok(outcome),
        };

        let mut state = CreateFlowState::Built;
        let bundle = build_bundle(&terms, &requester, &counterparty, &self.config);

        Self::advance_create(&mut state, CreateFlowState::SigningBundle, flow_id);
        let signed_bundle = match self.request_signature(UnsignedPayload::Bundle(bundle)).await {
            Ok(tx) => tx,
            Err(err) => {
                warn!(flow_id = %flow_id, error = %err, "Signer declined the bundle");
                Self::advance_create(&mut state, CreateFlowState::Resolved, flow_id);
                return Ok(TransactionOutcome::Undetermined);
            }
        };

        Self::advance_create(&mut state, CreateFlowState::SigningLock, flow_id);
        // The signer device refuses a second request without spacing.
        tokio::time::sleep(self.config.signer_spacing).await;
        let lock = CollateralLock::for_bundle(&signed_bundle, &self.config);
        let signed_lock = match self.request_signature(UnsignedPayload::Lock(lock)).await {
            Ok(tx) => tx,
            Err(err) => {
                warn!(flow_id = %flow_id, error = %err, "Signer declined the lock");
                Self::advance_create(&mut state, CreateFlowState::Resolved, flow_id);
                return Ok(TransactionOutcome::Undetermined);
            }
        };

        Self::advance_create(&mut state, CreateFlowState::ConfirmingLock, flow_id);
        let lock_outcome = self
            .tracker
            .track(
                &terms.requester,
                Submission::Transaction(&signed_lock),
                Watch {
                    hash: signed_lock.hash,
                    kind: WatchKind::Confirmed,
                },
            )
            .await;
        if !lock_outcome.is_success() {
            // The ledger rejects an unlocked bonded bundle; never announce it.
            warn!(flow_id = %flow_id, outcome = %lock_outcome, "Collateral lock did not confirm");
            Self::advance_create(&mut state, CreateFlowState::Resolved, flow_id);
            return Ok(lock_outcome);
        }

        Self::advance_create(&mut state, CreateFlowState::Settling, flow_id);
        // Nodes that have not propagated the lock yet would reject the bundle.
        tokio::time::sleep(self.config.settle_delay).await;

        Self::advance_create(&mut state, CreateFlowState::ConfirmingBundle, flow_id);
        let outcome = self
            .tracker
            .track(
                &terms.requester,
                Submission::BondedBundle(&signed_bundle),
                Watch {
                    hash: signed_bundle.hash,
                    kind: WatchKind::BondedAdded,
                },
            )
            .await;

        Self::advance_create(&mut state, CreateFlowState::Resolved, flow_id);
        info!(flow_id = %flow_id, %outcome, hash = %signed_bundle.hash, "Escrow creation resolved");
        Ok(outcome)
    }

    async fn run_cosign(
        &self,
        party: &Address,
        bundle_hash: &TxHash,
    ) -> Result<TransactionOutcome, EscrowError> {
        let flow_id = Uuid::new_v4();
        info!(flow_id = %flow_id, party = %party, hash = %bundle_hash, "Starting cosignature flow");

        if let Err(outcome) = self.resolve(party).await? {
            return Ok(outcome);
        }
        let detail = match self
            .ledger
            .get_transaction(bundle_hash, TransactionScope::Pending)
            .await
        {
            Ok(detail) => detail,
            Err(EscrowError::NodeUnreachable) => return Ok(TransactionOutcome::Undetermined),
            Err(err) => return Err(err),
        };

        let mut state = CosignFlowState::Located;
        let cosignature = {
            let staged = self
                .signer
                .set_cosignature_source(detail.serialized_payload)
                .await;
            match staged {
                Ok(()) => self.signer.request_cosignature().await,
                Err(err) => Err(err),
            }
        };
        let cosignature = match cosignature {
            Ok(cosig) => cosig,
            Err(err) => {
                warn!(flow_id = %flow_id, error = %err, "Signer declined the cosignature");
                Self::advance_cosign(&mut state, CosignFlowState::Resolved, flow_id);
                return Ok(TransactionOutcome::Undetermined);
            }
        };

        Self::advance_cosign(&mut state, CosignFlowState::Cosigned, flow_id);
        Self::advance_cosign(&mut state, CosignFlowState::Confirming, flow_id);
        // Finality shows up on the parent bundle, not on the cosignature.
        let outcome = self
            .tracker
            .track(
                party,
                Submission::Cosignature(&cosignature),
                Watch {
                    hash: cosignature.parent_hash,
                    kind: WatchKind::Confirmed,
                },
            )
            .await;

        Self::advance_cosign(&mut state, CosignFlowState::Resolved, flow_id);
        info!(flow_id = %flow_id, %outcome, "Cosignature flow resolved");
        Ok(outcome)
    }
}

#[async_trait]
impl<L, S> EscrowApi for EscrowOrchestrator<L, S>
where
    L: LedgerGateway,
    S: SignerGateway,
{
    async fn create_escrow(
        &self,
        proposal: EscrowProposal,
    ) -> Result<TransactionOutcome, EscrowError> {
        self.run_create(proposal).await
    }

    async fn cosign_escrow(
        &self,
        party: &Address,
        bundle_hash: &TxHash,
    ) -> Result<TransactionOutcome, EscrowError> {
        self.run_cosign(party, bundle_hash).await
    }

    async fn search_escrows(
        &self,
        party: &Address,
        scope: TransactionScope,
    ) -> Result<Vec<EscrowRecord>, EscrowError> {
        self.reconstructor.search(party, scope).await
    }
}

//! # Flow State Machines
//!
//! Linear state machines for the two orchestrated flows. There is no retry
//! edge anywhere: any non-success outcome at any stage jumps straight to
//! `Resolved` and is surfaced to the caller as-is.

use serde::{Deserialize, Serialize};

/// States of the escrow-creation flow.
///
/// The happy path is strictly linear; every state may also jump to
/// `Resolved` on failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateFlowState {
    /// Bundle assembled, nothing signed yet.
    #[default]
    Built,
    /// Bundle handed to the signer device.
    SigningBundle,
    /// Lock handed to the signer device (after the mandated spacing).
    SigningLock,
    /// Lock announced; confirmation race running.
    ConfirmingLock,
    /// Lock confirmed; waiting out node propagation before announcing the
    /// bundle.
    Settling,
    /// Bundle announced; waiting for it to enter the partial pool.
    ConfirmingBundle,
    /// Terminal. Carries no payload here; the orchestrator returns the
    /// outcome value itself.
    Resolved,
}

impl CreateFlowState {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, next: CreateFlowState) -> bool {
        // Failure from any live state resolves the flow
        if next == Self::Resolved {
            return *self != Self::Resolved;
        }
        matches!(
            (self, next),
            (Self::Built, Self::SigningBundle)
                | (Self::SigningBundle, Self::SigningLock)
                | (Self::SigningLock, Self::ConfirmingLock)
                | (Self::ConfirmingLock, Self::Settling)
                | (Self::Settling, Self::ConfirmingBundle)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// States of the cosignature-completion flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CosignFlowState {
    /// Pending bundle fetched by hash from the partial pool.
    #[default]
    Located,
    /// Cosignature obtained from the signer device.
    Cosigned,
    /// Cosignature announced; watching the parent bundle's confirmation.
    Confirming,
    /// Terminal.
    Resolved,
}

impl CosignFlowState {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, next: CosignFlowState) -> bool {
        if next == Self::Resolved {
            return *self != Self::Resolved;
        }
        matches!(
            (self, next),
            (Self::Located, Self::Cosigned) | (Self::Cosigned, Self::Confirming)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

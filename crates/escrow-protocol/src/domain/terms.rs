//! # Escrow Terms
//!
//! Caller-owned swap terms, validated before any ledger interaction.

use super::errors::EscrowError;
use escrow_types::{Address, AssetId};
use serde::{Deserialize, Serialize};

/// Upper bound on the free-text message, in bytes (the ledger's transfer
/// payload limit).
pub const MAX_MESSAGE_LEN: usize = 1023;

/// What the caller proposes: who swaps what for how much.
///
/// Carries no expiration — that is derived from the ledger's own clock when
/// the flow starts, not from the caller's wall clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowProposal {
    /// Party initiating the escrow and paying the price.
    pub requester: Address,
    /// Party delivering the asset.
    pub counterparty: Address,
    /// Asset being traded.
    pub asset: AssetId,
    /// Asset quantity, in the asset's own units.
    pub quantity: u64,
    /// Price in settlement-currency major units.
    pub price: u64,
    /// Free-text message shown to the counterparty.
    pub message: String,
}

impl EscrowProposal {
    /// Validate the proposal. Runs before the builder and before any ledger
    /// or signer call.
    pub fn validate(&self) -> Result<(), EscrowError> {
        if self.quantity == 0 {
            return Err(EscrowError::InvalidTerms(
                "asset quantity must be positive".to_string(),
            ));
        }
        if self.price == 0 {
            return Err(EscrowError::InvalidTerms(
                "price must be positive".to_string(),
            ));
        }
        if self.message.len() > MAX_MESSAGE_LEN {
            return Err(EscrowError::InvalidTerms(format!(
                "message exceeds {} bytes",
                MAX_MESSAGE_LEN
            )));
        }
        if self.requester == self.counterparty {
            return Err(EscrowError::InvalidTerms(
                "requester and counterparty must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validated terms, immutable once submitted: the proposal plus the
/// expiration instant derived from the ledger clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowTerms {
    /// Party initiating the escrow and paying the price.
    pub requester: Address,
    /// Party delivering the asset.
    pub counterparty: Address,
    /// Asset being traded.
    pub asset: AssetId,
    /// Asset quantity, in the asset's own units.
    pub quantity: u64,
    /// Price in settlement-currency major units.
    pub price: u64,
    /// Free-text message shown to the counterparty.
    pub message: String,
    /// Expiration instant (unix milliseconds): ledger time at creation plus
    /// the collateral lock duration.
    pub expires_at_ms: u64,
}

impl EscrowTerms {
    /// Validate a proposal and stamp it with its expiration instant.
    pub fn from_proposal(
        proposal: EscrowProposal,
        expires_at_ms: u64,
    ) -> Result<Self, EscrowError> {
        proposal.validate()?;
        Ok(Self {
            requester: proposal.requester,
            counterparty: proposal.counterparty,
            asset: proposal.asset,
            quantity: proposal.quantity,
            price: proposal.price,
            message: proposal.message,
            expires_at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> EscrowProposal {
        EscrowProposal {
            requester: Address::parse("TAREQQLXXWUUXGEARF5DGRZWVGVGJGRSMJWFEPA").unwrap(),
            counterparty: Address::parse("TBCNTRQLXXWUUXGEARF5DGRZWVGVGJGRSMJWFEP").unwrap(),
            asset: AssetId::from_hex("3A8416DB2D53B6C8").unwrap(),
            quantity: 5,
            price: 100,
            message: "m".to_string(),
        }
    }

    #[test]
    fn test_valid_proposal_passes() {
        assert!(proposal().validate().is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut p = proposal();
        p.quantity = 0;
        assert!(matches!(p.validate(), Err(EscrowError::InvalidTerms(_))));
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut p = proposal();
        p.price = 0;
        assert!(matches!(p.validate(), Err(EscrowError::InvalidTerms(_))));
    }

    #[test]
    fn test_oversized_message_rejected() {
        let mut p = proposal();
        p.message = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_self_trade_rejected() {
        let mut p = proposal();
        p.counterparty = p.requester.clone();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_terms_carry_expiration() {
        let terms = EscrowTerms::from_proposal(proposal(), 123_456).unwrap();
        assert_eq!(terms.expires_at_ms, 123_456);
    }

    #[test]
    fn test_terms_reject_invalid_proposal() {
        let mut p = proposal();
        p.price = 0;
        assert!(EscrowTerms::from_proposal(p, 123_456).is_err());
    }
}

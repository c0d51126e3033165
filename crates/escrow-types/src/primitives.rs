//! # Ledger Primitives
//!
//! Textual address, transaction content hash, asset identifier, and account
//! descriptor types. All constructors parse and reject malformed input; a
//! value that exists is well-formed.

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the ledger's fixed-length textual address form.
pub const ADDRESS_LEN: usize = 39;

/// Minor units per major unit of the settlement currency.
pub const MINOR_UNITS_PER_MAJOR: u64 = 1_000_000;

/// A ledger account address in its fixed-length textual (base32) form.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse an address from its raw textual form.
    ///
    /// Accepts exactly [`ADDRESS_LEN`] characters of the base32 alphabet
    /// (`A-Z`, `2-7`). Hyphen-grouped display forms are normalized first.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let normalized: String = raw.chars().filter(|c| *c != '-').collect();
        if normalized.len() != ADDRESS_LEN {
            return Err(ParseError::InvalidAddress(raw.to_string()));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c))
        {
            return Err(ParseError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// The plain textual form (no hyphen grouping).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

/// A 32-byte transaction content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash([u8; 32]);

impl TxHash {
    /// Wrap raw hash bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from the 64-character hex form used on the wire.
    pub fn from_hex(raw: &str) -> Result<Self, ParseError> {
        let bytes = hex::decode(raw).map_err(|_| ParseError::InvalidHash(raw.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ParseError::InvalidHash(raw.to_string()))?;
        Ok(Self(bytes))
    }

    /// The raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Uppercase hex form as announced to the ledger.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.to_hex())
    }
}

/// A ledger asset identifier (64-bit, rendered as 16 hex characters).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(u64);

impl AssetId {
    /// Wrap a raw 64-bit asset identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse from the 16-character hex form.
    pub fn from_hex(raw: &str) -> Result<Self, ParseError> {
        if raw.len() != 16 {
            return Err(ParseError::InvalidAssetId(raw.to_string()));
        }
        u64::from_str_radix(raw, 16)
            .map(Self)
            .map_err(|_| ParseError::InvalidAssetId(raw.to_string()))
    }

    /// Uppercase hex form as used on the wire.
    pub fn to_hex(&self) -> String {
        format!("{:016X}", self.0)
    }

    /// The raw 64-bit identifier.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", self.to_hex())
    }
}

/// A 32-byte account public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from the 64-character hex form.
    pub fn from_hex(raw: &str) -> Result<Self, ParseError> {
        let bytes = hex::decode(raw).map_err(|_| ParseError::InvalidPublicKey(raw.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ParseError::InvalidPublicKey(raw.to_string()))?;
        Ok(Self(bytes))
    }

    /// Uppercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// A resolved ledger account: the canonical address plus the public key the
/// ledger has on file for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Canonical address.
    pub address: Address,
    /// Account public key.
    pub public_key: PublicKey,
}

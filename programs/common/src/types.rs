//! Identities and asset roles

use core::fmt;
use core::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 32-byte account identity, rendered as base58
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub [u8; 32]);

/// Assets are addressed by the same identity space as accounts
pub type AssetId = Identity;

static NEXT_UNIQUE: AtomicU64 = AtomicU64::new(1);

impl Identity {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Process-unique identity for tests and fixtures
    pub fn new_unique() -> Self {
        let n = NEXT_UNIQUE.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 32];
        bytes[0] = 0xff;
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Deterministic identity derived from a human-readable label
    ///
    /// The label bytes are copied left-aligned; labels longer than 32 bytes
    /// are folded in with xor so distinct long labels still rarely collide.
    pub fn from_label(label: &str) -> Self {
        let mut bytes = [0u8; 32];
        for (i, b) in label.bytes().enumerate() {
            bytes[i % 32] ^= b;
        }
        Self(bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdentityError {
    #[error("invalid base58: {0}")]
    Encoding(String),
    #[error("expected 32 bytes, got {0}")]
    Length(usize),
}

impl FromStr for Identity {
    type Err = ParseIdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| ParseIdentityError::Encoding(e.to_string()))?;
        let bytes: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| ParseIdentityError::Length(decoded.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Role an asset plays in an option instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    /// Locked in vaults, paid out on exercise
    Collateral,
    /// Paid in by holders on exercise
    Underlying,
    /// Denominates the strike price
    Strike,
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetRole::Collateral => "collateral",
            AssetRole::Underlying => "underlying",
            AssetRole::Strike => "strike",
        };
        f.write_str(s)
    }
}

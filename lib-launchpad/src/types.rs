//! Launchpad Primitive Types
//!
//! Fixed-size identifiers and amount aliases shared by every module.
//!
//! # Units
//! - `Wei`: native currency atomic units (base currency)
//! - `Amount`: token base units (18 decimals)
//! - curve units are plain `u64` counts of whole tokens

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Native currency amount in atomic units
pub type Wei = u128;

/// Token amount in base units (curve units × `WAD`)
pub type Amount = u128;

/// Block height
pub type BlockHeight = u64;

/// 32-byte account or contract address
///
/// Serialized as a hex string in human-readable formats (TOML, JSON) and as
/// raw bytes otherwise (bincode, sled).
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The zero address
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Deterministic address derived from a domain tag and seed bytes
    pub fn derive(domain: &[u8], seed: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(seed);
        Self(*hasher.finalize().as_bytes())
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse from a 64-character hex string (optional `0x` prefix)
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            struct HexVisitor;

            impl<'de> Visitor<'de> for HexVisitor {
                type Value = Address;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a 32-byte hex string")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Address, E> {
                    Address::from_hex(v).map_err(E::custom)
                }
            }

            deserializer.deserialize_str(HexVisitor)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Address)
        }
    }
}

/// AMM pool identifier assigned by the liquidity venue
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PoolId(pub [u8; 32]);

impl PoolId {
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolId({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Liquidity seeding lifecycle of a single token
///
/// ```text
///   ┌────────────┐  supply >= LP cap  ┌─────────┐  position minted  ┌────────┐
///   │ NotSeeded  │ ─────────────────▶ │ Seeding │ ────────────────▶ │ Seeded │
///   └────────────┘                    └─────────┘                   └────────┘
/// ```
///
/// `Seeding` only exists inside the buy that crossed the cap; a failed
/// seeding rolls the whole buy back to `NotSeeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedingState {
    /// Curve trading is live; funds accumulate in the ledger
    NotSeeded,
    /// Funds taken out of the curve, position not yet recorded
    Seeding,
    /// Funds migrated into an AMM position; curve retired
    Seeded,
}

impl SeedingState {
    /// Check if the curve accepts buys and sells
    pub fn can_trade_curve(&self) -> bool {
        matches!(self, SeedingState::NotSeeded)
    }

    /// Check if residual escrow may be withdrawn
    pub fn is_seeded(&self) -> bool {
        matches!(self, SeedingState::Seeded)
    }
}

impl fmt::Display for SeedingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedingState::NotSeeded => write!(f, "not_seeded"),
            SeedingState::Seeding => write!(f, "seeding"),
            SeedingState::Seeded => write!(f, "seeded"),
        }
    }
}

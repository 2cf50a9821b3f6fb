//! Launchpad Configuration
//!
//! Loaded from TOML; every field has a default so partial files merge onto
//! the stock parameters.
//!
//! ```toml
//! owner = "0x0101…01"
//! fee_collector = "0x0202…02"
//! lp_collector = "0x0303…03"
//! creation_fee_wei = 10000000000000000
//! pool_fee_tier = 10000
//!
//! # fees above 2^63 wei (about 9.2 native) must be written as a string:
//! # creation_fee_wei = "25000000000000000000"
//!
//! [curve]
//! initial_price_wei = 1000000000000
//! price_step_wei = 10000000
//! lp_cap = 1000000
//!
//! [fees]
//! buy_tax_bps = 100
//! sell_tax_bps = 100
//! platform_tax_bps = 50
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::pricing::{CurveParams, FeeSchedule};
use crate::types::{Address, Wei};

/// Default creation fee (0.01 native)
pub const DEFAULT_CREATION_FEE_WEI: Wei = 10_000_000_000_000_000;

/// Default AMM fee tier (1%, in hundredths of a basis point)
pub const DEFAULT_POOL_FEE_TIER: u32 = 10_000;

/// Launchpad deployment parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    pub owner: Address,
    pub fee_collector: Address,
    pub lp_collector: Address,
    #[serde(with = "wei_amount")]
    pub creation_fee_wei: Wei,
    pub pool_fee_tier: u32,
    pub curve: CurveParams,
    pub fees: FeeSchedule,
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            owner: Address::zero(),
            fee_collector: Address::zero(),
            lp_collector: Address::zero(),
            creation_fee_wei: DEFAULT_CREATION_FEE_WEI,
            pool_fee_tier: DEFAULT_POOL_FEE_TIER,
            curve: CurveParams::default(),
            fees: FeeSchedule::default(),
        }
    }
}

impl LaunchpadConfig {
    /// Stock parameters with the given accounts
    pub fn new(owner: Address, fee_collector: Address, lp_collector: Address) -> Self {
        Self {
            owner,
            fee_collector,
            lp_collector,
            ..Self::default()
        }
    }

    pub fn creation_fee(&self) -> Wei {
        self.creation_fee_wei
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading launchpad configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        debug!(
            "  creation_fee_wei = {}, lp_cap = {}",
            config.creation_fee_wei, config.curve.lp_cap
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() {
            return Err(ConfigError::Invalid("owner must be set".to_string()));
        }
        if self.fee_collector.is_zero() {
            return Err(ConfigError::Invalid("fee_collector must be set".to_string()));
        }
        if self.lp_collector.is_zero() {
            return Err(ConfigError::Invalid("lp_collector must be set".to_string()));
        }
        self.curve
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.fees
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

/// Wei amounts as TOML integers or decimal strings
///
/// TOML integers stop at `i64::MAX`, so larger fees need the string form.
/// Always serialized as a string.
mod wei_amount {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use crate::types::Wei;

    pub fn serialize<S: Serializer>(value: &Wei, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Wei, D::Error> {
        struct WeiVisitor;

        impl<'de> Visitor<'de> for WeiVisitor {
            type Value = Wei;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer or decimal string of wei")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Wei, E> {
                Ok(v as Wei)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Wei, E> {
                u64::try_from(v)
                    .map(|v| v as Wei)
                    .map_err(|_| E::custom(format!("negative wei amount {}", v)))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<Wei, E> {
                Ok(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Wei, E> {
                v.trim()
                    .parse::<Wei>()
                    .map_err(|e| E::custom(format!("invalid wei amount {:?}: {}", v, e)))
            }
        }

        deserializer.deserialize_any(WeiVisitor)
    }
}

//! # Pool Configuration
//!
//! Typed configuration for bootstrapping concentrated-liquidity pools:
//! price range, LP fee rate, protocol fee share and verification class.
//! Values arrive from TOML (deployment config) or are constructed in
//! code; either way [`PoolConfig::validate`] enforces the protocol-level
//! caps before a pool can be created from them.
//!
//! All rates and prices are fixed-point integers scaled by
//! [`clamm_math::SCALE`].

use clamm_math::SCALE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Hard cap on the protocol's share of collected LP fees: 50%.
pub const MAX_PROTOCOL_FEE_SHARE: u128 = SCALE / 2;

/// Hard cap on the LP fee rate itself: 10% of swap input.
pub const MAX_LP_FEE_RATE: u128 = SCALE / 10;

/// Asset identifier on the external ledger; id 0 is the native asset.
pub const NATIVE_ASSET_ID: u64 = 0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse pool configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("price bounds must be positive, got price_min = {0}")]
    NonPositivePrice(u128),

    #[error("price_min {price_min} exceeds price_max {price_max}")]
    InvertedPriceRange { price_min: u128, price_max: u128 },

    #[error("lp fee rate {0} exceeds the {MAX_LP_FEE_RATE} cap")]
    LpFeeRateTooHigh(u128),

    #[error("protocol fee share {0} exceeds the {MAX_PROTOCOL_FEE_SHARE} cap")]
    ProtocolFeeShareTooHigh(u128),

    #[error("pool assets must differ, both sides are asset {0}")]
    DuplicateAssets(u64),
}

/// Static configuration a pool is bootstrapped from.
///
/// `price_min`/`price_max` bound the active liquidity range;
/// `lp_fee_rate` is the fraction of swap input retained as fee;
/// `protocol_fee_share` is the fraction of that fee accruing to the
/// protocol rather than to liquidity providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub asset_a_id: u64,
    pub asset_b_id: u64,
    pub price_min: u128,
    pub price_max: u128,
    pub lp_fee_rate: u128,
    pub protocol_fee_share: u128,
    pub verification_class: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            asset_a_id: NATIVE_ASSET_ID,
            asset_b_id: 1,
            price_min: SCALE,
            price_max: 2 * SCALE,
            lp_fee_rate: 3_000_000,          // 0.3%
            protocol_fee_share: 100_000_000, // 10% of collected fees
            verification_class: 0,
        }
    }
}

impl PoolConfig {
    /// Parse a configuration from TOML and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: PoolConfig = toml::from_str(raw)?;
        config.validate()?;
        debug!(
            asset_a = config.asset_a_id,
            asset_b = config.asset_b_id,
            price_min = config.price_min,
            price_max = config.price_max,
            "loaded pool configuration"
        );
        Ok(config)
    }

    /// Enforce protocol-level caps and range ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_min == 0 {
            return Err(ConfigError::NonPositivePrice(self.price_min));
        }
        if self.price_min > self.price_max {
            return Err(ConfigError::InvertedPriceRange {
                price_min: self.price_min,
                price_max: self.price_max,
            });
        }
        if self.lp_fee_rate > MAX_LP_FEE_RATE {
            return Err(ConfigError::LpFeeRateTooHigh(self.lp_fee_rate));
        }
        if self.protocol_fee_share > MAX_PROTOCOL_FEE_SHARE {
            return Err(ConfigError::ProtocolFeeShareTooHigh(self.protocol_fee_share));
        }
        if self.asset_a_id == self.asset_b_id {
            return Err(ConfigError::DuplicateAssets(self.asset_a_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PoolConfig::default().validate().unwrap();
    }

    #[test]
    fn parses_toml() {
        let config = PoolConfig::from_toml_str(
            r#"
            asset_a_id = 0
            asset_b_id = 31566704
            price_min = 1000000000
            price_max = 1562500000
            lp_fee_rate = 3000000
            protocol_fee_share = 200000000
            verification_class = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.asset_b_id, 31_566_704);
        assert_eq!(config.price_max, 1_562_500_000);
        assert_eq!(config.verification_class, 1);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = PoolConfig::from_toml_str(
            r#"
            asset_b_id = 7
            price_min = 1000000000
            price_max = 4000000000
            "#,
        )
        .unwrap();
        assert_eq!(config.lp_fee_rate, 3_000_000);
        assert_eq!(config.asset_a_id, NATIVE_ASSET_ID);
    }

    #[test]
    fn rejects_inverted_range() {
        let config = PoolConfig {
            price_min: 2 * SCALE,
            price_max: SCALE,
            ..PoolConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedPriceRange { .. })
        ));
    }

    #[test]
    fn rejects_protocol_share_above_half() {
        let config = PoolConfig {
            protocol_fee_share: MAX_PROTOCOL_FEE_SHARE + 1,
            ..PoolConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProtocolFeeShareTooHigh(_))
        ));
    }

    #[test]
    fn rejects_zero_price_min() {
        let config = PoolConfig {
            price_min: 0,
            ..PoolConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositivePrice(0))
        ));
    }

    #[test]
    fn rejects_duplicate_assets() {
        let config = PoolConfig {
            asset_a_id: 5,
            asset_b_id: 5,
            ..PoolConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateAssets(5))
        ));
    }
}

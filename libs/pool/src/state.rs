//! Pool state record and diagnostic snapshot

use clamm_config::{PoolConfig, NATIVE_ASSET_ID};
use clamm_math::{scaled_mul, sqrt_scaled};
use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::pricing;

/// Which of the two pool assets an amount refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetSide {
    A,
    B,
}

/// Complete accounting state of one pool.
///
/// All numeric fields are fixed-point integers scaled by
/// [`clamm_math::SCALE`]. Balances record what the engine has accounted
/// for; they must never exceed the holdings the ledger actually reports
/// (enforced by [`crate::guard::check_balances`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub asset_a_id: u64,
    pub asset_b_id: u64,

    /// Recorded balance of asset A committed to the pool.
    pub asset_a_balance: u128,
    /// Recorded balance of asset B committed to the pool.
    pub asset_b_balance: u128,

    /// Lower sqrt-price bound of the active range.
    pub sqrt_price_min: u128,
    /// Upper sqrt-price bound of the active range.
    pub sqrt_price_max: u128,

    /// Total virtual liquidity, principal plus all accrued fee liquidity.
    pub liquidity_total: u128,
    /// Fee liquidity accrued to liquidity providers.
    pub liquidity_users_from_fees: u128,
    /// Fee liquidity accrued to the protocol.
    pub liquidity_protocol_from_fees: u128,

    /// Outstanding LP token supply.
    pub lp_token_supply: u128,

    /// Fraction of swap input retained as fee.
    pub lp_fee_rate: u128,
    /// Fraction of the collected fee accruing to the protocol.
    pub protocol_fee_share: u128,

    pub verification_class: u8,
}

/// Full diagnostic snapshot for the `status` interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub asset_a_id: u64,
    pub asset_b_id: u64,
    pub asset_a_balance: u128,
    pub asset_b_balance: u128,
    pub price: u128,
    pub price_min: u128,
    pub price_max: u128,
    pub sqrt_price_min: u128,
    pub sqrt_price_max: u128,
    pub liquidity_total: u128,
    pub liquidity_users_from_fees: u128,
    pub liquidity_protocol_from_fees: u128,
    pub lp_token_supply: u128,
    pub lp_fee_rate: u128,
    pub protocol_fee_share: u128,
    pub verification_class: u8,
}

impl PoolState {
    /// Create a fresh pool from validated configuration: price bounds
    /// converted to the sqrt domain, zero balances and liquidity.
    pub fn bootstrap(config: &PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self {
            asset_a_id: config.asset_a_id,
            asset_b_id: config.asset_b_id,
            asset_a_balance: 0,
            asset_b_balance: 0,
            sqrt_price_min: sqrt_scaled(config.price_min)?,
            sqrt_price_max: sqrt_scaled(config.price_max)?,
            liquidity_total: 0,
            liquidity_users_from_fees: 0,
            liquidity_protocol_from_fees: 0,
            lp_token_supply: 0,
            lp_fee_rate: config.lp_fee_rate,
            protocol_fee_share: config.protocol_fee_share,
            verification_class: config.verification_class,
        })
    }

    /// Resolve a ledger asset id to a pool side.
    pub fn side_for_asset(&self, asset_id: u64) -> Result<AssetSide, PoolError> {
        if asset_id == self.asset_a_id {
            Ok(AssetSide::A)
        } else if asset_id == self.asset_b_id {
            Ok(AssetSide::B)
        } else {
            Err(PoolError::InvalidAsset(asset_id))
        }
    }

    pub fn asset_is_native(&self, side: AssetSide) -> bool {
        match side {
            AssetSide::A => self.asset_a_id == NATIVE_ASSET_ID,
            AssetSide::B => self.asset_b_id == NATIVE_ASSET_ID,
        }
    }

    pub fn balance(&self, side: AssetSide) -> u128 {
        match side {
            AssetSide::A => self.asset_a_balance,
            AssetSide::B => self.asset_b_balance,
        }
    }

    /// Current pool price; the lower bound for an empty pool.
    pub fn price(&self) -> Result<u128, PoolError> {
        pricing::price_from_reserves(
            self.asset_a_balance,
            self.asset_b_balance,
            self.liquidity_total,
            self.sqrt_price_min,
            self.sqrt_price_max,
        )
    }

    /// Full diagnostic snapshot.
    pub fn status(&self) -> Result<PoolStatus, PoolError> {
        Ok(PoolStatus {
            asset_a_id: self.asset_a_id,
            asset_b_id: self.asset_b_id,
            asset_a_balance: self.asset_a_balance,
            asset_b_balance: self.asset_b_balance,
            price: self.price()?,
            price_min: scaled_mul(self.sqrt_price_min, self.sqrt_price_min)?,
            price_max: scaled_mul(self.sqrt_price_max, self.sqrt_price_max)?,
            sqrt_price_min: self.sqrt_price_min,
            sqrt_price_max: self.sqrt_price_max,
            liquidity_total: self.liquidity_total,
            liquidity_users_from_fees: self.liquidity_users_from_fees,
            liquidity_protocol_from_fees: self.liquidity_protocol_from_fees,
            lp_token_supply: self.lp_token_supply,
            lp_fee_rate: self.lp_fee_rate,
            protocol_fee_share: self.protocol_fee_share,
            verification_class: self.verification_class,
        })
    }

    /// Structural invariants every committed state must satisfy.
    ///
    /// Fee liquidity never exceeds the total; the range is ordered; a
    /// pool with no LP tokens outstanding holds no principal liquidity
    /// (only fee liquidity awaiting withdrawal may remain).
    pub fn check_invariants(&self) -> Result<(), PoolError> {
        let fee_liquidity = self
            .liquidity_users_from_fees
            .checked_add(self.liquidity_protocol_from_fees)
            .ok_or(clamm_math::MathError::Overflow)?;
        if self.liquidity_total < fee_liquidity {
            return Err(PoolError::InvariantViolated(
                "fee liquidity exceeds total liquidity",
            ));
        }
        if self.sqrt_price_min > self.sqrt_price_max {
            return Err(PoolError::InvariantViolated(
                "sqrt price bounds out of order",
            ));
        }
        if self.lp_token_supply == 0 && self.liquidity_total != fee_liquidity {
            return Err(PoolError::InvariantViolated(
                "principal liquidity without outstanding lp tokens",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clamm_math::SCALE;

    fn test_config() -> PoolConfig {
        PoolConfig {
            asset_a_id: 0,
            asset_b_id: 42,
            price_min: SCALE,               // 1.0
            price_max: 1_562_500_000,       // 1.5625
            lp_fee_rate: 0,
            protocol_fee_share: 0,
            verification_class: 0,
        }
    }

    #[test]
    fn bootstrap_computes_sqrt_bounds() {
        let state = PoolState::bootstrap(&test_config()).unwrap();
        assert_eq!(state.sqrt_price_min, SCALE);
        assert_eq!(state.sqrt_price_max, 1_250_000_000);
        assert_eq!(state.liquidity_total, 0);
        assert_eq!(state.lp_token_supply, 0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn bootstrap_rejects_invalid_config() {
        let config = PoolConfig {
            price_min: 2 * SCALE,
            price_max: SCALE,
            ..test_config()
        };
        assert!(PoolState::bootstrap(&config).is_err());
    }

    #[test]
    fn side_resolution() {
        let state = PoolState::bootstrap(&test_config()).unwrap();
        assert_eq!(state.side_for_asset(0).unwrap(), AssetSide::A);
        assert_eq!(state.side_for_asset(42).unwrap(), AssetSide::B);
        assert!(matches!(
            state.side_for_asset(7),
            Err(PoolError::InvalidAsset(7))
        ));
        assert!(state.asset_is_native(AssetSide::A));
        assert!(!state.asset_is_native(AssetSide::B));
    }

    #[test]
    fn empty_pool_reports_lower_bound_price() {
        let state = PoolState::bootstrap(&test_config()).unwrap();
        assert_eq!(state.price().unwrap(), SCALE);
    }

    #[test]
    fn status_serializes() {
        let state = PoolState::bootstrap(&test_config()).unwrap();
        let status = state.status().unwrap();
        assert_eq!(status.price_min, SCALE);
        assert_eq!(status.price_max, 1_562_500_000);
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"price_max\":1562500000"));
    }
}

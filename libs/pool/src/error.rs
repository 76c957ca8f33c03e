//! Pool operation error taxonomy
//!
//! Input-validation errors reject before any state read, guard
//! violations before mutation, slippage after computation but before
//! commit. Every failure leaves the caller's `PoolState` untouched.

use clamm_config::ConfigError;
use clamm_math::MathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("amount must be positive")]
    ZeroAmount,

    #[error("asset {0} is not part of this pool")]
    InvalidAsset(u64),

    #[error("output {amount_out} below required minimum {minimum}")]
    InsufficientOutput { amount_out: u128, minimum: u128 },

    #[error("E_A_B: recorded asset A balance {recorded} exceeds actual holdings {actual}")]
    BalanceGuardAssetA { recorded: u128, actual: u128 },

    #[error("E_B_B: recorded asset B balance {recorded} exceeds actual holdings {actual}")]
    BalanceGuardAssetB { recorded: u128, actual: u128 },

    #[error("E_A0_B: recorded native balance on side A {recorded} exceeds actual holdings {actual}")]
    BalanceGuardNativeA { recorded: u128, actual: u128 },

    #[error("E_B0_B: recorded native balance on side B {recorded} exceeds actual holdings {actual}")]
    BalanceGuardNativeB { recorded: u128, actual: u128 },

    #[error("lp token amount {requested} exceeds outstanding supply {supply}")]
    InsufficientLpTokens { requested: u128, supply: u128 },

    #[error("requested {requested} exceeds accrued protocol fee liquidity {available}")]
    InsufficientProtocolFees { requested: u128, available: u128 },

    #[error("pool holds no liquidity")]
    EmptyPool,

    #[error("state invariant violated: {0}")]
    InvariantViolated(&'static str),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

//! Balance invariant guard
//!
//! Recorded balances must never exceed what the ledger actually holds.
//! The guard runs as a precondition before every balance-affecting
//! commit and rejects with a side-specific error; it never repairs the
//! recorded state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PoolError;
use crate::state::{AssetSide, PoolState};

/// Actual asset holdings as reported by the external ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualHoldings {
    pub asset_a: u128,
    pub asset_b: u128,
}

impl ActualHoldings {
    pub fn balance(&self, side: AssetSide) -> u128 {
        match side {
            AssetSide::A => self.asset_a,
            AssetSide::B => self.asset_b,
        }
    }
}

/// Verify recorded balances against actual holdings on both sides.
pub fn check_balances(state: &PoolState, holdings: &ActualHoldings) -> Result<(), PoolError> {
    for side in [AssetSide::A, AssetSide::B] {
        check_side(state, side, state.balance(side), holdings.balance(side))?;
    }
    Ok(())
}

/// Verify a single side against a prospective recorded balance. Used by
/// operations that grow a recorded balance (excess distribution) to
/// check the successor value before committing it.
pub fn check_side(
    state: &PoolState,
    side: AssetSide,
    recorded: u128,
    actual: u128,
) -> Result<(), PoolError> {
    if recorded <= actual {
        return Ok(());
    }
    warn!(?side, recorded, actual, "balance guard rejected operation");
    let native = state.asset_is_native(side);
    Err(match (side, native) {
        (AssetSide::A, false) => PoolError::BalanceGuardAssetA { recorded, actual },
        (AssetSide::B, false) => PoolError::BalanceGuardAssetB { recorded, actual },
        (AssetSide::A, true) => PoolError::BalanceGuardNativeA { recorded, actual },
        (AssetSide::B, true) => PoolError::BalanceGuardNativeB { recorded, actual },
    })
}

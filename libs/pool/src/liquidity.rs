//! Liquidity lifecycle and fee distribution
//!
//! Add/remove share accounting, the protocol's admin fee withdrawal and
//! folding externally deposited excess assets into LP value. Every
//! operation is a pure function returning a successor state; the
//! balance guard runs before any successor is produced.

use clamm_math::{mul_div, quadratic_positive_root, MathError};
use tracing::debug;

use crate::error::PoolError;
use crate::guard::{check_balances, check_side, ActualHoldings};
use crate::pricing;
use crate::state::{AssetSide, PoolState};

/// Sentinel amount: distribute all available excess on that side.
pub const DISTRIBUTE_ALL: u128 = u128::MAX;

/// Deposit liquidity and mint LP tokens.
///
/// The first deposit into an empty pool is priced by the reserve
/// quadratic, recorded in full and mints LP tokens one-to-one with the
/// liquidity value. Follow-up deposits mint proportionally; with both
/// assets deposited the smaller asset-implied liquidity delta governs
/// the mint, which is what allows single-sided deposits when the price
/// sits at a range boundary. Only the curve-consistent amounts implied
/// by the governing delta are recorded; anything deposited beyond them
/// stays as undistributed excess (actual minus recorded) that
/// [`distribute_excess_assets`] can later fold into LP value. Recording
/// the surplus directly would park it above the curve where the next
/// swap would pay it out.
pub fn add_liquidity(
    state: &PoolState,
    holdings: &ActualHoldings,
    deposit_a: u128,
    deposit_b: u128,
) -> Result<(PoolState, u128), PoolError> {
    if deposit_a == 0 && deposit_b == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if state.protocol_fee_share > clamm_config::MAX_PROTOCOL_FEE_SHARE {
        return Err(PoolError::Config(
            clamm_config::ConfigError::ProtocolFeeShareTooHigh(state.protocol_fee_share),
        ));
    }
    check_balances(state, holdings)?;

    let (liquidity_delta, minted_lp, record_a, record_b) = if state.liquidity_total == 0 {
        let delta = pricing::liquidity_initial(
            deposit_a,
            deposit_b,
            state.sqrt_price_min,
            state.sqrt_price_max,
        )?;
        (delta, delta, deposit_a, deposit_b)
    } else {
        let delta = governing_liquidity_delta(state, deposit_a, deposit_b)?;
        let minted = mul_div(state.lp_token_supply, delta, state.liquidity_total)?;
        // ΔL/L of each recorded balance; floors to at most the deposit.
        let record_a = mul_div(state.asset_a_balance, delta, state.liquidity_total)?;
        let record_b = mul_div(state.asset_b_balance, delta, state.liquidity_total)?;
        (delta, minted, record_a, record_b)
    };
    if liquidity_delta == 0 || minted_lp == 0 {
        return Err(PoolError::ZeroAmount);
    }

    let mut next = state.clone();
    next.asset_a_balance = next
        .asset_a_balance
        .checked_add(record_a)
        .ok_or(MathError::Overflow)?;
    next.asset_b_balance = next
        .asset_b_balance
        .checked_add(record_b)
        .ok_or(MathError::Overflow)?;
    next.liquidity_total = state
        .liquidity_total
        .checked_add(liquidity_delta)
        .ok_or(MathError::Overflow)?;
    next.lp_token_supply = state
        .lp_token_supply
        .checked_add(minted_lp)
        .ok_or(MathError::Overflow)?;

    debug_assert!(next.check_invariants().is_ok());
    debug!(
        deposit_a,
        deposit_b,
        record_a,
        record_b,
        liquidity_delta,
        minted_lp,
        liquidity_total = next.liquidity_total,
        "liquidity added"
    );
    Ok((next, minted_lp))
}

/// Smaller of the two asset-implied liquidity deltas; a depleted side
/// contributes no constraint.
fn governing_liquidity_delta(
    state: &PoolState,
    deposit_a: u128,
    deposit_b: u128,
) -> Result<u128, PoolError> {
    let implied_a = if deposit_a > 0 && state.asset_a_balance > 0 {
        Some(pricing::liquidity_subsequent(
            deposit_a,
            state.asset_a_balance,
            state.liquidity_total,
        )?)
    } else {
        None
    };
    let implied_b = if deposit_b > 0 && state.asset_b_balance > 0 {
        Some(pricing::liquidity_subsequent(
            deposit_b,
            state.asset_b_balance,
            state.liquidity_total,
        )?)
    } else {
        None
    };
    match (implied_a, implied_b) {
        (Some(a), Some(b)) => Ok(a.min(b)),
        (Some(a), None) => Ok(a),
        (None, Some(b)) => Ok(b),
        // Deposits only on depleted sides mint nothing.
        (None, None) => Ok(0),
    }
}

/// Burn LP tokens and withdraw the proportional share of liquidity,
/// principal plus accrued provider fees. Protocol fee liquidity is not
/// withdrawable here.
pub fn remove_liquidity(
    state: &PoolState,
    holdings: &ActualHoldings,
    lp_amount: u128,
) -> Result<(PoolState, u128, u128), PoolError> {
    if lp_amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if lp_amount > state.lp_token_supply {
        return Err(PoolError::InsufficientLpTokens {
            requested: lp_amount,
            supply: state.lp_token_supply,
        });
    }
    check_balances(state, holdings)?;

    let withdrawable = state.liquidity_total - state.liquidity_protocol_from_fees;
    let liquidity_delta = mul_div(withdrawable, lp_amount, state.lp_token_supply)?;
    let fee_share_removed =
        mul_div(state.liquidity_users_from_fees, lp_amount, state.lp_token_supply)?;

    let (out_a, out_b) = withdraw_amounts(state, liquidity_delta)?;

    let mut next = state.clone();
    next.asset_a_balance -= out_a;
    next.asset_b_balance -= out_b;
    next.liquidity_total -= liquidity_delta;
    next.liquidity_users_from_fees -= fee_share_removed;
    next.lp_token_supply -= lp_amount;

    debug_assert!(next.check_invariants().is_ok());
    debug!(
        lp_amount,
        liquidity_delta,
        out_a,
        out_b,
        lp_token_supply = next.lp_token_supply,
        "liquidity removed"
    );
    Ok((next, out_a, out_b))
}

/// Protocol-only withdrawal of accrued protocol fee liquidity.
pub fn remove_liquidity_admin(
    state: &PoolState,
    holdings: &ActualHoldings,
    amount: u128,
) -> Result<(PoolState, u128, u128), PoolError> {
    if amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if amount > state.liquidity_protocol_from_fees {
        return Err(PoolError::InsufficientProtocolFees {
            requested: amount,
            available: state.liquidity_protocol_from_fees,
        });
    }
    check_balances(state, holdings)?;

    let (out_a, out_b) = withdraw_amounts(state, amount)?;

    let mut next = state.clone();
    next.asset_a_balance -= out_a;
    next.asset_b_balance -= out_b;
    next.liquidity_total -= amount;
    next.liquidity_protocol_from_fees -= amount;

    debug_assert!(next.check_invariants().is_ok());
    debug!(
        amount,
        out_a,
        out_b,
        remaining_protocol_fees = next.liquidity_protocol_from_fees,
        "protocol fee liquidity withdrawn"
    );
    Ok((next, out_a, out_b))
}

/// Fold assets that arrived outside the add-liquidity path into the
/// pool's liquidity as provider fee value, without minting LP tokens.
/// [`DISTRIBUTE_ALL`] on a side folds everything the ledger holds above
/// the recorded balance.
pub fn distribute_excess_assets(
    state: &PoolState,
    holdings: &ActualHoldings,
    amount_a: u128,
    amount_b: u128,
) -> Result<(PoolState, u128), PoolError> {
    check_balances(state, holdings)?;
    if state.liquidity_total == 0 {
        return Err(PoolError::EmptyPool);
    }

    let amount_a = resolve_excess(amount_a, state.asset_a_balance, holdings.asset_a);
    let amount_b = resolve_excess(amount_b, state.asset_b_balance, holdings.asset_b);

    let new_a = state
        .asset_a_balance
        .checked_add(amount_a)
        .ok_or(MathError::Overflow)?;
    let new_b = state
        .asset_b_balance
        .checked_add(amount_b)
        .ok_or(MathError::Overflow)?;
    // The successor balances must still be covered by actual holdings.
    check_side(state, AssetSide::A, new_a, holdings.asset_a)?;
    check_side(state, AssetSide::B, new_b, holdings.asset_b)?;

    let revalued =
        quadratic_positive_root(new_a, new_b, state.sqrt_price_min, state.sqrt_price_max)?;
    let distributed = revalued.saturating_sub(state.liquidity_total);

    let mut next = state.clone();
    next.asset_a_balance = new_a;
    next.asset_b_balance = new_b;
    next.liquidity_total = state
        .liquidity_total
        .checked_add(distributed)
        .ok_or(MathError::Overflow)?;
    next.liquidity_users_from_fees = state
        .liquidity_users_from_fees
        .checked_add(distributed)
        .ok_or(MathError::Overflow)?;

    debug_assert!(next.check_invariants().is_ok());
    debug!(
        amount_a,
        amount_b,
        distributed,
        liquidity_total = next.liquidity_total,
        "excess assets distributed"
    );
    Ok((next, distributed))
}

fn resolve_excess(requested: u128, recorded: u128, actual: u128) -> u128 {
    if requested == DISTRIBUTE_ALL {
        actual.saturating_sub(recorded)
    } else {
        requested
    }
}

/// Convert a liquidity delta to asset payouts at the current price,
/// clamped to recorded balances so floor rounding can never overdraw.
fn withdraw_amounts(state: &PoolState, liquidity_delta: u128) -> Result<(u128, u128), PoolError> {
    let sqrt_price = pricing::sqrt_price_from_reserves(
        state.asset_a_balance,
        state.asset_b_balance,
        state.liquidity_total,
        state.sqrt_price_min,
        state.sqrt_price_max,
    )?;
    let (out_a, out_b) = pricing::liquidity_to_amounts(
        liquidity_delta,
        sqrt_price,
        state.sqrt_price_min,
        state.sqrt_price_max,
    )?;
    Ok((
        out_a.min(state.asset_a_balance),
        out_b.min(state.asset_b_balance),
    ))
}

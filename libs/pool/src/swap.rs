//! Single-sided swap execution against the active liquidity curve
//!
//! Pipeline per call: Validate → ComputeOutput → ApplyFee →
//! ClampToAvailable → Commit. The fee is deducted from the input before
//! the curve computation but the full input is recorded, so the fee
//! value stays in the pool; the resulting liquidity growth is split
//! between provider and protocol fee accruals at commit.

use clamm_math::{quadratic_positive_root, scaled_div, scaled_mul, MathError};
use tracing::debug;

use crate::error::PoolError;
use crate::guard::{check_balances, ActualHoldings};
use crate::state::{AssetSide, PoolState};

/// Execute a swap of `amount_in` of `input_asset` against the pool.
///
/// Returns the successor state and the output amount of the counter
/// asset. `minimum_to_receive` is enforced after computation and before
/// commit; any failure leaves the input state untouched.
pub fn swap(
    state: &PoolState,
    holdings: &ActualHoldings,
    input_asset: u64,
    amount_in: u128,
    minimum_to_receive: u128,
) -> Result<(PoolState, u128), PoolError> {
    // Validate
    if amount_in == 0 {
        return Err(PoolError::ZeroAmount);
    }
    let side_in = state.side_for_asset(input_asset)?;
    check_balances(state, holdings)?;
    if state.liquidity_total == 0 {
        return Err(PoolError::EmptyPool);
    }

    // ApplyFee: the curve only sees the net input.
    let fee = scaled_mul(amount_in, state.lp_fee_rate)?;
    let net_in = amount_in - fee;

    // ComputeOutput + ClampToAvailable along the single active range.
    let amount_out = match side_in {
        AssetSide::A => output_b_for_a_input(state, net_in)?,
        AssetSide::B => output_a_for_b_input(state, net_in)?,
    };

    if amount_out < minimum_to_receive {
        return Err(PoolError::InsufficientOutput {
            amount_out,
            minimum: minimum_to_receive,
        });
    }

    // Commit: record the full input (fee included), deduct the output,
    // then revalue liquidity from the new reserves. The growth over the
    // previous liquidity is the collected fee expressed in liquidity
    // units (plus any overpaid excess), split by the protocol share.
    let mut next = state.clone();
    match side_in {
        AssetSide::A => {
            next.asset_a_balance = next
                .asset_a_balance
                .checked_add(amount_in)
                .ok_or(MathError::Overflow)?;
            next.asset_b_balance -= amount_out;
        }
        AssetSide::B => {
            next.asset_b_balance = next
                .asset_b_balance
                .checked_add(amount_in)
                .ok_or(MathError::Overflow)?;
            next.asset_a_balance -= amount_out;
        }
    }

    let revalued = quadratic_positive_root(
        next.asset_a_balance,
        next.asset_b_balance,
        next.sqrt_price_min,
        next.sqrt_price_max,
    )?;
    let fee_liquidity = revalued.saturating_sub(state.liquidity_total);
    let protocol_cut = scaled_mul(fee_liquidity, state.protocol_fee_share)?;
    let users_cut = fee_liquidity - protocol_cut;

    next.liquidity_total = state
        .liquidity_total
        .checked_add(fee_liquidity)
        .ok_or(MathError::Overflow)?;
    next.liquidity_protocol_from_fees = next
        .liquidity_protocol_from_fees
        .checked_add(protocol_cut)
        .ok_or(MathError::Overflow)?;
    next.liquidity_users_from_fees = next
        .liquidity_users_from_fees
        .checked_add(users_cut)
        .ok_or(MathError::Overflow)?;

    debug_assert!(next.check_invariants().is_ok());
    debug!(
        ?side_in,
        amount_in,
        amount_out,
        fee_liquidity,
        liquidity_total = next.liquidity_total,
        "swap committed"
    );
    Ok((next, amount_out))
}

/// A in, B out: the extra A pushes √P down along
/// `√P' = L / (x' + L/√P2)`; B released is `y − L·(√P' − √P1)`.
///
/// When `√P'` falls below the lower bound the pool's entire B balance is
/// the output and the whole input is still consumed (overpay rule).
fn output_b_for_a_input(state: &PoolState, net_in: u128) -> Result<u128, PoolError> {
    let liquidity = state.liquidity_total;
    let x_after = state
        .asset_a_balance
        .checked_add(net_in)
        .ok_or(MathError::Overflow)?;
    let denominator = x_after
        .checked_add(scaled_div(liquidity, state.sqrt_price_max)?)
        .ok_or(MathError::Overflow)?;
    let sqrt_price_new = scaled_div(liquidity, denominator)?
        .clamp(state.sqrt_price_min, state.sqrt_price_max);

    let b_on_curve = scaled_mul(liquidity, sqrt_price_new - state.sqrt_price_min)?;
    Ok(state.asset_b_balance.saturating_sub(b_on_curve))
}

/// B in, A out: the extra B pushes √P up along `√P' = y'/L + √P1`;
/// A released is `x − (L/√P' − L/√P2)`.
///
/// When `√P'` rises above the upper bound the pool's entire A balance is
/// the output and the whole input is still consumed (overpay rule).
fn output_a_for_b_input(state: &PoolState, net_in: u128) -> Result<u128, PoolError> {
    let liquidity = state.liquidity_total;
    let y_after = state
        .asset_b_balance
        .checked_add(net_in)
        .ok_or(MathError::Overflow)?;
    let sqrt_price_new = scaled_div(y_after, liquidity)?
        .checked_add(state.sqrt_price_min)
        .ok_or(MathError::Overflow)?
        .clamp(state.sqrt_price_min, state.sqrt_price_max);

    let a_on_curve = scaled_div(liquidity, sqrt_price_new)?
        .saturating_sub(scaled_div(liquidity, state.sqrt_price_max)?);
    Ok(state.asset_a_balance.saturating_sub(a_on_curve))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquidity::add_liquidity;
    use clamm_config::PoolConfig;
    use clamm_math::SCALE;

    fn funded_pool(lp_fee_rate: u128, protocol_fee_share: u128) -> (PoolState, ActualHoldings) {
        // 100/100 at price 1.0 inside [0.01, 100]: L = 111.111111111
        let config = PoolConfig {
            asset_a_id: 0,
            asset_b_id: 42,
            price_min: 10_000_000,       // 0.01
            price_max: 100_000_000_000,  // 100
            lp_fee_rate,
            protocol_fee_share,
            verification_class: 0,
        };
        let state = PoolState::bootstrap(&config).unwrap();
        let holdings = ActualHoldings {
            asset_a: 100 * SCALE,
            asset_b: 100 * SCALE,
        };
        let (state, _) =
            add_liquidity(&state, &holdings, 100 * SCALE, 100 * SCALE).unwrap();
        (state, holdings)
    }

    #[test]
    fn rejects_zero_amount() {
        let (state, holdings) = funded_pool(0, 0);
        assert!(matches!(
            swap(&state, &holdings, 0, 0, 0),
            Err(PoolError::ZeroAmount)
        ));
    }

    #[test]
    fn rejects_unknown_asset() {
        let (state, holdings) = funded_pool(0, 0);
        assert!(matches!(
            swap(&state, &holdings, 999, SCALE, 0),
            Err(PoolError::InvalidAsset(999))
        ));
    }

    #[test]
    fn rejects_empty_pool() {
        let config = PoolConfig {
            asset_b_id: 42,
            ..PoolConfig::default()
        };
        let state = PoolState::bootstrap(&config).unwrap();
        let holdings = ActualHoldings::default();
        assert!(matches!(
            swap(&state, &holdings, 0, SCALE, 0),
            Err(PoolError::EmptyPool)
        ));
    }

    #[test]
    fn small_swap_moves_price_down_for_a_input() {
        let (state, mut holdings) = funded_pool(0, 0);
        let price_before = state.price().unwrap();
        holdings.asset_a += SCALE;
        let (next, out) = swap(&state, &holdings, 0, SCALE, 0).unwrap();
        assert!(out > 0);
        assert!(out < SCALE); // price impact
        assert!(next.price().unwrap() < price_before);
        assert_eq!(next.asset_a_balance, state.asset_a_balance + SCALE);
        assert_eq!(next.asset_b_balance, state.asset_b_balance - out);
    }

    #[test]
    fn slippage_bound_rejects_without_mutation() {
        let (state, mut holdings) = funded_pool(0, 0);
        holdings.asset_a += SCALE;
        let err = swap(&state, &holdings, 0, SCALE, 10 * SCALE).unwrap_err();
        assert!(matches!(err, PoolError::InsufficientOutput { .. }));
    }

    #[test]
    fn overpay_drains_counter_asset_exactly() {
        let (state, mut holdings) = funded_pool(0, 0);
        // Far more A than the ~1000 needed to walk the price to the
        // lower bound: the entire B balance comes out, the entire input
        // is consumed, and B ends at exactly zero.
        let amount_in = 5_000 * SCALE;
        holdings.asset_a += amount_in;
        let (next, out) = swap(&state, &holdings, 0, amount_in, 0).unwrap();
        assert_eq!(out, 100 * SCALE);
        assert_eq!(next.asset_b_balance, 0);
        assert_eq!(next.asset_a_balance, state.asset_a_balance + amount_in);
    }

    #[test]
    fn tiny_swap_after_unbalanced_deposit_pays_market_rate() {
        let (state, mut holdings) = funded_pool(0, 0);
        // 10 A alongside 1 B: the B-implied delta governs the mint and
        // the surplus A is never recorded, so it cannot leak to traders.
        holdings.asset_a += 10 * SCALE;
        holdings.asset_b += SCALE;
        let (state, _) = add_liquidity(&state, &holdings, 10 * SCALE, SCALE).unwrap();

        // At price ~1.0 a 0.001 B input buys ~0.001 A.
        let amount_in = 1_000_000;
        holdings.asset_b += amount_in;
        let (next, out) = swap(&state, &holdings, 42, amount_in, 0).unwrap();
        assert!(out > 0);
        assert!(out <= 2 * amount_in);
        assert_eq!(next.asset_a_balance, state.asset_a_balance - out);
    }

    #[test]
    fn fee_split_matches_protocol_share() {
        // 0.3% fee, 20% protocol share
        let (state, mut holdings) = funded_pool(3_000_000, 200_000_000);
        holdings.asset_a += 10 * SCALE;
        let (next, _) = swap(&state, &holdings, 0, 10 * SCALE, 0).unwrap();

        let fee_liquidity = next.liquidity_total - state.liquidity_total;
        assert!(fee_liquidity > 0);
        let protocol_gain =
            next.liquidity_protocol_from_fees - state.liquidity_protocol_from_fees;
        let users_gain = next.liquidity_users_from_fees - state.liquidity_users_from_fees;
        assert_eq!(protocol_gain, scaled_mul(fee_liquidity, 200_000_000).unwrap());
        assert_eq!(protocol_gain + users_gain, fee_liquidity);
    }

    #[test]
    fn zero_fee_swap_accrues_no_liquidity() {
        let (state, mut holdings) = funded_pool(0, 0);
        holdings.asset_b += SCALE;
        let (next, out) = swap(&state, &holdings, 42, SCALE, 0).unwrap();
        assert!(out > 0);
        // Rounding dust only (sub-ppm of the pool's liquidity); no fee growth.
        assert!(next.liquidity_total - state.liquidity_total <= 1_000);
    }
}

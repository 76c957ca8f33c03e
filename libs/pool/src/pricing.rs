//! Price and liquidity math over the active range
//!
//! Within the range the constant-liquidity curve relates real reserves
//! to the virtual liquidity L by
//!
//! ```text
//! x = L·(1/√P − 1/√P2)        y = L·(√P − √P1)
//! ```
//!
//! so `x + L/√P2 = L/√P` and `y + L·√P1 = L·√P`, which gives the
//! closed-form price used by [`price_from_reserves`]:
//!
//! ```text
//! P = (y + L·√P1) / (x + L/√P2)
//! ```

use clamm_math::{mul_div, quadratic_positive_root, scaled_div, scaled_mul, MathError};

use crate::error::PoolError;

/// Current pool price from recorded reserves.
///
/// All-B reserves sit at the upper bound and all-A reserves at the
/// lower bound; in between the closed form applies.
pub fn price_from_reserves(
    x: u128,
    y: u128,
    liquidity: u128,
    sqrt_price_min: u128,
    sqrt_price_max: u128,
) -> Result<u128, PoolError> {
    if y == 0 {
        return Ok(scaled_mul(sqrt_price_min, sqrt_price_min)?);
    }
    if x == 0 {
        return Ok(scaled_mul(sqrt_price_max, sqrt_price_max)?);
    }
    let numerator = y
        .checked_add(scaled_mul(liquidity, sqrt_price_min)?)
        .ok_or(MathError::Overflow)?;
    let denominator = x
        .checked_add(scaled_div(liquidity, sqrt_price_max)?)
        .ok_or(MathError::Overflow)?;
    Ok(scaled_div(numerator, denominator)?)
}

/// Current sqrt price from recorded reserves, clamped to the range.
///
/// Derived from the B-side relation `√P = y/L + √P1`; the clamp absorbs
/// recorded balances sitting slightly off the curve (fee residue,
/// undistributed excess).
pub fn sqrt_price_from_reserves(
    x: u128,
    y: u128,
    liquidity: u128,
    sqrt_price_min: u128,
    sqrt_price_max: u128,
) -> Result<u128, PoolError> {
    if liquidity == 0 {
        return Err(PoolError::EmptyPool);
    }
    if y == 0 {
        return Ok(sqrt_price_min);
    }
    if x == 0 {
        return Ok(sqrt_price_max);
    }
    let sqrt_price = scaled_div(y, liquidity)?
        .checked_add(sqrt_price_min)
        .ok_or(MathError::Overflow)?;
    Ok(sqrt_price.clamp(sqrt_price_min, sqrt_price_max))
}

/// Liquidity for the very first deposit: the positive root of the
/// reserve quadratic. Only valid while the pool holds zero liquidity.
pub fn liquidity_initial(
    x: u128,
    y: u128,
    sqrt_price_min: u128,
    sqrt_price_max: u128,
) -> Result<u128, PoolError> {
    Ok(quadratic_positive_root(x, y, sqrt_price_min, sqrt_price_max)?)
}

/// Liquidity minted by a follow-up deposit on one side:
/// `ΔL = L · deposit / balance`.
pub fn liquidity_subsequent(
    deposit: u128,
    balance: u128,
    liquidity: u128,
) -> Result<u128, PoolError> {
    Ok(mul_div(liquidity, deposit, balance)?)
}

/// Underlying asset amounts released by removing `delta` liquidity at
/// the current sqrt price: `a = ΔL/√P − ΔL/√P2`, `b = ΔL·(√P − √P1)`.
pub fn liquidity_to_amounts(
    delta: u128,
    sqrt_price: u128,
    sqrt_price_min: u128,
    sqrt_price_max: u128,
) -> Result<(u128, u128), PoolError> {
    let amount_a =
        scaled_div(delta, sqrt_price)?.saturating_sub(scaled_div(delta, sqrt_price_max)?);
    let amount_b = scaled_mul(delta, sqrt_price.saturating_sub(sqrt_price_min))?;
    Ok((amount_a, amount_b))
}

/// Asset B released for an asset A deposit at the current price.
/// When the pool holds no B the quote degenerates to the deposit itself.
pub fn asset_b_withdraw_on_asset_a_deposit(
    deposit_a: u128,
    balance_b: u128,
    price: u128,
) -> Result<u128, PoolError> {
    if balance_b == 0 {
        return Ok(deposit_a);
    }
    Ok(scaled_mul(deposit_a, price)?)
}

/// Asset A released for an asset B deposit at the current price.
/// When the pool holds no A the quote degenerates to the deposit itself.
pub fn asset_a_withdraw_on_asset_b_deposit(
    deposit_b: u128,
    balance_a: u128,
    price: u128,
) -> Result<u128, PoolError> {
    if balance_a == 0 {
        return Ok(deposit_b);
    }
    Ok(scaled_div(deposit_b, price)?)
}

/// Asset B required alongside an asset A deposit to keep the deposit
/// balanced at current reserves. With zero A reserves the ratio is
/// undefined and the quote degenerates to the requested deposit.
pub fn asset_b_deposit_required_for_asset_a(
    deposit_a: u128,
    balance_a: u128,
    balance_b: u128,
) -> Result<u128, PoolError> {
    if balance_a == 0 {
        return Ok(deposit_a);
    }
    Ok(mul_div(deposit_a, balance_b, balance_a)?)
}

/// Asset A required alongside an asset B deposit to keep the deposit
/// balanced at current reserves. With zero B reserves the ratio is
/// undefined and the quote degenerates to the requested deposit.
pub fn asset_a_deposit_required_for_asset_b(
    deposit_b: u128,
    balance_a: u128,
    balance_b: u128,
) -> Result<u128, PoolError> {
    if balance_b == 0 {
        return Ok(deposit_b);
    }
    Ok(mul_div(deposit_b, balance_a, balance_b)?)
}

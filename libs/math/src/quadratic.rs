//! Positive-root solver for the initial liquidity quadratic
//!
//! For reserves `x`, `y` inside the sqrt-price range `[√P1, √P2]` the
//! virtual liquidity L satisfies
//!
//! ```text
//! L²·(1 − √P1/√P2) + L·(−x·√P1 − y/√P2) − x·y = 0
//! ```
//!
//! Written as `a·L² − b·L − c = 0` with `a = 1 − √P1/√P2`,
//! `b = x·√P1 + y/√P2` and `c = x·y`, all three coefficients are
//! non-negative when the bounds are ordered. The branch is selected by
//! the sign of `2·SCALE − L3` where `L3 = 2·√P1/√P2` (that is, the sign
//! of `2a`); a zero value means the range is flat and the equation
//! degenerates to a linear one with no meaningful liquidity solution.

use crate::isqrt::sqrt_scaled;
use crate::{scaled_div, scaled_mul, MathError, SCALE};

/// Solve for the positive root L given reserves and sqrt-price bounds.
pub fn quadratic_positive_root(
    x: u128,
    y: u128,
    sqrt_price_min: u128,
    sqrt_price_max: u128,
) -> Result<u128, MathError> {
    // L3 = 2·√P1/√P2, scaled; the branch discriminator is 2·SCALE − L3.
    let l3 = scaled_div(sqrt_price_min, sqrt_price_max)?
        .checked_mul(2)
        .ok_or(MathError::Overflow)?;
    let two_scale = 2 * SCALE;

    let b = scaled_mul(x, sqrt_price_min)?
        .checked_add(scaled_div(y, sqrt_price_max)?)
        .ok_or(MathError::Overflow)?;
    let c = scaled_mul(x, y)?;

    if l3 == two_scale {
        // √P1 == √P2: the quadratic term vanishes and L is unconstrained.
        return Err(MathError::DegenerateRange);
    }
    if l3 < two_scale {
        root_for_widening_range(b, c, two_scale - l3)
    } else {
        root_for_inverted_range(b, c, l3 - two_scale)
    }
}

/// Positive root when `2·SCALE − L3 > 0`, i.e. `√P1 < √P2`.
///
/// The parabola opens upward (`a > 0`); with `b, c >= 0` exactly one
/// root is non-negative:
///
/// ```text
/// L = (b + √(b² + 4·a·c)) / 2a
/// ```
fn root_for_widening_range(b: u128, c: u128, two_a: u128) -> Result<u128, MathError> {
    // 4·a·c == 2 · (2a) · c in the scaled domain.
    let four_ac = scaled_mul(two_a, c)?
        .checked_mul(2)
        .ok_or(MathError::Overflow)?;
    let discriminant = scaled_mul(b, b)?
        .checked_add(four_ac)
        .ok_or(MathError::Overflow)?;
    let sqrt_d = sqrt_scaled(discriminant)?;

    scaled_div(b.checked_add(sqrt_d).ok_or(MathError::Overflow)?, two_a)
}

/// Positive root when `2·SCALE − L3 < 0`, i.e. the bounds arrived inverted.
///
/// With `a < 0` the parabola opens downward and the sign flips through
/// the identity: the discriminant becomes `b² − 4·|a|·c` and the only
/// candidate root is
///
/// ```text
/// L = (√(b² − 4·|a|·c) − b) / 2·|a|
/// ```
///
/// which is positive only when the discriminant exceeds `b²` — it never
/// does for non-negative `c`, so real deposits on an inverted range are
/// reported as having no positive root rather than silently miscomputed.
fn root_for_inverted_range(b: u128, c: u128, two_a_abs: u128) -> Result<u128, MathError> {
    let four_ac = scaled_mul(two_a_abs, c)?
        .checked_mul(2)
        .ok_or(MathError::Overflow)?;
    let discriminant = scaled_mul(b, b)?
        .checked_sub(four_ac)
        .ok_or(MathError::NoPositiveRoot)?;
    let sqrt_d = sqrt_scaled(discriminant)?;

    let numerator = sqrt_d.checked_sub(b).ok_or(MathError::NoPositiveRoot)?;
    if numerator == 0 {
        return Err(MathError::NoPositiveRoot);
    }
    scaled_div(numerator, two_a_abs)
}

//! Floor integer square root
//!
//! Newton's method over `u128` with a power-of-two initial guess taken
//! from the bit length. Bit-exact against floor(sqrt(x)), including on
//! perfect squares, which the sqrt-price bound computation relies on.

use crate::{MathError, SCALE};

/// Floor integer square root of `x`.
pub fn isqrt(x: u128) -> u128 {
    if x < 2 {
        return x;
    }

    // Initial guess: 2^ceil(bits/2) >= sqrt(x), so the Newton sequence
    // decreases monotonically onto the floor root.
    let bits = 128 - x.leading_zeros();
    let mut guess = 1u128 << bits.div_ceil(2);

    loop {
        let next = (guess + x / guess) / 2;
        if next >= guess {
            return guess;
        }
        guess = next;
    }
}

/// Square root in the scaled fixed-point domain.
///
/// For a SCALE-scaled `x`, `sqrt(x/SCALE) * SCALE == isqrt(x * SCALE)`.
pub fn sqrt_scaled(x: u128) -> Result<u128, MathError> {
    Ok(isqrt(x.checked_mul(SCALE).ok_or(MathError::Overflow)?))
}

//! Fixed-point arithmetic for concentrated-liquidity pool math
//!
//! All quantities are `u128` integers with an implicit denominator of
//! [`SCALE`] (1e9). Intermediate products are computed at full `u128`
//! width with checked arithmetic; no floating point anywhere.

pub mod error;
pub mod isqrt;
pub mod quadratic;

pub use error::MathError;
pub use isqrt::{isqrt, sqrt_scaled};
pub use quadratic::quadratic_positive_root;

/// Fixed-point denominator shared by every scaled quantity in the engine.
pub const SCALE: u128 = 1_000_000_000;

/// Multiply two scaled values: `a * b / SCALE`.
pub fn scaled_mul(a: u128, b: u128) -> Result<u128, MathError> {
    Ok(a.checked_mul(b).ok_or(MathError::Overflow)? / SCALE)
}

/// Divide two scaled values: `a * SCALE / b`.
pub fn scaled_div(a: u128, b: u128) -> Result<u128, MathError> {
    if b == 0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a.checked_mul(SCALE).ok_or(MathError::Overflow)? / b)
}

/// `a * b / d` with a checked intermediate. The ratio `b / d` is
/// dimensionless, so no SCALE adjustment applies.
pub fn mul_div(a: u128, b: u128, d: u128) -> Result<u128, MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a.checked_mul(b).ok_or(MathError::Overflow)? / d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_mul_identity() {
        // 1.0 * x == x
        assert_eq!(scaled_mul(SCALE, 123_456_789).unwrap(), 123_456_789);
        // 2.5 * 4.0 == 10.0
        assert_eq!(
            scaled_mul(2_500_000_000, 4_000_000_000).unwrap(),
            10_000_000_000
        );
    }

    #[test]
    fn scaled_div_identity() {
        assert_eq!(scaled_div(123_456_789, SCALE).unwrap(), 123_456_789);
        // 10.0 / 4.0 == 2.5
        assert_eq!(
            scaled_div(10_000_000_000, 4_000_000_000).unwrap(),
            2_500_000_000
        );
    }

    #[test]
    fn scaled_div_by_zero() {
        assert!(matches!(
            scaled_div(SCALE, 0),
            Err(MathError::DivisionByZero)
        ));
    }

    #[test]
    fn scaled_mul_overflow_detected() {
        assert!(matches!(
            scaled_mul(u128::MAX, u128::MAX),
            Err(MathError::Overflow)
        ));
    }

    #[test]
    fn mul_div_basic() {
        assert_eq!(mul_div(10, 3, 2).unwrap(), 15);
        assert!(matches!(mul_div(1, 1, 0), Err(MathError::DivisionByZero)));
    }

    #[test]
    fn divisions_round_toward_zero() {
        // 1 / 3 at SCALE=1e9 floors to 0.333333333
        assert_eq!(scaled_div(1_000_000_000, 3_000_000_000).unwrap(), 333_333_333);
        assert_eq!(mul_div(7, 1, 2).unwrap(), 3);
    }
}

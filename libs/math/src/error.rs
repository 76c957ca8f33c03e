//! Arithmetic error taxonomy

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow in fixed-point operation")]
    Overflow,

    #[error("division by zero in fixed-point operation")]
    DivisionByZero,

    #[error("degenerate price range: lower and upper sqrt-price bounds coincide")]
    DegenerateRange,

    #[error("quadratic has no positive root for the given reserves")]
    NoPositiveRoot,
}

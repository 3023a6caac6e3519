//! Arithmetic failures

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// Result (or an intermediate) does not fit the target width
    #[error("arithmetic overflow")]
    Overflow,
    /// Divisor evaluated to zero
    #[error("division by zero")]
    DivisionByZero,
}

pub type MathResult<T> = Result<T, MathError>;

//! Checked u128 helpers - no unwrap, no panics, no wrapping

use crate::error::{MathError, MathResult};

/// Add u128, failing on overflow
#[inline]
pub fn add_u128(a: u128, b: u128) -> MathResult<u128> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

/// Subtract u128, failing instead of going below zero
#[inline]
pub fn sub_u128(a: u128, b: u128) -> MathResult<u128> {
    a.checked_sub(b).ok_or(MathError::Overflow)
}

/// Multiply u128, failing on overflow
#[inline]
pub fn mul_u128(a: u128, b: u128) -> MathResult<u128> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

/// Divide u128 rounding toward zero
#[inline]
pub fn div_u128(a: u128, b: u128) -> MathResult<u128> {
    a.checked_div(b).ok_or(MathError::DivisionByZero)
}

/// Divide u128 rounding up
#[inline]
pub fn div_ceil_u128(a: u128, b: u128) -> MathResult<u128> {
    if b == 0 {
        return Err(MathError::DivisionByZero);
    }
    let q = a / b;
    if a % b == 0 {
        Ok(q)
    } else {
        add_u128(q, 1)
    }
}

/// Minimum of two u128
#[inline]
pub fn min_u128(a: u128, b: u128) -> u128 {
    if a < b { a } else { b }
}

/// Sum a sequence of amounts, failing on overflow
pub fn sum_u128<I: IntoIterator<Item = u128>>(values: I) -> MathResult<u128> {
    values.into_iter().try_fold(0u128, add_u128)
}

//! Decimal fixed-point numbers: a magnitude tagged with a power-of-ten exponent

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::wide;

/// Rounding direction for a division
///
/// Amounts owed *to* a counterparty round down, amounts owed *by* a
/// counterparty round up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// `value * 10^exponent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Number {
    #[serde(with = "crate::serde_amount")]
    pub value: u128,
    pub exponent: i32,
}

impl Number {
    pub const ONE: Number = Number { value: 1, exponent: 0 };
    pub const ZERO: Number = Number { value: 0, exponent: 0 };

    pub const fn new(value: u128, exponent: i32) -> Self {
        Self { value, exponent }
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}e{}", self.value, self.exponent)
    }
}

/// A product of u128 factors scaled by `10^exponent`
///
/// Used to express both sides of a ratio without forming the ratio itself.
#[derive(Debug, Clone, Copy)]
pub struct Scaled<'a> {
    pub factors: &'a [u128],
    pub exponent: i32,
}

impl<'a> Scaled<'a> {
    pub fn new(factors: &'a [u128], exponent: i32) -> Self {
        Self { factors, exponent }
    }
}

/// `numerator / denominator` as an integer in units of 10^0
pub fn scaled_ratio(numerator: Scaled<'_>, denominator: Scaled<'_>, rounding: Rounding) -> MathResult<u128> {
    let n = wide::product(numerator.factors)?;
    let d = wide::product(denominator.factors)?;
    let shift = numerator
        .exponent
        .checked_sub(denominator.exponent)
        .ok_or(MathError::Overflow)?;
    wide::to_u128(wide::div_scaled(n, d, shift, rounding)?)
}

/// Exact comparison of two scaled products
pub fn compare_scaled(lhs: Scaled<'_>, rhs: Scaled<'_>) -> MathResult<Ordering> {
    let l = wide::product(lhs.factors)?;
    let r = wide::product(rhs.factors)?;
    Ok(wide::cmp_scaled(l, lhs.exponent, r, rhs.exponent))
}

/// Re-express `value` (in units of `10^from_exp`) in units of `10^to_exp`
pub fn rescale(value: u128, from_exp: i32, to_exp: i32, rounding: Rounding) -> MathResult<u128> {
    scaled_ratio(Scaled::new(&[value], from_exp), Scaled::new(&[1], to_exp), rounding)
}

/// Convert `amount` of one asset into another through `rate`
///
/// `amount` is in units of `10^from_exp`, `rate` is the number of canonical
/// target units per canonical source unit, the result is in units of
/// `10^to_exp`.
pub fn convert(amount: u128, from_exp: i32, rate: Number, to_exp: i32, rounding: Rounding) -> MathResult<u128> {
    let exp = from_exp
        .checked_add(rate.exponent)
        .ok_or(MathError::Overflow)?;
    scaled_ratio(
        Scaled::new(&[amount, rate.value], exp),
        Scaled::new(&[1], to_exp),
        rounding,
    )
}

/// `a * b / c` in 256 bits, narrowed back to u128
pub fn mul_div(a: u128, b: u128, c: u128, rounding: Rounding) -> MathResult<u128> {
    scaled_ratio(Scaled::new(&[a, b], 0), Scaled::new(&[c], 0), rounding)
}

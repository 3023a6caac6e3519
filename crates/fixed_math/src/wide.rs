//! 256-bit intermediates for products of amounts, prices and powers of ten
//!
//! Ledger amounts are u128 at rest. Products such as
//! `collateral * price * 10^k` are formed in 256 bits and only narrowed back
//! once the final division has been applied.

use core::cmp::Ordering;

use uint::construct_uint;

use crate::error::{MathError, MathResult};
use crate::number::Rounding;

construct_uint! {
    pub struct U256(4);
}

/// 10^exp, failing if it does not fit 256 bits
pub fn pow10(exp: u32) -> MathResult<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(MathError::Overflow)
}

/// Product of u128 factors in 256 bits
pub fn product(factors: &[u128]) -> MathResult<U256> {
    factors.iter().try_fold(U256::one(), |acc, f| {
        acc.checked_mul(U256::from(*f)).ok_or(MathError::Overflow)
    })
}

/// Narrow back to u128
pub fn to_u128(v: U256) -> MathResult<u128> {
    if v.bits() > 128 {
        return Err(MathError::Overflow);
    }
    Ok(v.low_u128())
}

/// `v * 10^shift`, or `None` when it does not fit 256 bits
fn scale_up(v: U256, shift: u32) -> Option<U256> {
    if v.is_zero() {
        return Some(v);
    }
    pow10(shift).ok().and_then(|p| v.checked_mul(p))
}

/// `numerator * 10^shift / denominator` with the requested rounding
pub fn div_scaled(numerator: U256, denominator: U256, shift: i32, rounding: Rounding) -> MathResult<U256> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    if numerator.is_zero() {
        return Ok(U256::zero());
    }
    let (num, den) = if shift >= 0 {
        let num = scale_up(numerator, shift.unsigned_abs()).ok_or(MathError::Overflow)?;
        (num, denominator)
    } else {
        match scale_up(denominator, shift.unsigned_abs()) {
            Some(den) => (numerator, den),
            // Denominator exceeds 2^256 > numerator: the exact quotient is in (0, 1)
            None => {
                return Ok(match rounding {
                    Rounding::Up => U256::one(),
                    Rounding::Down => U256::zero(),
                });
            }
        }
    };
    let (q, r) = num.div_mod(den);
    match rounding {
        Rounding::Up if !r.is_zero() => q.checked_add(U256::one()).ok_or(MathError::Overflow),
        _ => Ok(q),
    }
}

/// Compare `lhs * 10^lhs_exp` against `rhs * 10^rhs_exp` exactly
pub fn cmp_scaled(lhs: U256, lhs_exp: i32, rhs: U256, rhs_exp: i32) -> Ordering {
    let shift = i64::from(lhs_exp) - i64::from(rhs_exp);
    let magnitude = u32::try_from(shift.unsigned_abs()).unwrap_or(u32::MAX);
    if shift >= 0 {
        match scale_up(lhs, magnitude) {
            Some(l) => l.cmp(&rhs),
            None => Ordering::Greater,
        }
    } else {
        match scale_up(rhs, magnitude) {
            Some(r) => lhs.cmp(&r),
            None => Ordering::Less,
        }
    }
}

//! Collateralization and settlement formulas
//!
//! Every formula is a single exponent-normalized ratio of products, so no
//! intermediate rounding happens. Claim-token base units have exponent 0.
//!
//! Rounding follows who is owed: collateral paid to a holder and the mint
//! limit round down, underlying owed by a holder rounds up.

use fixed_math::{compare_scaled, mul_div, scaled_ratio, Number, Rounding, Scaled};
use optvault_common::{VaultError, VaultResult};

use crate::interfaces::PriceOracle;
use crate::state::AssetRegistry;

/// Prices of the collateral and strike assets in a shared numeraire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePair {
    pub collateral: Number,
    pub strike: Number,
}

impl PricePair {
    /// Collateral is the strike asset
    pub const PARITY: PricePair = PricePair { collateral: Number::ONE, strike: Number::ONE };

    pub fn resolve(assets: &AssetRegistry, oracle: &dyn PriceOracle) -> VaultResult<Self> {
        if assets.collateral_is_strike() {
            return Ok(Self::PARITY);
        }
        let quote = |id| match oracle.price(id) {
            Some(p) if !p.is_zero() => Ok(p),
            _ => {
                log::debug!("Pricing: no usable price for {}", id);
                Err(VaultError::PriceUnavailable)
            }
        };
        Ok(Self {
            collateral: quote(&assets.collateral().id)?,
            strike: quote(&assets.strike().id)?,
        })
    }
}

/// Inputs every ratio and payout formula reads, captured once per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub collateral_exponent: i32,
    pub underlying_exponent: i32,
    /// Strike-asset canonical units per claim-token base unit
    pub strike_price: Number,
    /// Underlying canonical units per claim-token base unit
    pub claim_exchange_rate: Number,
    pub prices: PricePair,
}

fn exp_sum(parts: &[i32]) -> VaultResult<i32> {
    parts
        .iter()
        .try_fold(0i32, |acc, e| acc.checked_add(*e))
        .ok_or(VaultError::ArithmeticOverflow)
}

impl Pricing {
    /// Exponent of `collateral * Pc`
    fn collateral_value_exp(&self) -> VaultResult<i32> {
        exp_sum(&[self.collateral_exponent, self.prices.collateral.exponent])
    }

    /// Largest issued supply `collateral` can back at `ratio`
    ///
    /// `floor(collateral*Pc / (ratio*strike*Ps))`, zero when there is no
    /// collateral.
    pub fn max_issuable(&self, collateral: u128, ratio: Number) -> VaultResult<u128> {
        if collateral == 0 {
            return Ok(0);
        }
        let num_exp = self.collateral_value_exp()?;
        let den_exp = exp_sum(&[ratio.exponent, self.strike_price.exponent, self.prices.strike.exponent])?;
        Ok(scaled_ratio(
            Scaled::new(&[collateral, self.prices.collateral.value], num_exp),
            Scaled::new(&[ratio.value, self.strike_price.value, self.prices.strike.value], den_exp),
            Rounding::Down,
        )?)
    }

    /// `issued*ratio*strike*Ps <= collateral*Pc`, compared without division
    pub fn is_safe(&self, collateral: u128, issued: u128, ratio: Number) -> VaultResult<bool> {
        if issued == 0 {
            return Ok(true);
        }
        let required_exp = exp_sum(&[ratio.exponent, self.strike_price.exponent, self.prices.strike.exponent])?;
        let held_exp = self.collateral_value_exp()?;
        let ord = compare_scaled(
            Scaled::new(&[issued, ratio.value, self.strike_price.value, self.prices.strike.value], required_exp),
            Scaled::new(&[collateral, self.prices.collateral.value], held_exp),
        )?;
        Ok(ord.is_le())
    }

    /// Collateral base units worth `proportion` of the strike value of `share`
    ///
    /// With `proportion == 1` this is the exercise payout; with the
    /// transaction fee it is the fee taken on top.
    pub fn collateral_to_pay(&self, share: u128, proportion: Number) -> VaultResult<u128> {
        if share == 0 || proportion.is_zero() {
            return Ok(0);
        }
        let num_exp = exp_sum(&[proportion.exponent, self.strike_price.exponent, self.prices.strike.exponent])?;
        let den_exp = self.collateral_value_exp()?;
        Ok(scaled_ratio(
            Scaled::new(&[share, proportion.value, self.strike_price.value, self.prices.strike.value], num_exp),
            Scaled::new(&[self.prices.collateral.value], den_exp),
            Rounding::Down,
        )?)
    }

    /// Underlying base units a holder pays to exercise `amount` claim tokens
    pub fn underlying_required(&self, amount: u128) -> VaultResult<u128> {
        Ok(fixed_math::convert(
            amount,
            0,
            self.claim_exchange_rate,
            self.underlying_exponent,
            Rounding::Up,
        )?)
    }
}

/// Portion of `owed` attributable to `share` out of `total`, rounded down
pub fn underlying_share(owed: u128, share: u128, total: u128) -> VaultResult<u128> {
    if total == 0 {
        return Err(VaultError::ArithmeticOverflow);
    }
    Ok(mul_div(owed, share, total, Rounding::Down)?)
}

//! Risk parameters and the versioned store that holds them

use fixed_math::{add_u128, rescale, Rounding};
use optvault_common::{Number, VaultError, VaultResult};
use serde::{Deserialize, Serialize};

pub const LIQUIDATION_INCENTIVE_EXPONENT: i32 = -3;
pub const LIQUIDATION_FACTOR_EXPONENT: i32 = -3;
pub const TRANSACTION_FEE_EXPONENT: i32 = -3;
pub const COLLATERALIZATION_RATIO_EXPONENT: i32 = -1;

/// 20%
pub const MAX_LIQUIDATION_INCENTIVE: u128 = 200;
/// 100%
pub const MAX_LIQUIDATION_FACTOR: u128 = 1000;
/// 10%
pub const MAX_TRANSACTION_FEE: u128 = 100;
/// 1.0
pub const MIN_COLLATERALIZATION_RATIO: u128 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub min_collateralization_ratio: Number,
    /// Stored and bounded only; liquidation is not performed by this engine
    pub liquidation_incentive: Number,
    pub liquidation_factor: Number,
    pub transaction_fee: Number,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            min_collateralization_ratio: Number::new(MIN_COLLATERALIZATION_RATIO, COLLATERALIZATION_RATIO_EXPONENT),
            liquidation_incentive: Number::new(0, LIQUIDATION_INCENTIVE_EXPONENT),
            liquidation_factor: Number::new(0, LIQUIDATION_FACTOR_EXPONENT),
            transaction_fee: Number::new(0, TRANSACTION_FEE_EXPONENT),
        }
    }
}

impl Parameters {
    /// Build parameters from raw values at their fixed exponents
    pub fn from_raw(
        liquidation_incentive: u128,
        liquidation_factor: u128,
        transaction_fee: u128,
        min_collateralization_ratio: u128,
    ) -> VaultResult<Self> {
        if liquidation_incentive > MAX_LIQUIDATION_INCENTIVE
            || liquidation_factor > MAX_LIQUIDATION_FACTOR
            || transaction_fee > MAX_TRANSACTION_FEE
            || min_collateralization_ratio < MIN_COLLATERALIZATION_RATIO
        {
            return Err(VaultError::InvalidParameter);
        }

        Ok(Self {
            min_collateralization_ratio: Number::new(min_collateralization_ratio, COLLATERALIZATION_RATIO_EXPONENT),
            liquidation_incentive: Number::new(liquidation_incentive, LIQUIDATION_INCENTIVE_EXPONENT),
            liquidation_factor: Number::new(liquidation_factor, LIQUIDATION_FACTOR_EXPONENT),
            transaction_fee: Number::new(transaction_fee, TRANSACTION_FEE_EXPONENT),
        })
    }

    /// Ratio a vault with issued supply must hold to mint or withdraw
    ///
    /// The larger of the minimum ratio and `1 + fee`. A vault holding this
    /// much stays at or above the minimum ratio through any exercise,
    /// including the fee taken on top of the payout.
    pub fn required_ratio(&self) -> VaultResult<Number> {
        let ratio = self.min_collateralization_ratio;
        let fee = self.transaction_fee;
        let exponent = ratio.exponent.min(fee.exponent).min(0);

        let ratio_value = rescale(ratio.value, ratio.exponent, exponent, Rounding::Up)?;
        let one = rescale(1, 0, exponent, Rounding::Up)?;
        let one_plus_fee = add_u128(one, rescale(fee.value, fee.exponent, exponent, Rounding::Up)?)?;
        Ok(Number::new(ratio_value.max(one_plus_fee), exponent))
    }
}

/// Current parameters plus a version that bumps on every accepted update
///
/// Operations read one [`Parameters`] copy at entry and use it throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterStore {
    current: Parameters,
    version: u64,
}

impl ParameterStore {
    pub fn new(initial: Parameters) -> Self {
        Self { current: initial, version: 0 }
    }

    pub fn snapshot(&self) -> Parameters {
        self.current
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn replace(&mut self, next: Parameters) -> u64 {
        self.current = next;
        self.version = self.version.saturating_add(1);
        self.version
    }
}

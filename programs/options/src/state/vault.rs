//! Per-owner collateral position

use fixed_math::{add_u128, MathResult};
use optvault_common::{Identity, VaultError, VaultResult};
use serde::{Deserialize, Serialize};

/// Collateral locked by one owner and the claim tokens issued against it
///
/// All balances are in base units of their asset. A vault is never deleted;
/// once every balance returns to zero it is simply settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vault {
    pub owner: Identity,
    #[serde(with = "fixed_math::serde_amount")]
    pub collateral: u128,
    #[serde(with = "fixed_math::serde_amount")]
    pub issued: u128,
    /// Underlying received from exercises settled against this vault
    #[serde(with = "fixed_math::serde_amount")]
    pub underlying: u128,
}

impl Vault {
    pub fn new(owner: Identity) -> Self {
        Self { owner, ..Self::default() }
    }

    pub fn deposit(&mut self, amount: u128) -> MathResult<()> {
        self.collateral = add_u128(self.collateral, amount)?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: u128) -> VaultResult<()> {
        self.collateral = self
            .collateral
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientCollateral)?;
        Ok(())
    }

    pub fn issue(&mut self, amount: u128) -> MathResult<()> {
        self.issued = add_u128(self.issued, amount)?;
        Ok(())
    }

    pub fn retire(&mut self, amount: u128) -> VaultResult<()> {
        self.issued = self
            .issued
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientIssued)?;
        Ok(())
    }

    pub fn credit_underlying(&mut self, amount: u128) -> MathResult<()> {
        self.underlying = add_u128(self.underlying, amount)?;
        Ok(())
    }

    pub fn is_settled(&self) -> bool {
        self.collateral == 0 && self.issued == 0
    }
}

//! Fungible balance ledger for the claim token

use std::collections::HashMap;

use fixed_math::{add_u128, MathResult};
use optvault_common::{Identity, VaultError, VaultResult};

/// Balances and total supply of the claim token
///
/// Every mutator validates fully before writing, so a failed call leaves the
/// ledger untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimTokenLedger {
    balances: HashMap<Identity, u128>,
    total_supply: u128,
}

impl ClaimTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, who: &Identity) -> u128 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Would minting `amount` to `to` fit
    pub fn can_mint(&self, to: &Identity, amount: u128) -> MathResult<()> {
        add_u128(self.total_supply, amount)?;
        add_u128(self.balance_of(to), amount)?;
        Ok(())
    }

    pub fn mint(&mut self, to: Identity, amount: u128) -> MathResult<()> {
        let supply = add_u128(self.total_supply, amount)?;
        let balance = add_u128(self.balance_of(&to), amount)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    pub fn burn(&mut self, from: Identity, amount: u128) -> VaultResult<()> {
        let balance = self
            .balance_of(&from)
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientClaimTokenBalance)?;
        // Supply >= any single balance
        let supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        self.total_supply = supply;
        self.set_balance(from, balance);
        Ok(())
    }

    pub fn transfer(&mut self, from: Identity, to: Identity, amount: u128) -> VaultResult<()> {
        let from_balance = self
            .balance_of(&from)
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientClaimTokenBalance)?;
        if from == to {
            return Ok(());
        }
        let to_balance = add_u128(self.balance_of(&to), amount)?;
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);
        Ok(())
    }

    /// Holders with a nonzero balance
    pub fn holders(&self) -> impl Iterator<Item = (&Identity, &u128)> {
        self.balances.iter()
    }

    fn set_balance(&mut self, who: Identity, balance: u128) {
        if balance == 0 {
            self.balances.remove(&who);
        } else {
            self.balances.insert(who, balance);
        }
    }
}

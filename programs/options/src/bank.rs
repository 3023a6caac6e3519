//! In-memory asset ledger implementing [`AssetBank`]
//!
//! Holds external account balances, allowances granted to the instrument and
//! the instrument's custody per asset. Used by the sequencer and by tests.

use std::collections::{HashMap, HashSet};

use fixed_math::{add_u128, sub_u128};
use optvault_common::{AssetId, Identity};

use crate::interfaces::{AssetBank, TransferError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryBank {
    balances: HashMap<(AssetId, Identity), u128>,
    allowances: HashMap<(AssetId, Identity), u128>,
    custody: HashMap<AssetId, u128>,
    /// Accounts that refuse incoming payouts of an asset
    rejecting: HashSet<(AssetId, Identity)>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an external account out of thin air
    pub fn fund(&mut self, asset: AssetId, who: Identity, amount: u128) {
        let bal = self.balances.entry((asset, who)).or_insert(0);
        *bal = bal.saturating_add(amount);
    }

    /// Set how much the instrument may pull from `owner`
    pub fn approve(&mut self, asset: AssetId, owner: Identity, amount: u128) {
        self.allowances.insert((asset, owner), amount);
    }

    pub fn allowance(&self, asset: AssetId, owner: Identity) -> u128 {
        self.allowances.get(&(asset, owner)).copied().unwrap_or(0)
    }

    pub fn custody(&self, asset: AssetId) -> u128 {
        self.custody.get(&asset).copied().unwrap_or(0)
    }

    /// Make `who` reject payouts of `asset` until [`InMemoryBank::accept_transfers`]
    pub fn reject_transfers(&mut self, asset: AssetId, who: Identity) {
        self.rejecting.insert((asset, who));
    }

    pub fn accept_transfers(&mut self, asset: AssetId, who: Identity) {
        self.rejecting.remove(&(asset, who));
    }
}

impl AssetBank for InMemoryBank {
    fn transfer_in(&mut self, asset: AssetId, from: Identity, amount: u128) -> Result<(), TransferError> {
        let balance = self.balance_of(asset, from);
        let allowance = self.allowance(asset, from);
        if balance < amount {
            return Err(TransferError::InsufficientBalance);
        }
        if allowance < amount {
            return Err(TransferError::InsufficientAllowance);
        }
        let custody = add_u128(self.custody(asset), amount).map_err(|_| TransferError::Overflow)?;

        self.balances.insert((asset, from), balance - amount);
        self.allowances.insert((asset, from), allowance - amount);
        self.custody.insert(asset, custody);
        Ok(())
    }

    fn transfer_out(&mut self, asset: AssetId, to: Identity, amount: u128) -> Result<(), TransferError> {
        if self.rejecting.contains(&(asset, to)) {
            return Err(TransferError::Rejected(to));
        }
        let custody = sub_u128(self.custody(asset), amount).map_err(|_| TransferError::InsufficientBalance)?;
        let balance = add_u128(self.balance_of(asset, to), amount).map_err(|_| TransferError::Overflow)?;

        self.custody.insert(asset, custody);
        self.balances.insert((asset, to), balance);
        Ok(())
    }

    fn balance_of(&self, asset: AssetId, who: Identity) -> u128 {
        self.balances.get(&(asset, who)).copied().unwrap_or(0)
    }
}

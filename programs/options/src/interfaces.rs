//! Collaborators the engine consumes: asset custody, authorization, time
//! and prices

use std::collections::HashMap;

use optvault_common::{AssetId, Identity, Number};
use thiserror::Error;

/// Failure reported by the asset transfer capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("insufficient allowance")]
    InsufficientAllowance,
    #[error("transfer rejected by {0}")]
    Rejected(Identity),
    #[error("balance overflow")]
    Overflow,
}

/// Moves assets between external accounts and the instrument's custody
pub trait AssetBank {
    /// Pull `amount` of `asset` from `from` into custody
    fn transfer_in(&mut self, asset: AssetId, from: Identity, amount: u128) -> Result<(), TransferError>;

    /// Pay `amount` of `asset` out of custody to `to`
    fn transfer_out(&mut self, asset: AssetId, to: Identity, amount: u128) -> Result<(), TransferError>;

    fn balance_of(&self, asset: AssetId, who: Identity) -> u128;
}

pub trait Authority {
    fn is_authorized_configurer(&self, caller: &Identity) -> bool;
}

pub trait Clock {
    /// Seconds since the unix epoch
    fn now(&self) -> u64;
}

/// Price of an asset in a common numeraire, `None` when no quote exists
pub trait PriceOracle {
    fn price(&self, asset: &AssetId) -> Option<Number>;
}

/// One identity allowed to change parameters and sweep fees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleConfigurer(pub Identity);

impl Authority for SingleConfigurer {
    fn is_authorized_configurer(&self, caller: &Identity) -> bool {
        &self.0 == caller
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClock {
    now: u64,
}

impl FixedClock {
    pub fn at(now: u64) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: u64) {
        self.now = now;
    }

    pub fn advance(&mut self, seconds: u64) {
        self.now = self.now.saturating_add(seconds);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.now
    }
}


/// Fixed price table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPrices {
    prices: HashMap<AssetId, Number>,
}

impl StaticPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, asset: AssetId, price: Number) -> Self {
        self.prices.insert(asset, price);
        self
    }

    pub fn set(&mut self, asset: AssetId, price: Number) {
        self.prices.insert(asset, price);
    }

    pub fn remove(&mut self, asset: &AssetId) {
        self.prices.remove(asset);
    }
}

impl PriceOracle for StaticPrices {
    fn price(&self, asset: &AssetId) -> Option<Number> {
        self.prices.get(asset).copied()
    }
}

/// Collaborators handed to every instruction handler
pub struct Context<'a> {
    pub bank: &'a mut dyn AssetBank,
    pub clock: &'a dyn Clock,
    pub oracle: &'a dyn PriceOracle,
    pub authority: &'a dyn Authority,
}

impl<'a> Context<'a> {
    pub fn new(
        bank: &'a mut dyn AssetBank,
        clock: &'a dyn Clock,
        oracle: &'a dyn PriceOracle,
        authority: &'a dyn Authority,
    ) -> Self {
        Self { bank, clock, oracle, authority }
    }
}

//! Shared fixtures for cross-crate option vault tests
//!
//! A [`Market`] bundles one instrument with an in-memory bank, a manually
//! driven clock, static prices and a single configurer, and runs
//! instructions through the public entrypoint.

use optvault_common::{AssetId, Identity, Number, VaultResult};
use optvault_options::{
    check_invariants, process_instruction, AssetRegistry, Context, FixedClock, InMemoryBank, Instruction,
    InvariantViolation, OptionTerms, OptionsInstrument, Outcome, Parameters, SingleConfigurer, StaticPrices,
};

pub const EXPIRY: u64 = 2_000_000;
pub const WINDOW: u64 = 10_000;

pub struct Market {
    pub instrument: OptionsInstrument,
    pub bank: InMemoryBank,
    pub clock: FixedClock,
    pub oracle: StaticPrices,
    pub authority: SingleConfigurer,
    pub collateral: AssetId,
    pub underlying: AssetId,
    pub admin: Identity,
}

impl Market {
    fn build(
        name: &str,
        collateral: (&str, i32),
        underlying: (&str, i32),
        strike: (&str, i32),
        strike_price: Number,
        claim_exchange_rate: Number,
    ) -> Self {
        let collateral_id = Identity::from_label(collateral.0);
        let underlying_id = Identity::from_label(underlying.0);
        let strike_id = Identity::from_label(strike.0);
        let admin = Identity::from_label("admin");
        let assets = AssetRegistry::new(
            (collateral_id, collateral.1),
            (underlying_id, underlying.1),
            (strike_id, strike.1),
        )
        .unwrap();
        let terms = OptionTerms {
            name: name.to_string(),
            symbol: format!("o{}", collateral.0),
            strike_price,
            claim_exchange_rate,
            expiry: EXPIRY,
            exercise_window: WINDOW,
        };
        Self {
            instrument: OptionsInstrument::new(terms, assets, Parameters::default()).unwrap(),
            bank: InMemoryBank::new(),
            clock: FixedClock::at(EXPIRY - 2 * WINDOW),
            oracle: StaticPrices::new(),
            authority: SingleConfigurer(admin),
            collateral: collateral_id,
            underlying: underlying_id,
            admin,
        }
    }

    /// Call on ETH: 18-decimal collateral, 6-decimal underlying, strike 5e-9
    pub fn eth_call() -> Self {
        let eth = ("ETH", -18);
        Self::build("ETH call", eth, ("USDC", -6), eth, Number::new(5, -9), Number::new(1, -6))
    }

    /// Put on SNX: 6-decimal collateral, 18-decimal underlying, strike 375e-9
    pub fn snx_put() -> Self {
        let usdc = ("USDC", -6);
        Self::build("SNX put", usdc, ("SNX", -18), usdc, Number::new(375, -9), Number::new(1, -7))
    }

    /// ETH collateral against a USDC strike, so every ratio needs quotes
    ///
    /// Each claim base unit is worth 1e-3 USDC and costs 1e-3 USDC to
    /// exercise. Quotes start at 2000 for ETH and 1 for USDC.
    pub fn eth_backed_usdc_strike() -> Self {
        let usdc = ("USDC", -6);
        let mut m = Self::build("ETH backed", ("ETH", -18), usdc, usdc, Number::new(1, -3), Number::new(1, -3));
        let (eth_id, usdc_id) = (m.collateral, m.underlying);
        m.oracle.set(eth_id, Number::new(2000, 0));
        m.oracle.set(usdc_id, Number::new(1, 0));
        m
    }

    pub fn exec(&mut self, caller: Identity, instruction: Instruction) -> VaultResult<Outcome> {
        let mut ctx = Context::new(&mut self.bank, &self.clock, &self.oracle, &self.authority);
        process_instruction(&mut self.instrument, &mut ctx, caller, instruction)
    }

    /// Credit `amount` of `asset` to `who` and approve all of it
    pub fn fund(&mut self, asset: AssetId, who: Identity, amount: u128) {
        self.bank.fund(asset, who, amount);
        let allowance = self.bank.allowance(asset, who).saturating_add(amount);
        self.bank.approve(asset, who, allowance);
    }

    /// Open a vault for `owner`, deposit `collateral` and mint `amount` to them
    pub fn write(&mut self, owner: Identity, collateral: u128, amount: u128) -> VaultResult<Outcome> {
        let asset = self.collateral;
        self.fund(asset, owner, collateral);
        self.exec(owner, Instruction::CreateCollateralOption { collateral, amount, recipient: owner })
    }

    pub fn open_window(&mut self) {
        self.clock.set(EXPIRY - WINDOW);
    }

    pub fn expire(&mut self) {
        self.clock.set(EXPIRY);
    }

    pub fn invariants(&self) -> Result<(), InvariantViolation> {
        check_invariants(&self.instrument, &self.oracle)
    }
}

pub fn who(label: &str) -> Identity {
    Identity::from_label(label)
}

/// Scale whole units to base units at `decimals`
pub fn units(amount: u128, decimals: u32) -> u128 {
    amount * 10u128.pow(decimals)
}

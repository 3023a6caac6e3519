//! One instrument and the collaborators it runs against

use anyhow::{Context as _, Result};
use optvault_common::{AssetId, Identity, Number, VaultResult};
use optvault_options::{
    check_invariants, process_instruction, AssetRegistry, Clock, Context, FixedClock, InMemoryBank, Instruction,
    OptionTerms, OptionsInstrument, Outcome, Parameters, SingleConfigurer, StaticPrices,
};

use crate::config::{identity, Config};
use crate::health::{calculate_health, VaultHealth};
use crate::report::Snapshot;

pub struct Session {
    pub instrument: OptionsInstrument,
    pub bank: InMemoryBank,
    pub clock: FixedClock,
    pub oracle: StaticPrices,
    pub authority: SingleConfigurer,
}

impl Session {
    pub fn from_config(config: &Config) -> Result<Self> {
        let assets = AssetRegistry::new(
            (identity(&config.collateral.label), config.collateral.exponent),
            (identity(&config.underlying.label), config.underlying.exponent),
            (identity(&config.strike.label), config.strike.exponent),
        )
        .context("Invalid asset configuration")?;

        let p = &config.parameters;
        let params = Parameters::from_raw(
            u128::from(p.liquidation_incentive),
            u128::from(p.liquidation_factor),
            u128::from(p.transaction_fee),
            u128::from(p.min_collateralization_ratio),
        )
        .context("Invalid initial parameters")?;

        let terms = OptionTerms {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            strike_price: config.strike_price,
            claim_exchange_rate: config.claim_exchange_rate,
            expiry: config.expiry,
            exercise_window: config.exercise_window,
        };
        let instrument = OptionsInstrument::new(terms, assets, params).context("Invalid option terms")?;

        let mut bank = InMemoryBank::new();
        for account in &config.accounts {
            let (asset, owner) = (identity(&account.asset), identity(&account.owner));
            bank.fund(asset, owner, account.amount);
            if account.approve {
                bank.approve(asset, owner, account.amount);
            }
            log::debug!("Funded {} with {} {}", account.owner, account.amount, account.asset);
        }

        let mut oracle = StaticPrices::new();
        for quote in &config.prices {
            oracle.set(identity(&quote.asset), quote.price);
        }

        Ok(Self {
            instrument,
            bank,
            clock: FixedClock::at(config.start_time),
            oracle,
            authority: SingleConfigurer(identity(&config.configurer)),
        })
    }

    /// Run one instruction to completion
    pub fn execute(&mut self, caller: Identity, instruction: Instruction) -> VaultResult<Outcome> {
        let mut ctx = Context::new(&mut self.bank, &self.clock, &self.oracle, &self.authority);
        let result = process_instruction(&mut self.instrument, &mut ctx, caller, instruction);

        if cfg!(debug_assertions) {
            if let Err(violation) = check_invariants(&self.instrument, &self.oracle) {
                log::warn!("Invariant check failed: {}", violation);
            }
        }
        result
    }

    pub fn advance_time(&mut self, seconds: u64) -> u64 {
        self.clock.advance(seconds);
        self.clock.now()
    }

    pub fn set_price(&mut self, asset: AssetId, price: Number) {
        self.oracle.set(asset, price);
    }

    pub fn health(&self) -> VaultResult<Vec<VaultHealth>> {
        calculate_health(&self.instrument, &self.oracle)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

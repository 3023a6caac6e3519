//! One option instrument: its terms, assets, parameters, vaults and claim
//! token

use std::collections::HashMap;

use optvault_common::{Identity, Number, VaultError, VaultResult};
use serde::{Deserialize, Serialize};

use crate::interfaces::PriceOracle;
use crate::pricing::{PricePair, Pricing};
use crate::state::{
    AssetRegistry, ClaimTokenLedger, ParameterStore, Parameters, Vault, VaultRegistry, MAX_EXPONENT_MAGNITUDE,
};

/// Contract terms fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTerms {
    pub name: String,
    pub symbol: String,
    /// Strike-asset canonical units per claim-token base unit
    pub strike_price: Number,
    /// Underlying canonical units delivered per claim-token base unit
    pub claim_exchange_rate: Number,
    /// Unix seconds; nothing can be minted or exercised from this instant on
    pub expiry: u64,
    /// Seconds before expiry during which exercise is open
    pub exercise_window: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsInstrument {
    pub(crate) terms: OptionTerms,
    pub(crate) assets: AssetRegistry,
    pub(crate) params: ParameterStore,
    pub(crate) vaults: VaultRegistry,
    pub(crate) claims: ClaimTokenLedger,
    /// Transaction fees retained from exercises, in collateral base units
    pub(crate) fees_collected: u128,
    /// Underlying a failed exercise could not return, claimable by the holder
    pub(crate) refunds_owed: HashMap<Identity, u128>,
}

impl OptionsInstrument {
    pub fn new(terms: OptionTerms, assets: AssetRegistry, params: Parameters) -> VaultResult<Self> {
        for rate in [terms.strike_price, terms.claim_exchange_rate] {
            if rate.is_zero() || rate.exponent.unsigned_abs() > MAX_EXPONENT_MAGNITUDE.unsigned_abs() {
                return Err(VaultError::InvalidAssetConfig);
            }
        }
        // Hand-built parameters obey the same bounds and exponents as updates
        let checked = Parameters::from_raw(
            params.liquidation_incentive.value,
            params.liquidation_factor.value,
            params.transaction_fee.value,
            params.min_collateralization_ratio.value,
        )?;
        if checked != params {
            return Err(VaultError::InvalidParameter);
        }

        log::info!("Instrument: created {} ({})", terms.name, terms.symbol);
        Ok(Self {
            terms,
            assets,
            params: ParameterStore::new(params),
            vaults: VaultRegistry::new(),
            claims: ClaimTokenLedger::new(),
            fees_collected: 0,
            refunds_owed: HashMap::new(),
        })
    }

    pub fn terms(&self) -> &OptionTerms {
        &self.terms
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn parameters(&self) -> Parameters {
        self.params.snapshot()
    }

    pub fn parameters_version(&self) -> u64 {
        self.params.version()
    }

    pub fn vaults(&self) -> &VaultRegistry {
        &self.vaults
    }

    pub fn claims(&self) -> &ClaimTokenLedger {
        &self.claims
    }

    pub fn fees_collected(&self) -> u128 {
        self.fees_collected
    }

    pub fn refund_owed(&self, holder: &Identity) -> u128 {
        self.refunds_owed.get(holder).copied().unwrap_or(0)
    }

    /// Underlying held in custody for holders rather than vaults
    pub fn refunds_outstanding(&self) -> u128 {
        self.refunds_owed.values().fold(0u128, |acc, v| acc.saturating_add(*v))
    }

    pub fn get_vault(&self, owner: &Identity) -> Option<&Vault> {
        self.vaults.by_owner(owner)
    }

    pub fn has_vault(&self, owner: &Identity) -> bool {
        self.vaults.contains(owner)
    }

    pub fn vault_owners_count(&self) -> usize {
        self.vaults.len()
    }

    pub fn vault_owner_at(&self, index: usize) -> Option<Identity> {
        self.vaults.owner_at(index)
    }

    pub fn claim_balance_of(&self, holder: &Identity) -> u128 {
        self.claims.balance_of(holder)
    }

    /// Most claim tokens `owner`'s vault could have issued at current
    /// collateral, parameters and prices
    pub fn max_issuable(&self, owner: &Identity, oracle: &dyn PriceOracle) -> VaultResult<u128> {
        let vault = self.get_vault(owner).ok_or(VaultError::NoSuchVault)?;
        self.max_issuable_for(vault.collateral, oracle)
    }

    /// Most claim tokens `collateral` base units could back, whether or not
    /// any vault holds them
    pub fn max_issuable_for(&self, collateral: u128, oracle: &dyn PriceOracle) -> VaultResult<u128> {
        let ratio = self.params.snapshot().required_ratio()?;
        self.pricing(oracle)?.max_issuable(collateral, ratio)
    }

    /// Underlying base units a holder must pay to exercise `amount`
    pub fn underlying_required_to_exercise(&self, amount: u128) -> VaultResult<u128> {
        // The exchange rate needs no price, so parity stands in
        self.pricing_with(PricePair::PARITY).underlying_required(amount)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.terms.expiry
    }

    pub fn is_exercise_window(&self, now: u64) -> bool {
        let opens = self.terms.expiry.saturating_sub(self.terms.exercise_window);
        now >= opens && now < self.terms.expiry
    }

    pub(crate) fn ensure_live(&self, now: u64) -> VaultResult<()> {
        if self.is_expired(now) {
            return Err(VaultError::InstrumentExpired);
        }
        Ok(())
    }

    pub(crate) fn pricing(&self, oracle: &dyn PriceOracle) -> VaultResult<Pricing> {
        Ok(self.pricing_with(PricePair::resolve(&self.assets, oracle)?))
    }

    fn pricing_with(&self, prices: PricePair) -> Pricing {
        Pricing {
            collateral_exponent: self.assets.collateral().exponent,
            underlying_exponent: self.assets.underlying().exponent,
            strike_price: self.terms.strike_price,
            claim_exchange_rate: self.terms.claim_exchange_rate,
            prices,
        }
    }
}

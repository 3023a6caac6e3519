//! Ledger-wide invariant checks

use optvault_common::{Identity, VaultError};
use thiserror::Error;

use crate::instrument::OptionsInstrument;
use crate::interfaces::PriceOracle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("issued total {issued} differs from claim supply {supply}")]
    SupplyMismatch { issued: u128, supply: u128 },
    #[error("vault of {0} is below the minimum collateralization ratio")]
    Undercollateralized(Identity),
    #[error("could not evaluate: {0}")]
    Unevaluable(VaultError),
}

/// Check that issued supply matches the claim token and that every vault
/// with issued supply meets the ratio at current prices
///
/// Balances are unsigned, so non-negativity holds by construction. A price
/// move can break the ratio without any operation doing so; callers decide
/// whether that is fatal.
pub fn check_invariants(instrument: &OptionsInstrument, oracle: &dyn PriceOracle) -> Result<(), InvariantViolation> {
    let issued = instrument
        .vaults()
        .total_issued()
        .map_err(|e| InvariantViolation::Unevaluable(e.into()))?;
    let supply = instrument.claims().total_supply();
    if issued != supply {
        return Err(InvariantViolation::SupplyMismatch { issued, supply });
    }

    let mut exposed = instrument.vaults().iter().filter(|v| v.issued > 0).peekable();
    if exposed.peek().is_none() {
        return Ok(());
    }
    let ratio = instrument.parameters().min_collateralization_ratio;
    let pricing = instrument.pricing(oracle).map_err(InvariantViolation::Unevaluable)?;
    for vault in exposed {
        let safe = pricing
            .is_safe(vault.collateral, vault.issued, ratio)
            .map_err(InvariantViolation::Unevaluable)?;
        if !safe {
            return Err(InvariantViolation::Undercollateralized(vault.owner));
        }
    }
    Ok(())
}

//! Replace the risk parameters

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;
use crate::state::Parameters;

/// Raw parameter values at their fixed exponents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterUpdate {
    pub liquidation_incentive: u128,
    pub liquidation_factor: u128,
    pub transaction_fee: u128,
    pub min_collateralization_ratio: u128,
}

/// Process update parameters instruction
///
/// Only the configurer may call this. Raising the minimum ratio or the fee
/// is checked against every vault with issued supply: each must still hold
/// the new required ratio, or the update is rejected with
/// `ParametersUnsafeForVaults`. A vault that passes can settle all of its
/// issued supply, fee included.
///
/// # Returns
/// The new parameter version
pub fn process_update_parameters(
    instrument: &mut OptionsInstrument,
    ctx: &Context<'_>,
    caller: Identity,
    update: ParameterUpdate,
) -> VaultResult<u64> {
    log::debug!("UpdateParameters: requested by {}", caller);

    if !ctx.authority.is_authorized_configurer(&caller) {
        return Err(VaultError::Unauthorized);
    }
    let next = Parameters::from_raw(
        update.liquidation_incentive,
        update.liquidation_factor,
        update.transaction_fee,
        update.min_collateralization_ratio,
    )?;

    let current = instrument.params.snapshot();
    let tightened = next.min_collateralization_ratio.value > current.min_collateralization_ratio.value
        || next.transaction_fee.value > current.transaction_fee.value;
    if tightened {
        let mut exposed = instrument.vaults.iter().filter(|v| v.issued > 0).peekable();
        if exposed.peek().is_some() {
            let required = next.required_ratio()?;
            let pricing = instrument.pricing(ctx.oracle)?;
            for vault in exposed {
                if !pricing.is_safe(vault.collateral, vault.issued, required)? {
                    log::debug!("UpdateParameters: vault of {} cannot cover ratio {}", vault.owner, required);
                    return Err(VaultError::ParametersUnsafeForVaults);
                }
            }
        }
    }

    let version = instrument.params.replace(next);
    log::info!(
        "UpdateParameters: version {} ratio {} fee {}",
        version,
        next.min_collateralization_ratio,
        next.transaction_fee
    );
    Ok(version)
}

//! Deposit collateral into the caller's vault

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;

/// Process add collateral instruction
///
/// Pulls `amount` of the collateral asset from `owner` into custody and
/// credits the vault. Deposits only improve the ratio, so no check against
/// the issued supply is made.
///
/// # Returns
/// The vault's collateral after the deposit
pub fn process_add_collateral(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    owner: Identity,
    amount: u128,
) -> VaultResult<u128> {
    log::debug!("AddCollateral: {} deposits {}", owner, amount);

    instrument.ensure_live(ctx.clock.now())?;
    let (handle, mut vault) = instrument.vaults.checkout(&owner)?;
    vault.deposit(amount)?;

    if amount > 0 {
        let asset = instrument.assets.collateral().id;
        ctx.bank.transfer_in(asset, owner, amount).map_err(|e| {
            log::debug!("AddCollateral: pull failed: {}", e);
            VaultError::CollateralTransferFailed
        })?;
    }
    instrument.vaults.store(handle, vault);

    log::info!("AddCollateral: {} now holds {}", owner, vault.collateral);
    Ok(vault.collateral)
}

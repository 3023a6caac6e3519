//! Withdraw collateral from the caller's vault

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;

/// Process remove collateral instruction
///
/// Allowed after expiry. While the vault has issued supply the remaining
/// collateral must still satisfy the minimum collateralization ratio.
///
/// # Returns
/// The vault's collateral after the withdrawal
pub fn process_remove_collateral(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    owner: Identity,
    amount: u128,
) -> VaultResult<u128> {
    log::debug!("RemoveCollateral: {} withdraws {}", owner, amount);

    let (handle, mut vault) = instrument.vaults.checkout(&owner)?;
    vault.withdraw(amount)?;

    if vault.issued > 0 {
        let ratio = instrument.params.snapshot().required_ratio()?;
        let pricing = instrument.pricing(ctx.oracle)?;
        if !pricing.is_safe(vault.collateral, vault.issued, ratio)? {
            log::debug!("RemoveCollateral: would leave {} issued undercollateralized", vault.issued);
            return Err(VaultError::UndercollateralizedWithdrawal);
        }
    }

    if amount > 0 {
        let asset = instrument.assets.collateral().id;
        ctx.bank.transfer_out(asset, owner, amount).map_err(|e| {
            log::debug!("RemoveCollateral: payout failed: {}", e);
            VaultError::CollateralTransferFailed
        })?;
    }
    instrument.vaults.store(handle, vault);

    log::info!("RemoveCollateral: {} now holds {}", owner, vault.collateral);
    Ok(vault.collateral)
}

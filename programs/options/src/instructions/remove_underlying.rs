//! Pay a vault's accumulated underlying out to its owner

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;

/// Process remove underlying instruction; allowed after expiry
///
/// # Returns
/// The amount of underlying paid out
pub fn process_remove_underlying(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    owner: Identity,
) -> VaultResult<u128> {
    log::debug!("RemoveUnderlying: owner {}", owner);

    let (handle, mut vault) = instrument.vaults.checkout(&owner)?;
    let amount = vault.underlying;
    if amount == 0 {
        return Err(VaultError::NothingToWithdraw);
    }

    let asset = instrument.assets.underlying().id;
    ctx.bank.transfer_out(asset, owner, amount).map_err(|e| {
        log::debug!("RemoveUnderlying: payout failed: {}", e);
        VaultError::UnderlyingTransferFailed
    })?;
    vault.underlying = 0;
    instrument.vaults.store(handle, vault);

    log::info!("RemoveUnderlying: paid {} to {}", amount, owner);
    Ok(amount)
}

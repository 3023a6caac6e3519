//! Sweep retained transaction fees to the configurer

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;

/// Process withdraw fees instruction
///
/// # Returns
/// The collateral paid to `caller`
pub fn process_withdraw_fees(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    caller: Identity,
) -> VaultResult<u128> {
    log::debug!("WithdrawFees: requested by {}", caller);

    if !ctx.authority.is_authorized_configurer(&caller) {
        return Err(VaultError::Unauthorized);
    }
    let amount = instrument.fees_collected;
    if amount == 0 {
        return Err(VaultError::NothingToWithdraw);
    }

    let asset = instrument.assets.collateral().id;
    ctx.bank.transfer_out(asset, caller, amount).map_err(|e| {
        log::debug!("WithdrawFees: payout failed: {}", e);
        VaultError::CollateralTransferFailed
    })?;
    instrument.fees_collected = 0;

    log::info!("WithdrawFees: swept {} to {}", amount, caller);
    Ok(amount)
}

//! Return underlying a failed exercise could not send back

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;

/// Process claim refund instruction; allowed after expiry
///
/// # Returns
/// The underlying paid back to `holder`
pub fn process_claim_refund(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    holder: Identity,
) -> VaultResult<u128> {
    log::debug!("ClaimRefund: holder {}", holder);

    let amount = instrument.refund_owed(&holder);
    if amount == 0 {
        return Err(VaultError::NothingToWithdraw);
    }

    let asset = instrument.assets.underlying().id;
    ctx.bank.transfer_out(asset, holder, amount).map_err(|e| {
        log::debug!("ClaimRefund: payout failed: {}", e);
        VaultError::UnderlyingTransferFailed
    })?;
    instrument.refunds_owed.remove(&holder);

    log::info!("ClaimRefund: returned {} underlying to {}", amount, holder);
    Ok(amount)
}

//! Move claim tokens between holders

use optvault_common::{Identity, VaultResult};

use crate::instrument::OptionsInstrument;

/// Process claim token transfer instruction; supply is unchanged
pub fn process_transfer(
    instrument: &mut OptionsInstrument,
    from: Identity,
    to: Identity,
    amount: u128,
) -> VaultResult<()> {
    log::debug!("Transfer: {} -> {} amount {}", from, to, amount);
    instrument.claims.transfer(from, to, amount)?;
    log::info!("Transfer: {} claim tokens {} -> {}", amount, from, to);
    Ok(())
}

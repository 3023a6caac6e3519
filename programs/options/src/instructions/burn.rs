//! Burn held claim tokens to retire a vault's issued supply

use optvault_common::{Identity, VaultResult};

use crate::instrument::OptionsInstrument;

/// Process burn instruction
///
/// `owner` must hold `amount` claim tokens and its vault must have issued at
/// least that many. Allowed after expiry.
///
/// # Returns
/// The vault's issued supply after the burn
pub fn process_burn(instrument: &mut OptionsInstrument, owner: Identity, amount: u128) -> VaultResult<u128> {
    log::debug!("Burn: {} burns {}", owner, amount);

    let (handle, mut vault) = instrument.vaults.checkout(&owner)?;
    vault.retire(amount)?;
    instrument.claims.burn(owner, amount)?;
    instrument.vaults.store(handle, vault);

    log::info!("Burn: {} retired {} (issued {})", owner, amount, vault.issued);
    Ok(vault.issued)
}

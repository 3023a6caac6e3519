//! Issue claim tokens against a vault

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;

/// Process mint instruction
///
/// Raises `owner`'s issued supply by `amount` and credits the tokens to
/// `recipient`, which may be another party. The new issued total must not
/// exceed what the vault's collateral can back at the minimum ratio. Minting
/// zero succeeds without effect.
///
/// # Returns
/// The vault's issued supply after the mint
pub fn process_mint(
    instrument: &mut OptionsInstrument,
    ctx: &Context<'_>,
    owner: Identity,
    amount: u128,
    recipient: Identity,
) -> VaultResult<u128> {
    log::debug!("Mint: {} issues {} to {}", owner, amount, recipient);

    instrument.ensure_live(ctx.clock.now())?;
    let (handle, mut vault) = instrument.vaults.checkout(&owner)?;
    if amount == 0 {
        return Ok(vault.issued);
    }

    let ratio = instrument.params.snapshot().required_ratio()?;
    let max = instrument.pricing(ctx.oracle)?.max_issuable(vault.collateral, ratio)?;
    vault.issue(amount)?;
    if vault.issued > max {
        log::debug!("Mint: {} exceeds limit {}", vault.issued, max);
        return Err(VaultError::ExceedsCollateralizationLimit);
    }

    instrument.claims.mint(recipient, amount)?;
    instrument.vaults.store(handle, vault);

    log::info!("Mint: {} issued {} (total {})", owner, amount, vault.issued);
    Ok(vault.issued)
}

//! Open (if needed), fund and mint against a vault in one step

use optvault_common::{Identity, VaultError, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;
use crate::state::{Vault, VaultHandle};

/// Process create collateral option instruction
///
/// Equivalent to open vault (skipped when one exists), add collateral and
/// mint, applied as one operation. All ledger checks run first, then the
/// collateral is pulled, and only then is anything written.
///
/// # Returns
/// The vault handle and its issued supply after the mint
pub fn process_create_collateral_option(
    instrument: &mut OptionsInstrument,
    ctx: &mut Context<'_>,
    owner: Identity,
    collateral: u128,
    amount: u128,
    recipient: Identity,
) -> VaultResult<(VaultHandle, u128)> {
    log::debug!(
        "CreateCollateralOption: {} deposits {} and issues {} to {}",
        owner,
        collateral,
        amount,
        recipient
    );

    instrument.ensure_live(ctx.clock.now())?;
    let existing = instrument.vaults.handle_of(&owner);
    let mut vault = match existing {
        Some(h) => instrument.vaults.get(h).copied().ok_or(VaultError::NoSuchVault)?,
        None => Vault::new(owner),
    };

    vault.deposit(collateral)?;
    if amount > 0 {
        let ratio = instrument.params.snapshot().required_ratio()?;
        let max = instrument.pricing(ctx.oracle)?.max_issuable(vault.collateral, ratio)?;
        vault.issue(amount)?;
        if vault.issued > max {
            return Err(VaultError::ExceedsCollateralizationLimit);
        }
        instrument.claims.can_mint(&recipient, amount)?;
    }

    if collateral > 0 {
        let asset = instrument.assets.collateral().id;
        ctx.bank.transfer_in(asset, owner, collateral).map_err(|e| {
            log::debug!("CreateCollateralOption: pull failed: {}", e);
            VaultError::CollateralTransferFailed
        })?;
    }

    let handle = match existing {
        Some(h) => h,
        None => instrument.vaults.open(owner)?,
    };
    instrument.vaults.store(handle, vault);
    if amount > 0 {
        instrument.claims.mint(recipient, amount)?;
    }

    log::info!(
        "CreateCollateralOption: vault #{} holds {} with {} issued",
        handle.index(),
        vault.collateral,
        vault.issued
    );
    Ok((handle, vault.issued))
}

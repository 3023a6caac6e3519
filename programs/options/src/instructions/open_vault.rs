//! Open an empty vault for the caller

use optvault_common::{Identity, VaultResult};

use crate::instrument::OptionsInstrument;
use crate::interfaces::Context;
use crate::state::VaultHandle;

/// Process open vault instruction
///
/// Creates a zeroed vault for `owner` and appends it to the registry. One
/// vault per owner; reopening fails with `VaultAlreadyExists`.
pub fn process_open_vault(
    instrument: &mut OptionsInstrument,
    ctx: &Context<'_>,
    owner: Identity,
) -> VaultResult<VaultHandle> {
    log::debug!("OpenVault: owner {}", owner);

    instrument.ensure_live(ctx.clock.now())?;
    let handle = instrument.vaults.open(owner)?;

    log::info!("OpenVault: vault #{} opened for {}", handle.index(), owner);
    Ok(handle)
}

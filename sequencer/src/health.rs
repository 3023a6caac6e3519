//! Collateral health for every vault with issued supply

use optvault_common::{Identity, VaultResult};
use optvault_options::{OptionsInstrument, PriceOracle};
use serde::Serialize;

/// Health snapshot of one vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultHealth {
    pub owner: Identity,
    #[serde(with = "fixed_math::serde_amount")]
    pub collateral: u128,
    #[serde(with = "fixed_math::serde_amount")]
    pub issued: u128,
    /// Issued supply the collateral supports at current prices
    #[serde(with = "fixed_math::serde_amount")]
    pub max_issuable: u128,
    /// Claim tokens that could still be minted; zero when undercollateralized
    #[serde(with = "fixed_math::serde_amount")]
    pub headroom: u128,
    pub safe: bool,
}

/// Health of every vault, lowest headroom first
///
/// Vaults with nothing issued are included; they are always safe.
pub fn calculate_health(instrument: &OptionsInstrument, oracle: &dyn PriceOracle) -> VaultResult<Vec<VaultHealth>> {
    let mut out = Vec::with_capacity(instrument.vault_owners_count());
    for vault in instrument.vaults().iter() {
        let max_issuable = instrument.max_issuable(&vault.owner, oracle)?;
        out.push(VaultHealth {
            owner: vault.owner,
            collateral: vault.collateral,
            issued: vault.issued,
            max_issuable,
            headroom: max_issuable.saturating_sub(vault.issued),
            safe: vault.issued <= max_issuable,
        });
    }
    out.sort_by_key(|h| (h.safe, h.headroom));
    Ok(out)
}

/// Vaults that no longer hold the ratio required to mint
pub fn undercollateralized(health: &[VaultHealth]) -> impl Iterator<Item = &VaultHealth> {
    health.iter().filter(|h| !h.safe)
}

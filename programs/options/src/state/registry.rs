//! Vault registry: arena of vault records keyed by stable handles

use std::collections::HashMap;

use fixed_math::{sum_u128, MathResult};
use optvault_common::{Identity, VaultError, VaultResult};

use super::vault::Vault;

/// Stable index of a vault in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultHandle(u32);

impl VaultHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Vaults in creation order plus an owner index
///
/// Records are only ever appended, so arena order is creation order and a
/// handle stays valid for the life of the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultRegistry {
    vaults: Vec<Vault>,
    by_owner: HashMap<Identity, VaultHandle>,
}

impl VaultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a zeroed vault for `owner`
    pub fn open(&mut self, owner: Identity) -> VaultResult<VaultHandle> {
        if self.by_owner.contains_key(&owner) {
            return Err(VaultError::VaultAlreadyExists);
        }
        let raw = u32::try_from(self.vaults.len()).map_err(|_| VaultError::ArithmeticOverflow)?;
        let handle = VaultHandle(raw);
        self.vaults.push(Vault::new(owner));
        self.by_owner.insert(owner, handle);
        Ok(handle)
    }

    pub fn handle_of(&self, owner: &Identity) -> Option<VaultHandle> {
        self.by_owner.get(owner).copied()
    }

    /// Handle for `owner`, or `NoSuchVault`
    pub fn require(&self, owner: &Identity) -> VaultResult<VaultHandle> {
        self.handle_of(owner).ok_or(VaultError::NoSuchVault)
    }

    /// Handle and a working copy of `owner`'s vault
    ///
    /// Handlers mutate the copy and [`VaultRegistry::store`] it only once
    /// every check has passed.
    pub fn checkout(&self, owner: &Identity) -> VaultResult<(VaultHandle, Vault)> {
        let handle = self.require(owner)?;
        let vault = self.get(handle).copied().ok_or(VaultError::NoSuchVault)?;
        Ok((handle, vault))
    }

    pub fn contains(&self, owner: &Identity) -> bool {
        self.by_owner.contains_key(owner)
    }

    pub fn get(&self, handle: VaultHandle) -> Option<&Vault> {
        self.vaults.get(handle.index())
    }

    pub fn by_owner(&self, owner: &Identity) -> Option<&Vault> {
        self.handle_of(owner).and_then(|h| self.get(h))
    }

    /// Overwrite a vault record with a fully validated copy
    pub(crate) fn store(&mut self, handle: VaultHandle, vault: Vault) {
        if let Some(slot) = self.vaults.get_mut(handle.index()) {
            *slot = vault;
        }
    }

    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    pub fn owner_at(&self, index: usize) -> Option<Identity> {
        self.vaults.get(index).map(|v| v.owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vault> {
        self.vaults.iter()
    }

    pub fn total_issued(&self) -> MathResult<u128> {
        sum_u128(self.vaults.iter().map(|v| v.issued))
    }
}

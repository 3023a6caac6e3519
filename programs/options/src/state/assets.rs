//! Asset roles and their decimal exponents, fixed at instrument creation

use optvault_common::{AssetId, AssetRole, VaultError, VaultResult};
use serde::{Deserialize, Serialize};

/// Largest exponent magnitude accepted for any asset
pub const MAX_EXPONENT_MAGNITUDE: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub role: AssetRole,
    pub id: AssetId,
    /// Power of ten of one base unit relative to the canonical unit
    pub exponent: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistry {
    collateral: AssetDescriptor,
    underlying: AssetDescriptor,
    strike: AssetDescriptor,
}

impl AssetRegistry {
    /// Build the registry, rejecting exponents beyond [`MAX_EXPONENT_MAGNITUDE`]
    pub fn new(
        collateral: (AssetId, i32),
        underlying: (AssetId, i32),
        strike: (AssetId, i32),
    ) -> VaultResult<Self> {
        let describe = |role, (id, exponent): (AssetId, i32)| -> VaultResult<AssetDescriptor> {
            if exponent.unsigned_abs() > MAX_EXPONENT_MAGNITUDE.unsigned_abs() {
                log::debug!("AssetRegistry: {} exponent {} out of range", role, exponent);
                return Err(VaultError::InvalidAssetConfig);
            }
            Ok(AssetDescriptor { role, id, exponent })
        };

        Ok(Self {
            collateral: describe(AssetRole::Collateral, collateral)?,
            underlying: describe(AssetRole::Underlying, underlying)?,
            strike: describe(AssetRole::Strike, strike)?,
        })
    }

    pub fn get(&self, role: AssetRole) -> &AssetDescriptor {
        match role {
            AssetRole::Collateral => &self.collateral,
            AssetRole::Underlying => &self.underlying,
            AssetRole::Strike => &self.strike,
        }
    }

    pub fn collateral(&self) -> &AssetDescriptor {
        &self.collateral
    }

    pub fn underlying(&self) -> &AssetDescriptor {
        &self.underlying
    }

    pub fn strike(&self) -> &AssetDescriptor {
        &self.strike
    }

    /// Collateral and strike are the same asset, so no price is needed
    pub fn collateral_is_strike(&self) -> bool {
        self.collateral.id == self.strike.id
    }
}

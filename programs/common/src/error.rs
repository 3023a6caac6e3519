//! Error kinds shared by every vault and settlement operation

use fixed_math::MathError;
use thiserror::Error;

/// Typed failure for a vault, mint, exercise or parameter operation
///
/// Every failure is terminal for the operation that raised it; no state is
/// committed when one of these is returned, except that
/// `UnderlyingRefundFailed` records the refund owed to the holder.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("vault already exists for this owner")]
    VaultAlreadyExists = 0,
    #[error("no vault for this owner")]
    NoSuchVault = 1,
    #[error("insufficient collateral in vault")]
    InsufficientCollateral = 2,
    #[error("withdrawal would leave the vault undercollateralized")]
    UndercollateralizedWithdrawal = 3,
    #[error("mint exceeds the collateralization limit")]
    ExceedsCollateralizationLimit = 4,
    #[error("insufficient claim token balance")]
    InsufficientClaimTokenBalance = 5,
    #[error("underlying transfer from holder failed")]
    UnderlyingTransferFailed = 6,
    #[error("listed vaults cannot cover the exercised amount")]
    InsufficientVaultCoverage = 7,
    #[error("arithmetic overflow")]
    ArithmeticOverflow = 8,
    #[error("caller is not authorized")]
    Unauthorized = 9,
    #[error("instrument has expired")]
    InstrumentExpired = 10,
    #[error("exercise window is not open")]
    OutsideExerciseWindow = 11,
    #[error("price unavailable for asset")]
    PriceUnavailable = 12,
    #[error("parameter out of bounds")]
    InvalidParameter = 13,
    #[error("invalid asset configuration")]
    InvalidAssetConfig = 14,
    #[error("parameter update would leave existing vaults undercollateralized")]
    ParametersUnsafeForVaults = 15,
    #[error("collateral transfer failed")]
    CollateralTransferFailed = 16,
    #[error("burn exceeds the vault's issued amount")]
    InsufficientIssued = 17,
    #[error("nothing to withdraw")]
    NothingToWithdraw = 18,
    #[error("collateral payout failed and the underlying refund is held for the holder")]
    UnderlyingRefundFailed = 19,
}

impl VaultError {
    /// Stable numeric code, suitable for wire responses and logs
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<MathError> for VaultError {
    fn from(_: MathError) -> Self {
        VaultError::ArithmeticOverflow
    }
}

pub type VaultResult<T> = Result<T, VaultError>;

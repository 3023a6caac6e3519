/// Instrument instruction handlers
///
/// Each handler validates everything against working copies before it moves
/// assets, and writes the ledger only after every transfer succeeded.

pub mod add_collateral;
pub mod burn;
pub mod claim_refund;
pub mod create_option;
pub mod exercise;
pub mod mint;
pub mod open_vault;
pub mod remove_collateral;
pub mod remove_underlying;
pub mod transfer;
pub mod update_parameters;
pub mod withdraw_fees;

pub use add_collateral::*;
pub use burn::*;
pub use claim_refund::*;
pub use create_option::*;
pub use exercise::*;
pub use mint::*;
pub use open_vault::*;
pub use remove_collateral::*;
pub use remove_underlying::*;
pub use transfer::*;
pub use update_parameters::*;
pub use withdraw_fees::*;

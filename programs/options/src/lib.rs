//! Collateralized option vault ledger and exercise settlement
//!
//! Vault owners lock collateral and mint claim tokens up to a minimum
//! collateralization ratio. Holders exercise claim tokens by paying the
//! underlying asset and receive collateral from a caller-ordered list of
//! vaults.

pub mod bank;
pub mod entrypoint;
pub mod instructions;
pub mod instrument;
pub mod interfaces;
pub mod invariants;
pub mod pricing;
pub mod state;

pub use bank::InMemoryBank;
pub use entrypoint::{process_instruction, Instruction, Outcome};
pub use instructions::*;
pub use instrument::*;
pub use interfaces::*;
pub use invariants::*;
pub use state::*;

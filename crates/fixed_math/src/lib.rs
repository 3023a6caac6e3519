//! Exponent-aware fixed-point arithmetic for multi-asset accounting
//! No panics, no silent wraparound: every operation is checked

pub mod error;
pub mod math;
pub mod number;
pub mod serde_amount;
pub mod wide;

// Re-export commonly used types
pub use error::*;
pub use math::*;
pub use number::*;

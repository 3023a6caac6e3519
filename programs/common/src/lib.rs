pub mod types;
pub mod error;

pub use types::*;
pub use error::*;

pub use fixed_math::{Number, Rounding};

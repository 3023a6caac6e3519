pub mod assets;
pub mod claim_token;
pub mod params;
pub mod registry;
pub mod vault;

pub use assets::*;
pub use claim_token::*;
pub use params::*;
pub use registry::*;
pub use vault::*;

pub mod constants;
pub mod errors;
pub mod types;

pub use constants::*;
pub use types::*;

#![forbid(unsafe_code)]

mod ids;
mod patch;
mod types;

pub use ids::*;
pub use patch::*;
pub use types::*;

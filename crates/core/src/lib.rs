#![forbid(unsafe_code)]

pub mod outline;
pub mod sheet;
pub mod text;

pub use sheet::*;

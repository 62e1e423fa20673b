#![forbid(unsafe_code)]

use thiserror::Error;

/// Prefix of every preflight rejection message.
pub const RESET_REQUIRED: &str = "RESET_REQUIRED";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("record not found")]
    NotFound,
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQL",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidParameter(message) if message.starts_with(RESET_REQUIRED) => {
                RESET_REQUIRED
            }
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

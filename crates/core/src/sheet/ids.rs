#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Row identifier of a sheet. Always strictly positive, as SQLite hands out
/// rowids starting from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SheetId(i64);

impl SheetId {
    pub fn try_new(value: i64) -> Result<Self, SheetIdError> {
        if value <= 0 {
            return Err(SheetIdError::NotPositive(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for SheetId {
    type Error = SheetIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<SheetId> for i64 {
    fn from(value: SheetId) -> Self {
        value.0
    }
}

impl FromStr for SheetId {
    type Err = SheetIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let raw = value
            .trim()
            .parse::<i64>()
            .map_err(|_| SheetIdError::NotANumber(value.to_string()))?;
        Self::try_new(raw)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SheetIdError {
    #[error("sheet id must be positive, got {0}")]
    NotPositive(i64),
    #[error("sheet id is not a number: {0:?}")]
    NotANumber(String),
}

impl SheetIdError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotPositive(_) => "sheet id must be positive",
            Self::NotANumber(_) => "sheet id is not a number",
        }
    }
}

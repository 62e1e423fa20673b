#![forbid(unsafe_code)]

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the identifier column. It is never part of a patch.
pub const ID_COLUMN: &str = "id";

/// Name of the update timestamp. The store always refreshes it itself, so a
/// patch silently ignores it.
pub const UPDATED_AT_COLUMN: &str = "updated_at_ms";

/// Every column of the sheet table that a bulk update may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SheetColumn {
    StatusCode,
    SortOrder,
    Indent,
    VersionCode,
    DnaCode,
    Title,
    Badge,
    Synopsis,
    Content,
    CharCount,
    WordCount,
    CreatedAtMs,
    ContentAtMs,
    Deleted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Text { nullable: bool },
    Flag,
}

impl SheetColumn {
    pub const ALL: [SheetColumn; 14] = [
        SheetColumn::StatusCode,
        SheetColumn::SortOrder,
        SheetColumn::Indent,
        SheetColumn::VersionCode,
        SheetColumn::DnaCode,
        SheetColumn::Title,
        SheetColumn::Badge,
        SheetColumn::Synopsis,
        SheetColumn::Content,
        SheetColumn::CharCount,
        SheetColumn::WordCount,
        SheetColumn::CreatedAtMs,
        SheetColumn::ContentAtMs,
        SheetColumn::Deleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StatusCode => "status_code",
            Self::SortOrder => "sort_order",
            Self::Indent => "indent",
            Self::VersionCode => "version_code",
            Self::DnaCode => "dna_code",
            Self::Title => "title",
            Self::Badge => "badge",
            Self::Synopsis => "synopsis",
            Self::Content => "content",
            Self::CharCount => "char_count",
            Self::WordCount => "word_count",
            Self::CreatedAtMs => "created_at_ms",
            Self::ContentAtMs => "content_at_ms",
            Self::Deleted => "deleted",
        }
    }

    pub fn parse(name: &str) -> Result<Self, PatchError> {
        let name = name.trim();
        if name == ID_COLUMN {
            return Err(PatchError::ImmutableColumn);
        }
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == name)
            .ok_or_else(|| PatchError::UnknownColumn(name.to_string()))
    }

    fn kind(self) -> ColumnKind {
        match self {
            Self::Title => ColumnKind::Text { nullable: false },
            Self::StatusCode | Self::Badge | Self::Synopsis | Self::Content => {
                ColumnKind::Text { nullable: true }
            }
            Self::Deleted => ColumnKind::Flag,
            Self::SortOrder
            | Self::Indent
            | Self::VersionCode
            | Self::DnaCode
            | Self::CharCount
            | Self::WordCount
            | Self::CreatedAtMs
            | Self::ContentAtMs => ColumnKind::Integer,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetValue {
    Integer(i64),
    Text(String),
    Bool(bool),
    Null,
}

impl From<i64> for SheetValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for SheetValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SheetValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SheetValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("the identifier column cannot be updated")]
    ImmutableColumn,
    #[error("unknown sheet column: {0}")]
    UnknownColumn(String),
    #[error("value does not fit column {column}")]
    TypeMismatch { column: &'static str },
    #[error("patch must be a JSON object")]
    NotAnObject,
}

impl PatchError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ImmutableColumn => "the identifier column cannot be updated",
            Self::UnknownColumn(_) => "unknown sheet column",
            Self::TypeMismatch { .. } => "value does not fit column",
            Self::NotAnObject => "patch must be a JSON object",
        }
    }
}

/// Column-to-value mapping for a bulk sheet update.
///
/// The identifier is not representable as a [`SheetColumn`], so a patch can
/// never rewrite it. Setting the same column twice keeps the last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetPatch {
    values: BTreeMap<SheetColumn, SheetValue>,
}

impl SheetPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        column: SheetColumn,
        value: impl Into<SheetValue>,
    ) -> Result<&mut Self, PatchError> {
        let value = normalize(column, value.into())?;
        self.values.insert(column, value);
        Ok(self)
    }

    pub fn with(
        mut self,
        column: SheetColumn,
        value: impl Into<SheetValue>,
    ) -> Result<Self, PatchError> {
        self.set(column, value)?;
        Ok(self)
    }

    /// Builds a patch from a JSON object keyed by column name.
    pub fn from_json(value: &Value) -> Result<Self, PatchError> {
        let Some(object) = value.as_object() else {
            return Err(PatchError::NotAnObject);
        };

        let mut patch = Self::new();
        for (name, raw) in object {
            if name.trim() == UPDATED_AT_COLUMN {
                continue;
            }
            let column = SheetColumn::parse(name)?;
            let value = match raw {
                Value::Null => SheetValue::Null,
                Value::Bool(flag) => SheetValue::Bool(*flag),
                Value::String(text) => SheetValue::Text(text.clone()),
                Value::Number(number) => match number.as_i64() {
                    Some(integer) => SheetValue::Integer(integer),
                    None => {
                        return Err(PatchError::TypeMismatch {
                            column: column.as_str(),
                        });
                    }
                },
                Value::Array(_) | Value::Object(_) => {
                    return Err(PatchError::TypeMismatch {
                        column: column.as_str(),
                    });
                }
            };
            patch.set(column, value)?;
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, column: SheetColumn) -> Option<&SheetValue> {
        self.values.get(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SheetColumn, &SheetValue)> {
        self.values.iter().map(|(column, value)| (*column, value))
    }
}

fn normalize(column: SheetColumn, value: SheetValue) -> Result<SheetValue, PatchError> {
    let mismatch = PatchError::TypeMismatch {
        column: column.as_str(),
    };
    match (column.kind(), value) {
        (ColumnKind::Integer, SheetValue::Integer(v)) => Ok(SheetValue::Integer(v)),
        (ColumnKind::Text { .. }, SheetValue::Text(v)) => Ok(SheetValue::Text(v)),
        (ColumnKind::Text { nullable: true }, SheetValue::Null) => Ok(SheetValue::Null),
        (ColumnKind::Flag, SheetValue::Bool(v)) => Ok(SheetValue::Bool(v)),
        (ColumnKind::Flag, SheetValue::Integer(0)) => Ok(SheetValue::Bool(false)),
        (ColumnKind::Flag, SheetValue::Integer(1)) => Ok(SheetValue::Bool(true)),
        _ => Err(mismatch),
    }
}

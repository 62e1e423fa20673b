#![forbid(unsafe_code)]

use super::SheetId;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Lineage code of a sheet that has never been versioned.
pub const DNA_UNASSIGNED: i64 = 0;

/// Title given to a freshly created sheet.
pub const NEW_SHEET_TITLE: &str = "new";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRecord {
    pub id: SheetId,
    pub status_code: Option<String>,
    pub sort_order: i64,
    pub indent: i64,
    pub version_code: i64,
    pub dna_code: i64,
    pub title: String,
    pub badge: Option<String>,
    pub synopsis: Option<String>,
    pub content: Option<String>,
    pub char_count: i64,
    pub word_count: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
    pub content_at_ms: i64,
    pub deleted: bool,
}

impl SheetRecord {
    pub fn counts(&self) -> Counts {
        Counts {
            chars: self.char_count,
            words: self.word_count,
        }
    }

    pub fn has_lineage(&self) -> bool {
        self.dna_code != DNA_UNASSIGNED
    }
}

/// Stored character and word counts of one sheet, or the sum over several.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub chars: i64,
    pub words: i64,
}

impl Counts {
    pub fn new(chars: i64, words: i64) -> Self {
        Self { chars, words }
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            chars: self.chars.saturating_add(rhs.chars),
            words: self.words.saturating_add(rhs.words),
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Counts) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), Add::add)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetProperty {
    pub name: String,
    pub value: String,
}

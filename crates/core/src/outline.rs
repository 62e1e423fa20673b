#![forbid(unsafe_code)]

//! Outline structure derived from sort order and indent.
//!
//! Sheets carry no parent pointer. Ordered by sort order, the children of a
//! sheet are the contiguous run of following sheets whose indent is strictly
//! greater than its own; the first sheet at the same or a shallower indent
//! ends the run.

use crate::{Counts, SheetId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineRow {
    pub id: SheetId,
    pub indent: i64,
    pub counts: Counts,
}

/// Incremental child-run scanner fed with the rows that follow the parent,
/// in sort order.
#[derive(Debug)]
pub struct ChildRun {
    parent_indent: i64,
    rows: Vec<OutlineRow>,
    closed: bool,
}

impl ChildRun {
    pub fn new(parent_indent: i64) -> Self {
        Self {
            parent_indent,
            rows: Vec::new(),
            closed: false,
        }
    }

    /// Offers the next row. Returns `false` once the run has ended; callers
    /// stop feeding rows at that point.
    pub fn push(&mut self, row: OutlineRow) -> bool {
        if self.closed {
            return false;
        }
        if row.indent <= self.parent_indent {
            self.closed = true;
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn ids(&self) -> Vec<SheetId> {
        self.rows.iter().map(|row| row.id).collect()
    }

    pub fn counts(&self) -> Counts {
        self.rows.iter().map(|row| row.counts).sum()
    }
}

pub fn child_run(
    parent_indent: i64,
    following: impl IntoIterator<Item = OutlineRow>,
) -> ChildRun {
    let mut run = ChildRun::new(parent_indent);
    for row in following {
        if !run.push(row) {
            break;
        }
    }
    run
}

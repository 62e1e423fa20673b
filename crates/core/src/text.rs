#![forbid(unsafe_code)]

use crate::Counts;

/// Simple character and word counts for a sheet body.
///
/// Characters are Unicode scalar values; words are runs of non-whitespace.
pub fn count_text(content: &str) -> Counts {
    let chars = content.chars().count();
    let words = content.split_whitespace().count();
    Counts::new(to_i64(chars), to_i64(words))
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

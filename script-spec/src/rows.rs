//! Reading table rows from text.
//!
//! Tables are stored one row per line with cells separated by tabs, which
//! is what you get when copying a rendered table out of a browser. Empty
//! lines and lines starting with `#` are ignored.

use std::ops::Deref;

const CELL_SEPARATOR: char = '\t';
const COMMENT: char = '#';

/// One row of a table, and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row<'a> {
    /// 1-based line number in the source text.
    pub line: usize,
    pub cells: Vec<&'a str>,
}

impl<'a> Deref for Row<'a> {
    type Target = [&'a str];
    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

/// Iterate over the rows in `text`.
///
/// Cells are returned untrimmed; trimming is the normalizer's job.
pub fn parse_rows(text: &str) -> impl Iterator<Item = Row<'_>> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with(COMMENT)
        })
        .map(|(number, line)| Row {
            line: number + 1,
            cells: line.split(CELL_SEPARATOR).collect(),
        })
}

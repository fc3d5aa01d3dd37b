//! Accumulating normalized rows into a [`Specification`].

use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    normalize::{normalize, Normalized, RowStatus},
    opcode::{Opcode, Specification},
    rows::Row,
};

/// What to do when a row produces an opcode that is already defined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CollisionPolicy {
    /// Replace the earlier opcode without reporting anything.
    Overwrite,
    /// Replace the earlier opcode and report a [`Diagnostic::Collision`].
    #[default]
    Warn,
    /// Keep the earlier opcode and report a [`Diagnostic::Collision`].
    KeepFirst,
}

/// Counts of what happened during a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub rows: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub collisions: usize,
}

/// Builds a [`Specification`] from table rows, in document order.
///
/// ```
/// use script_spec::{CollisionPolicy, SpecBuilder};
///
/// let mut diagnostics: Vec<script_spec::Diagnostic> = Vec::new();
/// let mut builder = SpecBuilder::new(&mut diagnostics, CollisionPolicy::Warn);
/// builder.add_row(&["OP_DUP", "118", "0x76", "x", "x x", "Duplicates the top stack item."]);
/// builder.add_row(&["Word", "Opcode", "Hex", "Input", "Output", "Description"]);
/// let (spec, summary) = builder.finish();
///
/// assert_eq!(spec.get("OP_DUP").unwrap().code, "0x76");
/// assert_eq!(summary.skipped, 1);
/// assert_eq!(diagnostics.len(), 1);
/// ```
pub struct SpecBuilder<D> {
    spec: Specification,
    policy: CollisionPolicy,
    diagnostics: D,
    summary: BuildSummary,
}

impl<D: Diagnostics> SpecBuilder<D> {
    pub fn new(diagnostics: D, policy: CollisionPolicy) -> Self {
        SpecBuilder {
            spec: Specification::default(),
            policy,
            diagnostics,
            summary: BuildSummary::default(),
        }
    }

    /// Normalize and merge one row.
    pub fn add_row<S: AsRef<str>>(&mut self, cells: &[S]) -> &mut Self {
        let normalized = normalize(cells);
        let name_cell = cells
            .first()
            .map(|cell| cell.as_ref().trim().to_owned())
            .unwrap_or_default();
        self.merge(None, name_cell, normalized);
        self
    }

    /// Normalize and merge a row read from a table, reporting its line.
    pub fn add_table_row(&mut self, row: &Row) -> &mut Self {
        let normalized = normalize(row.cells.as_slice());
        let name_cell = row
            .cells
            .first()
            .map(|cell| cell.trim().to_owned())
            .unwrap_or_default();
        self.merge(Some(row.line), name_cell, normalized);
        self
    }

    /// Add every row from an iterator of table rows.
    pub fn extend<'a>(&mut self, rows: impl IntoIterator<Item = Row<'a>>) -> &mut Self {
        for row in rows {
            self.add_table_row(&row);
        }
        self
    }

    /// The specification built so far.
    pub fn spec(&self) -> &Specification {
        &self.spec
    }

    pub fn finish(self) -> (Specification, BuildSummary) {
        (self.spec, self.summary)
    }

    fn merge(&mut self, line: Option<usize>, name_cell: String, normalized: Normalized) {
        self.summary.rows += 1;
        let Normalized { opcodes, status } = normalized;
        match status {
            RowStatus::Complete => (),
            RowStatus::Skipped => {
                self.summary.skipped += 1;
                self.diagnostics
                    .report(Diagnostic::Skipped { line, name_cell });
            }
            RowStatus::Failed(error) => {
                self.summary.malformed += 1;
                self.diagnostics
                    .report(Diagnostic::Malformed { line, error });
            }
        }
        for opcode in opcodes {
            self.insert(line, opcode);
        }
    }

    fn insert(&mut self, line: Option<usize>, opcode: Opcode) {
        let previous = match self.spec.get(&opcode.name) {
            Some(previous) if self.policy != CollisionPolicy::Overwrite => previous.clone(),
            _ => {
                self.spec.insert(opcode);
                return;
            }
        };
        self.summary.collisions += 1;
        let replaced = self.policy == CollisionPolicy::Warn;
        if replaced {
            self.spec.insert(opcode.clone());
        }
        self.diagnostics.report(Diagnostic::Collision {
            line,
            previous,
            replacement: opcode,
            replaced,
        });
    }
}

/// Build a specification from table text, logging diagnostics.
///
/// This is a convenience wrapper around [`SpecBuilder`] with a
/// [`LogDiagnostics`](crate::LogDiagnostics) sink.
pub fn build_from_text(text: &str, policy: CollisionPolicy) -> (Specification, BuildSummary) {
    let mut builder = SpecBuilder::new(crate::LogDiagnostics, policy);
    builder.extend(crate::rows::parse_rows(text));
    builder.finish()
}

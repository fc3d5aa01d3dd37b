//! Reporting what happened while building a specification.
//!
//! The builder does not log directly; it hands each [`Diagnostic`] to a
//! [`Diagnostics`] sink supplied by the caller. [`LogDiagnostics`] forwards
//! to the `log` facade, and a `Vec<Diagnostic>` simply collects them.

use crate::{error::RowError, opcode::Opcode};

/// Something worth telling the caller about a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The row does not describe an opcode.
    Skipped {
        line: Option<usize>,
        name_cell: String,
    },
    /// The row could only be partially normalized.
    Malformed {
        line: Option<usize>,
        error: RowError,
    },
    /// A row produced an opcode whose name was already in the specification.
    Collision {
        line: Option<usize>,
        previous: Opcode,
        replacement: Opcode,
        /// `true` if `replacement` was stored, `false` if it was dropped.
        replaced: bool,
    },
}

/// A sink for build diagnostics.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Forwards diagnostics to the [`log`] crate.
///
/// Skipped rows are logged at `info`, malformed rows at `error` and
/// collisions at `warn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::log!(diagnostic.level(), "{diagnostic}");
    }
}

impl Diagnostic {
    /// The log level this diagnostic is reported at by [`LogDiagnostics`].
    pub fn level(&self) -> log::Level {
        match self {
            Diagnostic::Skipped { .. } => log::Level::Info,
            Diagnostic::Malformed { .. } => log::Level::Error,
            Diagnostic::Collision { .. } => log::Level::Warn,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Diagnostic::Skipped { line, .. }
            | Diagnostic::Malformed { line, .. }
            | Diagnostic::Collision { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(line) = self.line() {
            write!(f, "line {line}: ")?;
        }
        match self {
            Diagnostic::Skipped { name_cell, .. } => write!(f, "skipping {name_cell}"),
            Diagnostic::Malformed { error, .. } => write!(f, "{error}"),
            Diagnostic::Collision {
                previous,
                replacement,
                replaced: true,
                ..
            } => write!(
                f,
                "{} redefined: code {} replaced by {}",
                previous.name, previous.code, replacement.code
            ),
            Diagnostic::Collision {
                previous,
                replacement,
                replaced: false,
                ..
            } => write!(
                f,
                "{} redefined: keeping code {}, dropping {}",
                previous.name, previous.code, replacement.code
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowErrorKind;

    #[test]
    fn display() {
        let skipped = Diagnostic::Skipped {
            line: Some(3),
            name_cell: "Word".into(),
        };
        assert_eq!(skipped.to_string(), "line 3: skipping Word");
        assert_eq!(skipped.level(), log::Level::Info);

        let malformed = Diagnostic::Malformed {
            line: None,
            error: RowError::new("OP_1-OP_16", RowErrorKind::InvalidCodeRange("81".into())),
        };
        assert_eq!(
            malformed.to_string(),
            "skipping OP_1-OP_16: invalid opcode range '81'"
        );
        assert_eq!(malformed.level(), log::Level::Error);
    }

    #[test]
    fn log_sink_accepts_everything() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut sink = LogDiagnostics;
        sink.report(Diagnostic::Skipped {
            line: None,
            name_cell: "N/A".into(),
        });
    }

    #[test]
    fn collect_through_reference() {
        fn report_two(mut sink: impl Diagnostics) {
            for line in 1..=2 {
                sink.report(Diagnostic::Skipped {
                    line: Some(line),
                    name_cell: "x".into(),
                });
            }
        }

        let mut collected: Vec<Diagnostic> = Vec::new();
        report_two(&mut collected);
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[1].line(), Some(2));
    }
}

//! Errors produced while normalizing a single table row.

/// A row that could not be fully normalized.
///
/// These never abort a build; they are attached to the row's
/// [`Normalized`](crate::Normalized) result and reported as diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowError {
    /// The (trimmed) name cell of the offending row.
    pub name_cell: String,
    pub kind: RowErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowErrorKind {
    /// Fewer than the three leading name/decimal/hex cells.
    MissingCells(usize),
    /// The hex code cell was empty for a row that needs it.
    MissingCode,
    /// The name cell lists more than two names.
    TooManyNames,
    /// A name candidate contained no mnemonic.
    InvalidMnemonic(String),
    /// A range bound was not of the form `OP_<LETTERS><NUMBER>`.
    InvalidRangeBounds { left: String, right: String },
    /// The decimal code cell of a range row is not `<a>-<b>`, or does not
    /// hold exactly one code per name in the range.
    InvalidCodeRange(String),
    /// The output cell of a range row is not `<a>-<b>`.
    InvalidOutputRange(String),
    /// A value that should have been an integer.
    InvalidNumber(String),
    /// A derived output would not fit the numeric type.
    Overflow,
}

impl RowError {
    pub(crate) fn new(name_cell: impl Into<String>, kind: RowErrorKind) -> Self {
        RowError {
            name_cell: name_cell.into(),
            kind,
        }
    }
}

impl std::fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowErrorKind::MissingCells(n) => {
                write!(f, "expected at least 3 cells, found {n}")
            }
            RowErrorKind::MissingCode => write!(f, "missing opcode"),
            RowErrorKind::TooManyNames => write!(f, "expected at most two names"),
            RowErrorKind::InvalidMnemonic(s) => write!(f, "no opcode mnemonic in '{s}'"),
            RowErrorKind::InvalidRangeBounds { left, right } => {
                write!(f, "invalid opcodes range '{left}', '{right}'")
            }
            RowErrorKind::InvalidCodeRange(s) => write!(f, "invalid opcode range '{s}'"),
            RowErrorKind::InvalidOutputRange(s) => write!(f, "invalid output range '{s}'"),
            RowErrorKind::InvalidNumber(s) => write!(f, "'{s}' is not an integer"),
            RowErrorKind::Overflow => write!(f, "derived value out of range"),
        }
    }
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skipping {}: {}", self.name_cell, self.kind)
    }
}

impl std::error::Error for RowError {}

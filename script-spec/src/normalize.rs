//! Turning one table row into opcode records.
//!
//! A row is `[name, decimal code, hex code, inputs, outputs, description]`,
//! or `[name, decimal code, hex code, description]` for tables without
//! stack columns. The name cell uses a few compressed notations:
//!
//! - `OP_1, OP_TRUE`: an alias pair, both names share one code.
//! - `OP_2-OP_16`: a numbered range; the decimal code cell (`82-96`) and,
//!   if present, the output cell (`2-16`) are ranges of the same length.
//! - `OP_NOP1, OP_NOP4-OP_NOP10`: a single name followed by a range. The
//!   code cells are comma separated in the same way (`176, 179-185`).

use crate::{
    error::{RowError, RowErrorKind},
    mnemonic,
    opcode::Opcode,
};

const ALIAS_SEPARATOR: &str = ", ";
const RANGE_SEPARATOR: char = '-';

/// What happened to a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowStatus {
    /// Every opcode the row describes was produced.
    Complete,
    /// The row does not describe an opcode (a header, or `N/A`).
    Skipped,
    /// Normalization stopped early; opcodes produced before the failure
    /// are kept.
    Failed(RowError),
}

/// The result of normalizing one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub opcodes: Vec<Opcode>,
    pub status: RowStatus,
}

impl Normalized {
    fn skipped() -> Self {
        Normalized {
            opcodes: Vec::new(),
            status: RowStatus::Skipped,
        }
    }

    fn finish(opcodes: Vec<Opcode>, result: Result<(), RowError>) -> Self {
        let status = match result {
            Ok(()) => RowStatus::Complete,
            Err(e) => RowStatus::Failed(e),
        };
        Normalized { opcodes, status }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, RowStatus::Skipped)
    }

    /// The error that stopped normalization, if any.
    pub fn error(&self) -> Option<&RowError> {
        match &self.status {
            RowStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_opcodes(self) -> Vec<Opcode> {
        self.opcodes
    }
}

/// Normalize a single table row.
///
/// Cells are trimmed before use. Rows whose first cell does not start with
/// `OP_` are skipped. This function never fails as a whole: any problem is
/// recorded in the returned [`RowStatus`], alongside whatever opcodes were
/// produced before it.
pub fn normalize<S: AsRef<str>>(cells: &[S]) -> Normalized {
    let cells = cells.iter().map(|c| c.as_ref().trim()).collect::<Vec<_>>();
    let name = match cells.first() {
        Some(name) if mnemonic::has_opcode_prefix(name) => *name,
        _ => return Normalized::skipped(),
    };
    if cells.len() < 3 {
        let err = RowError::new(name, RowErrorKind::MissingCells(cells.len()));
        return Normalized::finish(Vec::new(), Err(err));
    }
    let (inputs, outputs) = if cells.len() == 6 {
        (cells[3], cells[4])
    } else {
        ("", "")
    };
    let row = Row {
        name,
        code_dec: cells[1],
        code_hex: cells[2],
        inputs,
        outputs,
        description: cells[cells.len() - 1],
    };
    let mut opcodes = Vec::new();
    let result = row
        .expand(&mut opcodes)
        .map_err(|kind| RowError::new(name, kind));
    Normalized::finish(opcodes, result)
}

/// A row with each cell assigned its role.
struct Row<'a> {
    name: &'a str,
    code_dec: &'a str,
    code_hex: &'a str,
    inputs: &'a str,
    outputs: &'a str,
    description: &'a str,
}

/// The shape of the name cell.
enum Names<'a> {
    Single(&'a str),
    Alias(&'a str, &'a str),
    Range {
        left: &'a str,
        right: &'a str,
    },
    /// A single name followed by a range, with matching comma separated
    /// code cells. The single name takes only the first value of the hex
    /// cell (`0xb0` from `0xb0, 0xb3-0xb9`), not the whole cell.
    SingleAndRange {
        single: &'a str,
        left: &'a str,
        right: &'a str,
    },
}

impl<'a> Names<'a> {
    fn classify(name: &'a str) -> Result<Self, RowErrorKind> {
        let aliases = name.split(ALIAS_SEPARATOR).collect::<Vec<_>>();
        let range = split_pair(name);
        match (aliases.as_slice(), range) {
            (&[single, rest], Some(_)) => match split_pair(rest) {
                Some((left, right)) => Ok(Names::SingleAndRange {
                    single,
                    left,
                    right,
                }),
                // the hyphen is in the first name; there is no range
                None => Ok(Names::Single(single)),
            },
            (&[first, second], None) => Ok(Names::Alias(first, second)),
            (&[_], Some((left, right))) => Ok(Names::Range { left, right }),
            (&[single], None) => Ok(Names::Single(single)),
            _ => Err(RowErrorKind::TooManyNames),
        }
    }
}

impl Row<'_> {
    fn expand(&self, opcodes: &mut Vec<Opcode>) -> Result<(), RowErrorKind> {
        match Names::classify(self.name)? {
            Names::Single(name) => opcodes.push(self.single(name, self.code_hex)?),
            Names::Alias(first, second) => {
                let (first, second) = (clean(first)?, clean(second)?);
                let code = required_code(self.code_hex)?;
                opcodes.push(self.opcode(first, second, code));
                opcodes.push(self.opcode(second, first, code));
            }
            Names::Range { left, right } => self.range(left, right, self.code_dec, opcodes)?,
            Names::SingleAndRange {
                single,
                left,
                right,
            } => {
                let (single_hex, _) = split_alias(self.code_hex);
                opcodes.push(self.single(single, single_hex)?);
                let code_range = match split_alias(self.code_dec) {
                    (_, Some(range)) => range,
                    (_, None) => {
                        return Err(RowErrorKind::InvalidCodeRange(self.code_dec.into()))
                    }
                };
                self.range(left, right, code_range, opcodes)?;
            }
        }
        Ok(())
    }

    fn single(&self, candidate: &str, code: &str) -> Result<Opcode, RowErrorKind> {
        let name = clean(candidate)?;
        let code = required_code(code)?;
        Ok(self.opcode(name, "", code))
    }

    fn range(
        &self,
        left: &str,
        right: &str,
        code_range: &str,
        opcodes: &mut Vec<Opcode>,
    ) -> Result<(), RowErrorKind> {
        let (first, last) = match (
            mnemonic::parse_numbered(left),
            mnemonic::parse_numbered(right),
        ) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(RowErrorKind::InvalidRangeBounds {
                    left: left.into(),
                    right: right.into(),
                })
            }
        };
        let (code_start, code_end) = split_pair(code_range)
            .ok_or_else(|| RowErrorKind::InvalidCodeRange(code_range.into()))?;
        let code_start: u32 = parse_int(code_start)?;
        let code_end: u32 = parse_int(code_end)?;
        // one code per name
        if code_end.checked_sub(code_start) != last.number.checked_sub(first.number) {
            return Err(RowErrorKind::InvalidCodeRange(code_range.into()));
        }

        let output_start: Option<i64> = if self.outputs.is_empty() {
            None
        } else {
            let (start, end) = split_pair(self.outputs)
                .ok_or_else(|| RowErrorKind::InvalidOutputRange(self.outputs.into()))?;
            parse_int::<i64>(end)?;
            Some(parse_int(start)?)
        };

        for number in first.number..=last.number {
            let offset = number - first.number;
            let outputs = match output_start {
                Some(start) => start
                    .checked_add(offset.into())
                    .ok_or(RowErrorKind::Overflow)?
                    .to_string(),
                None => String::new(),
            };
            opcodes.push(Opcode {
                name: first.with_number(number),
                alias: String::new(),
                code: format!("{:#x}", code_start + offset),
                inputs: self.inputs.into(),
                outputs,
                description: self.description.into(),
            });
        }
        Ok(())
    }

    fn opcode(&self, name: &str, alias: &str, code: &str) -> Opcode {
        Opcode {
            name: name.into(),
            alias: alias.into(),
            code: code.into(),
            inputs: self.inputs.into(),
            outputs: self.outputs.into(),
            description: self.description.into(),
        }
    }
}

fn clean(candidate: &str) -> Result<&str, RowErrorKind> {
    mnemonic::extract(candidate).ok_or_else(|| RowErrorKind::InvalidMnemonic(candidate.into()))
}

fn required_code(code: &str) -> Result<&str, RowErrorKind> {
    if code.is_empty() {
        Err(RowErrorKind::MissingCode)
    } else {
        Ok(code)
    }
}

/// Split on the range separator, if it occurs exactly once.
fn split_pair(s: &str) -> Option<(&str, &str)> {
    s.split_once(RANGE_SEPARATOR)
        .filter(|(_, right)| !right.contains(RANGE_SEPARATOR))
}

/// Split a `a, b` code cell into its head and (if present) second value.
fn split_alias(s: &str) -> (&str, Option<&str>) {
    match s.split_once(ALIAS_SEPARATOR) {
        Some((head, rest)) => (head, Some(rest)),
        None => (s, None),
    }
}

fn parse_int<T: std::str::FromStr>(s: &str) -> Result<T, RowErrorKind> {
    s.trim()
        .parse()
        .map_err(|_| RowErrorKind::InvalidNumber(s.into()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn op(name: &str, alias: &str, code: &str, inputs: &str, outputs: &str, desc: &str) -> Opcode {
        Opcode {
            name: name.into(),
            alias: alias.into(),
            code: code.into(),
            inputs: inputs.into(),
            outputs: outputs.into(),
            description: desc.into(),
        }
    }

    fn names(result: &Normalized) -> Vec<&str> {
        result.opcodes.iter().map(|op| op.name.as_str()).collect()
    }

    #[test]
    fn skip_non_opcode_rows() {
        let rows: [&[&str]; 4] = [
            &["Word", "Opcode", "Hex", "Input", "Output", "Description"],
            &["N/A", "1-75", "0x01-0x4b", "(special)", "data", "Push"],
            &["op_dup", "118", "0x76", "x", "x x", "lowercase"],
            &[" "],
        ];
        for row in rows {
            let result = normalize(row);
            assert!(result.is_skipped(), "{row:?}");
            assert!(result.opcodes.is_empty());
        }
        let empty: [&str; 0] = [];
        assert!(normalize(&empty).is_skipped());
    }

    #[test]
    fn single_six_cells() {
        let result = normalize(&[
            "OP_DUP",
            "118",
            "0x76",
            "x",
            "x x",
            "Duplicates the top stack item.",
        ]);
        assert_eq!(result.status, RowStatus::Complete);
        assert_eq!(
            result.opcodes,
            vec![op(
                "OP_DUP",
                "",
                "0x76",
                "x",
                "x x",
                "Duplicates the top stack item."
            )]
        );
    }

    #[test]
    fn cells_are_trimmed() {
        let result = normalize(&["  OP_DUP\n", " 118", "0x76 ", "x", "x x", " Dup. "]);
        assert_eq!(
            result.opcodes,
            vec![op("OP_DUP", "", "0x76", "x", "x x", "Dup.")]
        );
    }

    #[test]
    fn single_four_cells() {
        let result = normalize(&["OP_RESERVED", "80", "0x50", "Invalid"]);
        assert_eq!(
            result.opcodes,
            vec![op("OP_RESERVED", "", "0x50", "", "", "Invalid")]
        );
    }

    #[test]
    fn other_counts_use_last_cell_as_description() {
        let result = normalize(&["OP_X", "1", "0x01", "a", "only five"]);
        assert_eq!(
            result.opcodes,
            vec![op("OP_X", "", "0x01", "", "", "only five")]
        );
    }

    #[test]
    fn trailing_note_is_dropped() {
        let result = normalize(&[
            "OP_CHECKLOCKTIMEVERIFY (previously OP_NOP2)",
            "177",
            "0xb1",
            "x",
            "x / fail",
            "Marks transaction as invalid if ...",
        ]);
        assert_eq!(names(&result), ["OP_CHECKLOCKTIMEVERIFY"]);
    }

    #[test]
    fn alias_pair() {
        let result = normalize(&[
            "OP_NOP, OP_RESERVED",
            "97",
            "0x61",
            "Nothing",
            "Nothing",
            "Does nothing.",
        ]);
        assert_eq!(result.status, RowStatus::Complete);
        let [nop, reserved] = &result.opcodes[..] else {
            panic!("expected two opcodes, got {:?}", result.opcodes);
        };
        assert_eq!(nop.name, "OP_NOP");
        assert_eq!(nop.alias, "OP_RESERVED");
        assert_eq!(reserved.name, "OP_RESERVED");
        assert_eq!(reserved.alias, "OP_NOP");
        for opcode in [nop, reserved] {
            assert_eq!(opcode.code, "0x61");
            assert_eq!(opcode.inputs, "Nothing");
            assert_eq!(opcode.outputs, "Nothing");
            assert_eq!(opcode.description, "Does nothing.");
        }
    }

    #[test]
    fn numeric_range() {
        let result = normalize(&[
            "OP_1-OP_16",
            "81-96",
            "0x51-0x60",
            "Nothing.",
            "1-16",
            "The number in the word name is pushed onto the stack.",
        ]);
        assert_eq!(result.status, RowStatus::Complete);
        assert_eq!(result.opcodes.len(), 16);
        for (i, opcode) in result.opcodes.iter().enumerate() {
            let n = i + 1;
            assert_eq!(opcode.name, format!("OP_{n}"));
            assert_eq!(opcode.code, format!("{:#x}", 80 + n));
            assert_eq!(opcode.outputs, n.to_string());
            assert_eq!(opcode.alias, "");
            assert_eq!(opcode.inputs, "Nothing.");
            assert_eq!(
                opcode.description,
                "The number in the word name is pushed onto the stack."
            );
        }
        assert_eq!(result.opcodes[0].code, "0x51");
        assert_eq!(result.opcodes[15].code, "0x60");
    }

    #[test]
    fn range_without_outputs() {
        let result = normalize(&["OP_NOP4-OP_NOP6", "179-181", "0xb3-0xb5", "ignored"]);
        assert_eq!(names(&result), ["OP_NOP4", "OP_NOP5", "OP_NOP6"]);
        assert!(result.opcodes.iter().all(|op| op.outputs.is_empty()));
        assert_eq!(result.opcodes[2].code, "0xb5");
    }

    #[test]
    fn range_uses_left_prefix() {
        let result = normalize(&["OP_PUSHDATA1-OP_2", "76-77", "", "d"]);
        assert_eq!(names(&result), ["OP_PUSHDATA1", "OP_PUSHDATA2"]);
    }

    #[test]
    fn single_then_range() {
        let result = normalize(&[
            "OP_NOP1, OP_NOP4-OP_NOP10",
            "176, 179-185",
            "0xb0, 0xb3-0xb9",
            "The word is ignored.",
        ]);
        assert_eq!(result.status, RowStatus::Complete);
        assert_eq!(result.opcodes.len(), 8);
        assert_eq!(
            result.opcodes[0],
            op("OP_NOP1", "", "0xb0", "", "", "The word is ignored.")
        );
        assert_eq!(result.opcodes[1].name, "OP_NOP4");
        assert_eq!(result.opcodes[1].code, "0xb3");
        assert_eq!(result.opcodes[7].name, "OP_NOP10");
        assert_eq!(result.opcodes[7].code, "0xb9");
    }

    #[test]
    fn single_then_range_without_code_range() {
        let result = normalize(&["OP_NOP1, OP_NOP4-OP_NOP10", "176", "0xb0", "ignored"]);
        assert_eq!(names(&result), ["OP_NOP1"]);
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::InvalidCodeRange("176".into()))
        );
    }

    #[test]
    fn malformed_code_range() {
        let result = normalize(&["OP_1-OP_16", "notanumber-96", "", "d"]);
        assert!(result.opcodes.is_empty());
        let err = result.error().unwrap();
        assert_eq!(err.name_cell, "OP_1-OP_16");
        assert_eq!(err.kind, RowErrorKind::InvalidNumber("notanumber".into()));

        let result = normalize(&["OP_1-OP_16", "81", "0x51", "Nothing.", "1-16", "d"]);
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::InvalidCodeRange("81".into()))
        );
    }

    #[test]
    fn code_range_must_match_names() {
        // a typo in the name cell must not expand to billions of entries
        let result = normalize(&["OP_1-OP_4000000000", "0-1", "", "d"]);
        assert!(result.opcodes.is_empty());
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::InvalidCodeRange("0-1".into()))
        );

        let result = normalize(&["OP_1-OP_16", "81-95", "", "d"]);
        assert!(result.opcodes.is_empty());
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::InvalidCodeRange("81-95".into()))
        );

        let result = normalize(&["OP_1-OP_16", "96-81", "", "d"]);
        assert!(result.opcodes.is_empty());
        assert!(result.error().is_some());
    }

    #[test]
    fn malformed_output_range() {
        let result = normalize(&["OP_1-OP_16", "81-96", "", "Nothing.", "1", "d"]);
        assert!(result.opcodes.is_empty());
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::InvalidOutputRange("1".into()))
        );

        let result = normalize(&["OP_1-OP_16", "81-96", "", "Nothing.", "1-x", "d"]);
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::InvalidNumber("x".into()))
        );
    }

    #[test]
    fn malformed_range_bounds() {
        let result = normalize(&["OP_DUP-OP_DROP", "1-2", "", "d"]);
        assert!(result.opcodes.is_empty());
        assert!(matches!(
            result.error().map(|e| &e.kind),
            Some(RowErrorKind::InvalidRangeBounds { .. })
        ));
    }

    #[test]
    fn overflow_keeps_prefix() {
        let outputs = format!("{}-{}", i64::MAX - 1, i64::MAX);
        let result = normalize(&["OP_1-OP_4", "1-4", "", "x", outputs.as_str(), "d"]);
        assert_eq!(names(&result), ["OP_1", "OP_2"]);
        assert_eq!(result.opcodes[1].outputs, i64::MAX.to_string());
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::Overflow)
        );
    }

    #[test]
    fn reversed_range_is_empty() {
        let result = normalize(&["OP_16-OP_1", "96-81", "", "d"]);
        assert_eq!(result.status, RowStatus::Complete);
        assert!(result.opcodes.is_empty());
    }

    #[test]
    fn too_few_cells() {
        let result = normalize(&["OP_DUP", "118"]);
        assert!(result.opcodes.is_empty());
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::MissingCells(2))
        );
    }

    #[test]
    fn missing_code_or_name() {
        let result = normalize(&["OP_DUP", "118", "", "x", "x x", "d"]);
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::MissingCode)
        );

        let result = normalize(&["OP_A, nothing", "1", "0x01", "d"]);
        assert!(result.opcodes.is_empty());
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::InvalidMnemonic("nothing".into()))
        );

        let result = normalize(&["OP_A, OP_B, OP_C", "1", "0x01", "d"]);
        assert_eq!(
            result.error().map(|e| &e.kind),
            Some(&RowErrorKind::TooManyNames)
        );
    }

    #[test]
    fn normalize_is_repeatable() {
        let rows: [&[&str]; 3] = [
            &["OP_DUP", "118", "0x76", "x", "x x", "Dup."],
            &["OP_1, OP_TRUE", "81", "0x51", "Nothing.", "1", "One."],
            &["OP_2-OP_16", "82-96", "0x52-0x60", "Nothing.", "2-16", "N."],
        ];
        let first = rows.iter().map(|row| normalize(*row)).collect::<Vec<_>>();
        let second = rows.iter().map(|row| normalize(*row)).collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn error_message_names_the_row() {
        let result = normalize(&["OP_1-OP_16", "notanumber-96", "", "d"]);
        assert_eq!(
            result.error().unwrap().to_string(),
            "skipping OP_1-OP_16: 'notanumber' is not an integer"
        );
    }
}

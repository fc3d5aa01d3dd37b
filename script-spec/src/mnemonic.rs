//! The grammar for opcode mnemonics as they appear in table cells.
//!
//! Cells scraped from a reference page are noisy: a name may be followed by
//! a note (`OP_CHECKLOCKTIMEVERIFY (previously OP_NOP2)`), and ranges are
//! written as two mnemonics joined by a hyphen. The grammar is:
//!
//! ```text
//! mnemonic    := "OP_" ident-char+
//! ident-char  := ASCII letter | ASCII digit | "_" | "-"
//! range-bound := "OP_" upper* digit+
//! ```
//!
//! Both productions match the first occurrence inside a candidate string;
//! anything before or after the match is discarded.

/// The prefix shared by every opcode mnemonic.
pub const OPCODE_PREFIX: &str = "OP_";

/// A mnemonic split into its alphabetic stem and trailing number.
///
/// `OP_16` is `("OP_", 16)` and `OP_PUSHDATA4` is `("OP_PUSHDATA", 4)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberedMnemonic<'a> {
    pub prefix: &'a str,
    pub number: u32,
}

impl NumberedMnemonic<'_> {
    /// The mnemonic formed by this prefix and a different number.
    pub fn with_number(&self, number: u32) -> String {
        format!("{}{number}", self.prefix)
    }
}

/// Returns `true` if this (trimmed) cell names an opcode.
pub fn has_opcode_prefix(cell: &str) -> bool {
    cell.starts_with(OPCODE_PREFIX)
}

/// Extract the first mnemonic in `candidate`, ignoring surrounding text.
///
/// Returns `None` if the candidate contains no prefix followed by at least
/// one identifier character.
pub fn extract(candidate: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(pos) = candidate[search_from..].find(OPCODE_PREFIX) {
        let start = search_from + pos;
        let body_start = start + OPCODE_PREFIX.len();
        let body_len = candidate[body_start..]
            .bytes()
            .take_while(|b| is_ident_byte(*b))
            .count();
        if body_len > 0 {
            return Some(&candidate[start..body_start + body_len]);
        }
        search_from = body_start;
    }
    None
}

/// Parse the first `prefix + number` mnemonic in `candidate`.
///
/// The stem may only contain uppercase letters after the prefix; the number
/// must fit in a `u32`.
pub fn parse_numbered(candidate: &str) -> Option<NumberedMnemonic<'_>> {
    let mut search_from = 0;
    while let Some(pos) = candidate[search_from..].find(OPCODE_PREFIX) {
        let start = search_from + pos;
        let stem_end = start
            + OPCODE_PREFIX.len()
            + candidate[start + OPCODE_PREFIX.len()..]
                .bytes()
                .take_while(u8::is_ascii_uppercase)
                .count();
        let digits = candidate[stem_end..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits > 0 {
            let number = candidate[stem_end..stem_end + digits].parse().ok()?;
            return Some(NumberedMnemonic {
                prefix: &candidate[start..stem_end],
                number,
            });
        }
        search_from = start + OPCODE_PREFIX.len();
    }
    None
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

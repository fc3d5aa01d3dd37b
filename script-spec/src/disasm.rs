//! Helpers for presenting disassembled scripts.
//!
//! Disassembly listings have lines of the form `<script>:<offset>: <code>`,
//! where `<script>` is `00` for a signature script, `01` for a pubkey script
//! and `02` for a witness script. These helpers indent the code between
//! `OP_IF`/`OP_NOTIF`, `OP_ELSE` and `OP_ENDIF`, and move between code lines
//! in a formatted listing.

use std::sync::OnceLock;

use regex::Regex;

const LINE_PREFIX: &str = "  ";

/// The indentation state carried between lines of one listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indentation {
    level: usize,
    step: usize,
}

impl Indentation {
    pub fn new(step: usize) -> Self {
        Indentation { level: 0, step }
    }

    /// The current indentation, in spaces.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 0;
    }

    fn indent(&mut self) {
        self.level += self.step;
    }

    fn dedent(&mut self) {
        self.level = self.level.saturating_sub(self.step);
    }
}

impl Default for Indentation {
    fn default() -> Self {
        Indentation::new(2)
    }
}

/// Format one line of a disassembly listing.
///
/// `OP_DATA_<n>` length markers are removed. Lines that are not of the form
/// `<script>:<offset>:<code>` are otherwise returned unchanged and do not
/// affect the indentation.
pub fn format_disasm_line(line: &str, indentation: &mut Indentation) -> String {
    let line = data_marker().replace_all(line, "");
    let mut parts = line.splitn(3, ':');
    let code = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(_), Some(code)) => code.trim(),
        _ => return line.to_string(),
    };

    if starts_with_any(code, &["OP_ELSE", "OP_ENDIF"]) {
        indentation.dedent();
    }
    let formatted = format!("{LINE_PREFIX}{}{code}", " ".repeat(indentation.level));
    if starts_with_any(code, &["OP_IF", "OP_NOTIF", "OP_ELSE"]) {
        indentation.indent();
    }
    formatted
}

fn data_marker() -> &'static Regex {
    static DATA_MARKER: OnceLock<Regex> = OnceLock::new();
    DATA_MARKER.get_or_init(|| Regex::new(r"OP_DATA_\d+ ").unwrap())
}

fn starts_with_any(code: &str, mnemonics: &[&str]) -> bool {
    mnemonics.iter().any(|m| code.starts_with(m))
}

/// Which script a disassembly line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptKind {
    Signature,
    Pubkey,
    Witness,
}

impl ScriptKind {
    /// Classify a raw disassembly line by its script prefix.
    pub fn of_line(line: &str) -> Option<Self> {
        match line.get(..3)? {
            "00:" => Some(ScriptKind::Signature),
            "01:" => Some(ScriptKind::Pubkey),
            "02:" => Some(ScriptKind::Witness),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptKind::Signature => write!(f, "signature script"),
            ScriptKind::Pubkey => write!(f, "pubkey script"),
            ScriptKind::Witness => write!(f, "witness script"),
        }
    }
}

/// `true` if this raw disassembly line is the first line of a script.
pub fn is_first_script_line(line: &str) -> bool {
    line.contains(":0000: ")
}

/// One line of a formatted listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeLine {
    /// Separators are blank or heading lines between scripts; navigation
    /// skips them.
    pub is_separator: bool,
    /// Index of this line in the rendered output.
    pub index: usize,
    pub text: String,
}

/// The lines of a formatted listing, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeLines(pub Vec<CodeLine>);

impl CodeLines {
    /// The first code line, or the first line if there are only separators.
    pub fn first(&self) -> Option<&CodeLine> {
        self.0
            .iter()
            .find(|l| !l.is_separator)
            .or_else(|| self.0.first())
    }

    /// The last code line, or the last line if there are only separators.
    pub fn last(&self) -> Option<&CodeLine> {
        self.0
            .iter()
            .rev()
            .find(|l| !l.is_separator)
            .or_else(|| self.0.last())
    }

    /// The first code line after `current`, or the last line.
    pub fn next(&self, current: usize) -> Option<&CodeLine> {
        self.0
            .iter()
            .find(|l| !l.is_separator && l.index > current)
            .or_else(|| self.0.last())
    }

    /// The last code line before `current`, or the first line.
    pub fn previous(&self, current: usize) -> Option<&CodeLine> {
        self.0
            .iter()
            .rev()
            .find(|l| !l.is_separator && l.index < current)
            .or_else(|| self.0.first())
    }
}

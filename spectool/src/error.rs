use std::path::Path;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceOffset};

#[derive(Debug)]
pub struct ErrorReport {
    src: Option<NamedSource>,
    message: String,
    labels: Vec<LabeledSpan>,
}

impl Diagnostic for ErrorReport {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.src.as_ref().map(|x| x as _)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.iter().cloned()))
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ErrorReport {}

impl ErrorReport {
    pub fn message(message: impl Into<String>) -> Self {
        ErrorReport {
            src: None,
            message: message.into(),
            labels: Vec::new(),
        }
    }

    /// An error in a config file, pointing at the offending TOML.
    pub fn from_toml_error(error: &toml::de::Error, path: &Path, text: String) -> Self {
        let labels = error
            .span()
            .map(|span| LabeledSpan::at(span, error.message()))
            .into_iter()
            .collect();
        ErrorReport {
            message: format!("failed to parse config: {}", error.message()),
            src: Some(NamedSource::new(path.to_string_lossy(), text)),
            labels,
        }
    }

    /// Table rows that could not be fully normalized.
    ///
    /// `rows` are (1-based line, message) pairs.
    pub fn from_table_rows(
        message: String,
        rows: &[(usize, String)],
        path: &Path,
        text: String,
    ) -> Self {
        let labels = rows
            .iter()
            .map(|(line, label)| {
                let start = SourceOffset::from_location(&text, *line, 1).offset();
                let row = text[start..].lines().next().unwrap_or_default();
                LabeledSpan::new(Some(label.clone()), start, row.len())
            })
            .collect();
        ErrorReport {
            message,
            src: Some(NamedSource::new(path.to_string_lossy(), text)),
            labels,
        }
    }
}

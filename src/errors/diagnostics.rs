use std::{fmt::Display, rc::Rc, slice::Iter};

use crate::get_line_at_position;

use super::errors::{Error, ErrorKind};

/// An [`Error`] resolved against its source text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub error: Error,
    pub line: usize,
    pub column: usize,
    pub line_text: String,
}

impl Diagnostic {
    pub fn new(error: Error, source: &str) -> Self {
        let (line, line_text, line_pos) = get_line_at_position(source, error.get_position().0);
        let column = line_text
            .char_indices()
            .take_while(|(index, _)| *index < line_pos)
            .count()
            + 1;

        Diagnostic {
            error,
            line,
            column,
            line_text,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn message(&self) -> String {
        self.error.message()
    }

    pub fn file(&self) -> &str {
        &self.error.get_position().1
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}. Error Position: ({}, {}). File: '{}'",
            self.error.get_error_name(),
            self.message(),
            self.line,
            self.column,
            self.file()
        )
    }
}

/// Ordered, append-only log of diagnostics for one source unit.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    source: Rc<str>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(source: Rc<str>) -> Self {
        Diagnostics {
            source,
            entries: vec![],
        }
    }

    pub fn report(&mut self, error: Error) {
        tracing::debug!(kind = %error.kind(), message = %error.message(), "diagnostic reported");
        let diagnostic = Diagnostic::new(error, &self.source);
        self.entries.push(diagnostic);
    }

    /// Appends diagnostics that were already resolved against another source, e.g. an imported package.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.entries.iter().map(Diagnostic::kind).collect()
    }

    pub fn iter(&self) -> Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for diagnostic in &self.entries {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

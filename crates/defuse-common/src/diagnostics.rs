//! Driver diagnostics: unreadable files, parse failures, bad output paths.
//!
//! Unresolved symbol lookups are not diagnostics; they are the expected
//! steady state of the resolver and surface only as absent type names.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

/// A single reportable problem, tied to an input file when one is involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub file: String,
    /// 1-based line/column when the problem has a source position.
    pub location: Option<(u32, u32)>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            file: file.into(),
            location: None,
            message: message.into(),
        }
    }

    pub fn warning(file: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Warning,
            file: file.into(),
            location: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Some((line, column));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some((line, column)) => {
                write!(f, "{}:{}:{}: {}", self.file, line, column, self.message)
            }
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_location() {
        let d = Diagnostic::error("Foo.java", "unexpected token").at(3, 7);
        assert_eq!(d.to_string(), "Foo.java:3:7: unexpected token");
    }

    #[test]
    fn display_without_location() {
        let d = Diagnostic::warning("Bar.java", "cannot open");
        assert_eq!(d.to_string(), "Bar.java: cannot open");
    }
}

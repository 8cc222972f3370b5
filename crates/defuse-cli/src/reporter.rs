//! Renders driver diagnostics for stderr.

use colored::Colorize;
use defuse_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    pretty: bool,
}

impl Reporter {
    /// `pretty` enables color; pass the result of a terminal check.
    pub fn new(pretty: bool) -> Self {
        Reporter { pretty }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            let severity = match diagnostic.category {
                DiagnosticCategory::Error => "error",
                DiagnosticCategory::Warning => "warning",
            };
            let severity = if self.pretty {
                match diagnostic.category {
                    DiagnosticCategory::Error => severity.red().bold().to_string(),
                    DiagnosticCategory::Warning => severity.yellow().bold().to_string(),
                }
            } else {
                severity.to_string()
            };
            out.push_str(&format!("{severity}: {diagnostic}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering() {
        let reporter = Reporter::new(false);
        let diags = vec![
            Diagnostic::error("A.java", "unexpected token").at(2, 5),
            Diagnostic::warning("B.java", "cannot read file"),
        ];
        assert_eq!(
            reporter.render(&diags),
            "error: A.java:2:5: unexpected token\nwarning: B.java: cannot read file\n"
        );
    }
}

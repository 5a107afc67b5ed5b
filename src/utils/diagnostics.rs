//! Document analysis without conversion
//!
//! Backs the CLI `check` mode: reports unterminated math delimiters,
//! commands the strip pass would remove, and rule-table health.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::rules::{is_known_command, RULE_TABLE};
use crate::utils::error::{CliDiagnostic, DiagnosticSeverity};

lazy_static! {
    static ref COMMAND_TOKEN: Regex = Regex::new(r"\\([a-zA-Z]+)").expect("command token pattern");
}

/// Outcome of a `check` analysis
#[derive(Debug, Default)]
pub struct CheckResult {
    pub diagnostics: Vec<CliDiagnostic>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Analyze a document for conversion issues without converting it.
pub fn check_document(input: &str) -> CheckResult {
    let mut result = CheckResult::default();

    for (name, error) in &RULE_TABLE.skipped {
        result.diagnostics.push(
            CliDiagnostic::new(
                DiagnosticSeverity::Warning,
                "rule skipped",
                format!("Pattern failed to compile: {}", error),
            )
            .with_location((*name).to_string()),
        );
    }

    let display_delims = input.matches("$$").count();
    if display_delims % 2 != 0 {
        result.diagnostics.push(CliDiagnostic::new(
            DiagnosticSeverity::Warning,
            "unterminated math",
            "Odd number of '$$' delimiters; the last display span will stay literal",
        ));
    }
    let inline_delims = input.replace("$$", "").matches('$').count();
    if inline_delims % 2 != 0 {
        result.diagnostics.push(CliDiagnostic::new(
            DiagnosticSeverity::Warning,
            "unterminated math",
            "Odd number of '$' delimiters; the last inline span will stay literal",
        ));
    }

    let mut unknown: IndexSet<&str> = IndexSet::new();
    for caps in COMMAND_TOKEN.captures_iter(input) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if !name.is_empty() && !is_known_command(name) {
            unknown.insert(name);
        }
    }
    for name in unknown {
        result.diagnostics.push(
            CliDiagnostic::new(
                DiagnosticSeverity::Info,
                "unknown command",
                format!("'\\{}' is not recognized and will be stripped", name),
            )
            .with_location(format!("\\{}", name)),
        );
    }

    result
}

/// Render diagnostics for terminal output.
pub fn format_diagnostics(result: &CheckResult, color: bool) -> String {
    if result.is_clean() {
        return "No issues found.".to_string();
    }
    let mut out = String::new();
    for diag in &result.diagnostics {
        if color {
            out.push_str(diag.color_code());
            out.push_str(&diag.to_string());
            out.push_str("\x1b[0m");
        } else {
            out.push_str(&diag.to_string());
        }
        out.push('\n');
    }
    out.push_str(&format!("{} issue(s) found.", result.diagnostics.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_document() {
        let result = check_document(r"Plain prose with $\alpha$ math.");
        assert!(result.is_clean());
        assert_eq!(format_diagnostics(&result, false), "No issues found.");
    }

    #[test]
    fn test_unterminated_display_reported() {
        let result = check_document("broken $$x + y");
        assert!(!result.is_clean());
        assert!(!result.has_errors());
        assert!(format_diagnostics(&result, false).contains("$$"));
    }

    #[test]
    fn test_unknown_commands_reported_once() {
        let result = check_document(r"\mystery and \mystery again, \alpha is fine");
        let unknown: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.kind == "unknown command")
            .collect();
        assert_eq!(unknown.len(), 1);
        assert!(unknown[0].message.contains("mystery"));
    }

    #[test]
    fn test_colored_output_wraps_ansi() {
        let result = check_document("odd $ dollar");
        let rendered = format_diagnostics(&result, true);
        assert!(rendered.contains("\x1b["));
    }
}

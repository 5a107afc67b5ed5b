//! LaTeX to Markdown conversion core
//!
//! This module implements the notation converter: a region segmenter that
//! protects descriptive spans, and a rule engine that rewrites math regions
//! and residual LaTeX commands into Markdown-compatible text.

pub mod context;
pub mod math;
pub mod postprocess;
pub mod protect;
pub mod rules;
pub mod segment;

pub use context::{ConvertOptions, MarkdownConverter};

// =============================================================================
// Warning System
// =============================================================================

/// Kind of warning generated during conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A rule's pattern failed to compile and the rule was skipped
    RuleSkipped,
    /// A math delimiter was opened but never closed; the span was left literal
    UnterminatedMath,
    /// Input bytes were not valid UTF-8 and replacement characters were substituted
    LossyDecode,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::RuleSkipped => write!(f, "rule skipped"),
            WarningKind::UnterminatedMath => write!(f, "unterminated math"),
            WarningKind::LossyDecode => write!(f, "lossy decode"),
        }
    }
}

/// A warning generated during LaTeX to Markdown conversion
#[derive(Debug, Clone)]
pub struct ConversionWarning {
    /// The kind of warning
    pub kind: WarningKind,
    /// Human-readable message
    pub message: String,
    /// Location context (e.g., a rule name or file path)
    pub location: Option<String>,
}

impl ConversionWarning {
    /// Create a new warning
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        ConversionWarning {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Add location context to the warning
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Create a skipped-rule warning
    pub fn rule_skipped(rule: &str, error: &str) -> Self {
        ConversionWarning::new(
            WarningKind::RuleSkipped,
            format!("Pattern for rule '{}' failed to compile: {}", rule, error),
        )
        .with_location(rule.to_string())
    }

    /// Create an unterminated-math warning
    pub fn unterminated_math(delimiter: &str) -> Self {
        ConversionWarning::new(
            WarningKind::UnterminatedMath,
            format!(
                "Unterminated '{}' delimiter; the span was left as literal text",
                delimiter
            ),
        )
        .with_location(delimiter.to_string())
    }

    /// Create a lossy-decode warning
    pub fn lossy_decode(path: &str) -> Self {
        ConversionWarning::new(
            WarningKind::LossyDecode,
            format!(
                "'{}' is not valid UTF-8; replacement characters were substituted",
                path
            ),
        )
        .with_location(path.to_string())
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

impl From<ConversionWarning> for crate::utils::error::CliDiagnostic {
    fn from(warning: ConversionWarning) -> Self {
        use crate::utils::error::{CliDiagnostic, DiagnosticSeverity};

        let severity = match warning.kind {
            WarningKind::RuleSkipped | WarningKind::UnterminatedMath => {
                DiagnosticSeverity::Warning
            }
            WarningKind::LossyDecode => DiagnosticSeverity::Info,
        };

        let mut diag = CliDiagnostic::new(severity, warning.kind.to_string(), warning.message);
        if let Some(loc) = warning.location {
            diag = diag.with_location(loc);
        }
        diag
    }
}

/// Result of conversion with diagnostics
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The converted output
    pub output: String,
    /// Warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionResult {
    /// Create a new result with no warnings
    pub fn ok(output: String) -> Self {
        ConversionResult {
            output,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings
    pub fn with_warnings(output: String, warnings: Vec<ConversionWarning>) -> Self {
        ConversionResult { output, warnings }
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get warnings as formatted strings
    pub fn format_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

/// Convert a LaTeX document to Markdown (best effort)
pub fn latex_to_markdown(input: &str) -> String {
    let mut converter = MarkdownConverter::new();
    converter.convert_document(input)
}

/// Convert a LaTeX document to Markdown with full diagnostics
///
/// Returns both the converted output and any warnings generated during
/// conversion. This is the recommended function for applications that need
/// to report conversion issues.
pub fn latex_to_markdown_with_diagnostics(input: &str) -> ConversionResult {
    let mut converter = MarkdownConverter::new();
    converter.convert_document_with_diagnostics(input)
}

/// Convert a LaTeX document to Markdown in strict mode
///
/// Unterminated math delimiters are upgraded from warnings to hard errors.
pub fn latex_to_markdown_strict(
    input: &str,
) -> Result<String, crate::utils::error::ConversionError> {
    let mut converter = MarkdownConverter::with_options(ConvertOptions::strict());
    converter.convert(input)
}

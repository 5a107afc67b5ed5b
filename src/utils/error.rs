//! Error handling for Texmark conversions
//!
//! This module provides a unified error type for conversion and file
//! operations, plus the diagnostic type the CLI renders.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// Invalid input (strict mode violations)
    InvalidInput { message: String },
    /// IO error (for file operations)
    IoError {
        path: Option<String>,
        message: String,
    },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ConversionError::IoError { path, message } => {
                if let Some(path) = path {
                    write!(f, "IO error for '{}': {}", path, message)
                } else {
                    write!(f, "IO error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            path: None,
            message: err.to_string(),
        }
    }
}

// Convenience constructors
impl ConversionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        ConversionError::IoError {
            path: Some(path.into()),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Unified CLI Diagnostic System
// =============================================================================

/// Severity level for CLI diagnostics (determines coloring and behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Critical errors (red) - e.g., strict mode violations
    Error,
    /// Warnings (yellow) - e.g., unterminated math, skipped rules
    Warning,
    /// Informational (cyan) - e.g., commands the strip pass will remove
    Info,
}

/// Unified diagnostic type for CLI output.
#[derive(Debug, Clone)]
pub struct CliDiagnostic {
    /// Severity level (for coloring and strict mode)
    pub severity: DiagnosticSeverity,
    /// Diagnostic kind as string (e.g., "unterminated math")
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// Location context (e.g., "\\foo" or a file path)
    pub location: Option<String>,
}

impl CliDiagnostic {
    /// Create a new diagnostic.
    pub fn new(
        severity: DiagnosticSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind: kind.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Add location context.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Get ANSI color code for this diagnostic's severity.
    pub fn color_code(&self) -> &'static str {
        match self.severity {
            DiagnosticSeverity::Error => "\x1b[31m",   // red
            DiagnosticSeverity::Warning => "\x1b[33m", // yellow
            DiagnosticSeverity::Info => "\x1b[36m",    // cyan
        }
    }
}

impl fmt::Display for CliDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = ConversionError::invalid("unterminated '$$'");
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ConversionError::io("notes.tex", &io);
        let msg = err.to_string();
        assert!(msg.contains("notes.tex"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_diagnostic_display_with_location() {
        let diag = CliDiagnostic::new(DiagnosticSeverity::Info, "unknown command", "stripped")
            .with_location("\\foo");
        assert_eq!(diag.to_string(), "[unknown command] \\foo: stripped");
    }
}

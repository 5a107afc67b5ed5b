//! Batch conversion reporting
//!
//! The batch driver records one outcome per file and an aggregate count;
//! the report can be serialized as pretty JSON.

use serde::Serialize;

/// Per-file outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    Converted,
    ReadError,
    ConvertError,
    WriteError,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: String,
    pub output: Option<String>,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn converted(input: impl Into<String>, output: impl Into<String>) -> Self {
        FileOutcome {
            input: input.into(),
            output: Some(output.into()),
            status: FileStatus::Converted,
            error: None,
        }
    }

    pub fn failed(input: impl Into<String>, status: FileStatus, error: impl Into<String>) -> Self {
        FileOutcome {
            input: input.into(),
            output: None,
            status,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Converted
    }
}

/// Aggregate report for one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        BatchReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total: 0,
            succeeded: 0,
            failed: 0,
            files: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        self.total += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.files.push(outcome);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// One-line summary for the end of a batch run.
    pub fn summary(&self) -> String {
        format!(
            "Batch conversion complete: {} succeeded, {} failed",
            self.succeeded, self.failed
        )
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

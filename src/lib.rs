//! Texmark - LaTeX to Markdown notation converter
//!
//! Texmark rewrites LaTeX math and formatting commands embedded in mixed
//! prose into Markdown-compatible equivalents. Prose, fenced code blocks,
//! and descriptive regions (image/figure captions) pass through unmodified.
//!
//! # Example
//!
//! ```
//! use texmark::latex_to_markdown;
//!
//! let output = latex_to_markdown(r"The value $\alpha + \beta$ is small.");
//! assert_eq!(output, "The value \\(α + β\\) is small.");
//! ```

pub mod core;
pub mod utils;

pub use crate::utils::diagnostics;

pub use crate::core::context::{ConvertOptions, MarkdownConverter};
pub use crate::core::segment::{segment, Segment, SegmentKind};
pub use crate::core::{
    latex_to_markdown, latex_to_markdown_strict, latex_to_markdown_with_diagnostics,
    ConversionResult, ConversionWarning, WarningKind,
};
pub use crate::utils::error::{CliDiagnostic, ConversionError, DiagnosticSeverity};

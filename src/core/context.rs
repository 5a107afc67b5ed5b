//! Converter state and options
//!
//! [`MarkdownConverter`] drives the pipeline: segment, protect, display
//! pass, inline pass, whole-segment rules, residual strip, whitespace
//! normalization, reassembly, document post-processing.

use super::math::{convert_display_math, convert_inline_math};
use super::postprocess::{collapse_blank_lines, postprocess_document};
use super::protect::{mask_fenced_blocks, strip_residual_commands, PlaceholderGuard};
use super::rules::{RulePass, RULE_TABLE};
use super::segment::{segment, SegmentKind};
use super::{ConversionResult, ConversionWarning, WarningKind};
use crate::utils::error::ConversionError;

/// Conversion options
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Treat unterminated math delimiters as hard errors instead of
    /// leaving the span as literal text
    pub strict_math: bool,
    /// Apply document-level cosmetic fixes after reassembly
    pub postprocess: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            strict_math: false,
            postprocess: true,
        }
    }
}

impl ConvertOptions {
    /// Create strict mode options (errors on unterminated math)
    pub fn strict() -> Self {
        ConvertOptions {
            strict_math: true,
            ..Self::default()
        }
    }
}

/// LaTeX to Markdown converter
pub struct MarkdownConverter {
    options: ConvertOptions,
    warnings: Vec<ConversionWarning>,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    pub fn with_options(options: ConvertOptions) -> Self {
        MarkdownConverter {
            options,
            warnings: Vec::new(),
        }
    }

    /// Convert a document, best effort. Malformed markup is left literal.
    pub fn convert_document(&mut self, input: &str) -> String {
        self.begin_run();
        self.run_pipeline(input)
    }

    /// Convert a document and return the output together with every warning
    /// generated along the way.
    pub fn convert_document_with_diagnostics(&mut self, input: &str) -> ConversionResult {
        self.begin_run();
        let output = self.run_pipeline(input);
        ConversionResult::with_warnings(output, std::mem::take(&mut self.warnings))
    }

    /// Convert a document honoring the configured options. With
    /// `strict_math` set, an unterminated math delimiter is a hard error.
    pub fn convert(&mut self, input: &str) -> Result<String, ConversionError> {
        let result = self.convert_document_with_diagnostics(input);
        if self.options.strict_math {
            if let Some(warning) = result
                .warnings
                .iter()
                .find(|w| w.kind == WarningKind::UnterminatedMath)
            {
                return Err(ConversionError::invalid(warning.message.clone()));
            }
        }
        Ok(result.output)
    }

    /// Warnings collected by the last `convert_document` call.
    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    fn begin_run(&mut self) {
        self.warnings.clear();
        for (name, error) in &RULE_TABLE.skipped {
            self.warnings.push(ConversionWarning::rule_skipped(name, error));
        }
    }

    fn run_pipeline(&mut self, input: &str) -> String {
        let mut pieces = Vec::new();
        for seg in segment(input) {
            match seg.kind {
                SegmentKind::Preserve => pieces.push(seg.text),
                SegmentKind::Process => pieces.push(self.process_segment(&seg.text)),
            }
        }
        let assembled = pieces.concat();
        if self.options.postprocess {
            postprocess_document(&assembled)
        } else {
            assembled
        }
    }

    /// Run the rule engine over one `Process` segment.
    fn process_segment(&mut self, text: &str) -> String {
        // Fenced code blocks are masked for the whole run so no pass can
        // see their content; restored as the last step.
        let mut guard = PlaceholderGuard::new("codeblock");
        let masked = mask_fenced_blocks(&mut guard, text);

        let masked = convert_display_math(&masked, &mut self.warnings);
        let masked = convert_inline_math(&masked, &mut self.warnings);
        let masked = RULE_TABLE.apply(&masked, RulePass::Segment);
        let masked = strip_residual_commands(&masked);
        let masked = collapse_blank_lines(&masked);

        guard.restore(&masked)
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_scenario() {
        let mut conv = MarkdownConverter::new();
        let out = conv.convert_document(r"The value $\alpha + \beta$ is small.");
        assert_eq!(out, "The value \\(α + β\\) is small.");
    }

    #[test]
    fn test_strict_mode_rejects_unterminated_math() {
        let mut conv = MarkdownConverter::with_options(ConvertOptions::strict());
        let err = conv.convert("broken $$x").unwrap_err();
        assert!(err.to_string().contains("Unterminated"));
    }

    #[test]
    fn test_default_mode_keeps_unterminated_math_literal() {
        let mut conv = MarkdownConverter::new();
        let result = conv.convert_document_with_diagnostics("broken $$x");
        assert_eq!(result.output, "broken $$x");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnterminatedMath));
    }

    #[test]
    fn test_code_block_survives_whole_pipeline() {
        let input = "Use $\\alpha$:\n\n```\nkeep \\alpha here\n```\n";
        let mut conv = MarkdownConverter::new();
        let out = conv.convert_document(input);
        assert!(out.contains("keep \\alpha here"));
        assert!(out.contains("\\(α\\)"));
    }
}

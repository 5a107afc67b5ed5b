//! Math region discovery and replacement
//!
//! Display regions (`$$...$$`) are rewritten into fenced math blocks,
//! inline regions (`$...$`) into `\(...\)` spans. Region content is run
//! through the rule table before re-emission. Unterminated delimiters fail
//! to match and are left as literal text; the caller receives a warning.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::rules::{RulePass, RULE_TABLE};
use super::ConversionWarning;

/// Kind of math region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    Display,
    Inline,
}

lazy_static! {
    // Non-greedy and non-nested; the format does not support nested `$$`.
    static ref DISPLAY_MATH: Regex =
        Regex::new(r"(?s)\$\$(.+?)\$\$").expect("display math pattern");
    // Inline math does not span lines, which keeps prose dollar signs in
    // separate sentences from pairing up.
    static ref INLINE_MATH: Regex = Regex::new(r"\$([^$\n]+?)\$").expect("inline math pattern");
}

/// Render transformed region content in its Markdown form.
fn render(kind: MathKind, content: &str) -> String {
    match kind {
        MathKind::Display => format!("\n\n```math\n{}\n```\n\n", content.trim()),
        MathKind::Inline => format!("\\({}\\)", content.trim()),
    }
}

/// Rewrite every `$$...$$` region of `text` into a fenced math block.
pub fn convert_display_math(text: &str, warnings: &mut Vec<ConversionWarning>) -> String {
    let out = DISPLAY_MATH.replace_all(text, |caps: &Captures| {
        let content = RULE_TABLE.apply(&caps[1], RulePass::Display);
        render(MathKind::Display, &content)
    });
    let out = out.into_owned();
    if out.contains("$$") {
        warnings.push(ConversionWarning::unterminated_math("$$"));
    }
    out
}

/// Rewrite every remaining `$...$` region of `text` into `\(...\)`.
pub fn convert_inline_math(text: &str, warnings: &mut Vec<ConversionWarning>) -> String {
    let out = INLINE_MATH.replace_all(text, |caps: &Captures| {
        let content = RULE_TABLE.apply(&caps[1], RulePass::Inline);
        render(MathKind::Inline, &content)
    });
    let out = out.into_owned();
    if out.contains('$') {
        warnings.push(ConversionWarning::unterminated_math("$"));
    }
    out
}

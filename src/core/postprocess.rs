//! Whitespace normalization and document-level cosmetic fixes
//!
//! Pure text-to-text rewrites. `collapse_blank_lines` runs per segment;
//! `postprocess_document` runs once over the reassembled document.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Three or more consecutive blank lines (possibly whitespace-only).
    static ref EXCESS_BLANK_LINES: Regex =
        Regex::new(r"(?:\n[ \t]*){4,}").expect("blank line pattern");
    // ATX heading markers with the space missing after the hashes.
    static ref HEADING_MISSING_SPACE: Regex =
        Regex::new(r"(?m)^(#{1,6})([^#\s])").expect("heading pattern");
    // OCR artifact: spaces drifting in front of punctuation.
    static ref SPACE_BEFORE_PUNCT: Regex =
        Regex::new(r"[ \t]+([.,;:!?])(\s|$)").expect("punctuation spacing pattern");
}

/// Collapse runs of three or more blank lines to exactly one blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    EXCESS_BLANK_LINES.replace_all(text, "\n\n").into_owned()
}

/// Cosmetic whole-document rewrites, applied after segment reassembly.
pub fn postprocess_document(text: &str) -> String {
    let text = HEADING_MISSING_SPACE.replace_all(text, "${1} ${2}");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "${1}${2}");
    collapse_blank_lines(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
        // One or two blank lines are left alone
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\n\nb"), "a\n\n\nb");
    }

    #[test]
    fn test_collapse_handles_whitespace_only_lines() {
        assert_eq!(collapse_blank_lines("a\n \n\t\n  \n\nb"), "a\n\nb");
    }

    #[test]
    fn test_heading_space_fix() {
        assert_eq!(postprocess_document("#Title\n\n##Sub"), "# Title\n\n## Sub");
        // Already well-formed headings are untouched
        assert_eq!(postprocess_document("# Title"), "# Title");
    }

    #[test]
    fn test_space_before_punctuation_collapsed() {
        assert_eq!(postprocess_document("the end ."), "the end.");
        assert_eq!(postprocess_document("wait , what ?"), "wait, what?");
    }

    #[test]
    fn test_decimal_numbers_untouched() {
        assert_eq!(postprocess_document("pi is 3.14"), "pi is 3.14");
    }
}

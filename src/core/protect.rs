//! Placeholder protection and the residual command strip
//!
//! Protected spans (fenced code blocks, rendered math) are masked behind
//! sentinel tokens before destructive passes run, then restored verbatim.
//! The sentinel tokens are built around private-use Unicode characters;
//! any such characters already present in the input are removed up front so
//! a token can never collide with naturally occurring text.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

const SENTINEL_OPEN: char = '\u{E000}';
const SENTINEL_CLOSE: char = '\u{E001}';

lazy_static! {
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?s)```.*?```").expect("fenced block pattern");
    static ref INLINE_MATH_SPAN: Regex =
        Regex::new(r"(?s)\\\(.*?\\\)").expect("inline math span pattern");
    static ref RESIDUAL_COMMAND: Regex =
        Regex::new(r"\\[a-zA-Z]+\*?").expect("residual command pattern");
}

/// An indexed side table of masked spans
pub struct PlaceholderGuard {
    saved: IndexMap<String, String>,
    label: &'static str,
}

impl PlaceholderGuard {
    pub fn new(label: &'static str) -> Self {
        PlaceholderGuard {
            saved: IndexMap::new(),
            label,
        }
    }

    fn token(&self, index: usize) -> String {
        format!("{}{}:{}{}", SENTINEL_OPEN, self.label, index, SENTINEL_CLOSE)
    }

    /// Replace every match of `pattern` with an indexed token, saving the
    /// original span. Pre-existing sentinel characters are dropped from the
    /// input so tokens cannot collide with document text.
    pub fn mask(&mut self, text: &str, pattern: &Regex) -> String {
        let text: String = text
            .chars()
            .filter(|&c| c != SENTINEL_OPEN && c != SENTINEL_CLOSE)
            .collect();
        let mut masked = String::with_capacity(text.len());
        let mut cursor = 0usize;
        for m in pattern.find_iter(&text) {
            masked.push_str(&text[cursor..m.start()]);
            let token = self.token(self.saved.len());
            masked.push_str(&token);
            self.saved.insert(token, m.as_str().to_string());
            cursor = m.end();
        }
        masked.push_str(&text[cursor..]);
        masked
    }

    /// Substitute every saved span back for its token.
    pub fn restore(&self, text: &str) -> String {
        let mut restored = text.to_string();
        for (token, original) in &self.saved {
            restored = restored.replace(token.as_str(), original);
        }
        restored
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

/// Mask fenced code blocks in `text`.
pub fn mask_fenced_blocks(guard: &mut PlaceholderGuard, text: &str) -> String {
    guard.mask(text, &FENCED_BLOCK)
}

/// Strip residual backslash-command tokens from `text`, protecting fenced
/// blocks and rendered inline math spans via the placeholder mechanism.
pub fn strip_residual_commands(text: &str) -> String {
    let mut guard = PlaceholderGuard::new("span");
    let masked = guard.mask(text, &FENCED_BLOCK);
    let masked = guard.mask(&masked, &INLINE_MATH_SPAN);
    let stripped = RESIDUAL_COMMAND.replace_all(&masked, "").into_owned();
    guard.restore(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_and_restore_round_trip() {
        let input = "before\n```\ncode \\alpha\n```\nafter";
        let mut guard = PlaceholderGuard::new("block");
        let masked = mask_fenced_blocks(&mut guard, input);
        assert!(!masked.contains("code"));
        assert!(masked.contains("before"));
        assert_eq!(guard.restore(&masked), input);
    }

    #[test]
    fn test_strip_removes_prose_commands() {
        let out = strip_residual_commands(r"stray \foobar command \baz{x}");
        assert_eq!(out, "stray  command {x}");
    }

    #[test]
    fn test_strip_protects_fenced_blocks() {
        let input = "prose \\unknowncmd\n\n```\nliteral \\alpha\n```\n";
        let out = strip_residual_commands(input);
        assert!(out.contains("literal \\alpha"));
        assert!(!out.contains("\\unknowncmd"));
    }

    #[test]
    fn test_strip_protects_inline_math_spans() {
        let input = r"kept \(x \oddcmd y\) but \gone here";
        let out = strip_residual_commands(input);
        assert!(out.contains(r"\(x \oddcmd y\)"));
        assert!(!out.contains(r"\gone"));
    }

    #[test]
    fn test_sentinel_characters_cannot_collide() {
        let input = format!("text {}span:0{} more ```code```", '\u{E000}', '\u{E001}');
        let mut guard = PlaceholderGuard::new("span");
        let masked = guard.mask(&input, &FENCED_BLOCK);
        let restored = guard.restore(&masked);
        // The literal sentinel characters are dropped, the code block survives.
        assert_eq!(restored, "text span:0 more ```code```");
    }

    #[test]
    fn test_starred_commands_stripped() {
        let out = strip_residual_commands(r"a \section*{T} b");
        assert_eq!(out, "a {T} b");
    }
}

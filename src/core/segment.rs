//! Region segmenter
//!
//! Splits a document into an ordered sequence of segments: `Preserve`
//! segments (image descriptions, figure captions) that must pass through
//! verbatim, and `Process` segments handed to the rule engine. Segments are
//! contiguous, non-overlapping, and cover the entire input.

use lazy_static::lazy_static;
use regex::Regex;

/// What the pipeline is allowed to do with a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Copied verbatim into the output
    Preserve,
    /// Transformed by the rule engine
    Process,
}

/// One contiguous span of the input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
    /// Byte offset of the span start in the original input
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
}

impl Segment {
    fn preserve(text: &str, start: usize, end: usize) -> Self {
        Segment {
            kind: SegmentKind::Preserve,
            text: text.to_string(),
            start,
            end,
        }
    }

    fn process(text: &str, start: usize, end: usize) -> Self {
        Segment {
            kind: SegmentKind::Process,
            text: text.to_string(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

lazy_static! {
    // Each protected span runs from its marker to the next blank line or end
    // of text. Non-greedy, so one caption cannot swallow the rest of the
    // document.
    static ref PROTECTED_SPANS: Vec<Regex> = vec![
        Regex::new(r"(?s)\*\*Image Description:?\*\*.*?(?:\n[ \t]*\n|\z)")
            .expect("image description pattern"),
        Regex::new(r"(?s)Figure \d+:.*?(?:\n[ \t]*\n|\z)").expect("figure caption pattern"),
    ];
}

/// Split `input` into an ordered sequence of segments.
///
/// Concatenating the segments' `text` fields in order reconstructs the
/// input exactly.
pub fn segment(input: &str) -> Vec<Segment> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for pattern in PROTECTED_SPANS.iter() {
        for m in pattern.find_iter(input) {
            spans.push((m.start(), m.end()));
        }
    }
    spans.sort();

    // A marker starting inside an earlier protected span is already covered.
    let mut protected: Vec<(usize, usize)> = Vec::new();
    for (start, end) in spans {
        if let Some(&(_, prev_end)) = protected.last() {
            if start < prev_end {
                continue;
            }
        }
        protected.push((start, end));
    }

    let mut segments = Vec::new();
    let mut cursor = 0usize;
    for (start, end) in protected {
        if start > cursor {
            segments.push(Segment::process(&input[cursor..start], cursor, start));
        }
        segments.push(Segment::preserve(&input[start..end], start, end));
        cursor = end;
    }
    if cursor < input.len() || segments.is_empty() {
        segments.push(Segment::process(&input[cursor..], cursor, input.len()));
    }
    segments
}

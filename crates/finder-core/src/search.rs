//! Substring scanning over flattened surface text.
//!
//! This module provides the pure scanning half of the engine: given the surface's flattened
//! text and a [`SearchQuery`], it produces ordered, non-overlapping match spans. All public
//! inputs/outputs use **character offsets** (Unicode scalar values), not byte offsets.
//!
//! Queries are plain substrings. They are escaped and compiled into a regex once, when the
//! query is constructed, and matched case-sensitively; regex syntax is never interpreted.

use regex::Regex;

/// A compiled search query.
///
/// The empty string means "no active search": it compiles to no pattern, and every scan over
/// it returns no matches. This short-circuit is load-bearing — a literal empty needle would
/// otherwise match at every position without ever advancing the scan.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    text: String,
    pattern: Option<Regex>,
}

impl SearchQuery {
    /// Compile a literal (escaped, case-sensitive) query.
    ///
    /// Compilation of an escaped literal only fails on pathological inputs (the regex size
    /// limit); such a query behaves like "no matches" rather than surfacing an error.
    pub fn new(text: &str) -> Self {
        let pattern = if text.is_empty() {
            None
        } else {
            Regex::new(&regex::escape(text)).ok()
        };
        Self {
            text: text.to_string(),
            pattern,
        }
    }

    /// Create an inactive query (equivalent to `SearchQuery::new("")`).
    pub fn inactive() -> Self {
        Self::new("")
    }

    /// The raw query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if this query can produce matches.
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }
}

/// One occurrence of the query in the flattened text, as a (start, length) pair in
/// character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// Start character offset (inclusive).
    pub start: usize,
    /// Match length in characters.
    pub len: usize,
}

impl MatchSpan {
    /// Exclusive end character offset.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns `true` if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .cloned()
            .unwrap_or(self.text_len)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }
}

/// Find the next occurrence of `query` in `text`, searching forward from `from_char`.
///
/// Returns `None` when the query is inactive or no further occurrence exists. This is the
/// single-step form used by the interleaved rebuild: one span is resolved against the
/// surface's *current* content before the next scan starts.
pub fn scan_next(text: &str, query: &SearchQuery, from_char: usize) -> Option<MatchSpan> {
    let re = query.pattern.as_ref()?;
    let index = CharIndex::new(text);

    let mut start_char = from_char.min(index.char_count());
    loop {
        let start_byte = index.char_to_byte(start_char);
        let m = re.find_at(text, start_byte)?;

        let start = index.byte_to_char(m.start());
        let end = index.byte_to_char(m.end());
        if end <= start {
            // Escaped literals cannot produce empty matches; keep the scan finite anyway.
            if start >= index.char_count() {
                return None;
            }
            start_char = start + 1;
            continue;
        }

        return Some(MatchSpan {
            start,
            len: end - start,
        });
    }
}

/// Find all occurrences of `query` in `text`.
///
/// - Returns an empty list when the query is inactive.
/// - Spans are in strictly increasing document order and never overlap: after a match ending
///   at offset `E`, the next search resumes at `E`.
/// - Pure function of its two inputs; no surface involvement.
pub fn scan(text: &str, query: &SearchQuery) -> Vec<MatchSpan> {
    let Some(re) = query.pattern.as_ref() else {
        return Vec::new();
    };
    let index = CharIndex::new(text);

    re.find_iter(text)
        .map(|m| {
            let start = index.byte_to_char(m.start());
            let end = index.byte_to_char(m.end());
            MatchSpan {
                start,
                len: end.saturating_sub(start),
            }
        })
        .filter(|span| !span.is_empty())
        .collect()
}

#![warn(missing_docs)]
//! `finder-surface-simple` - Simple in-memory [`TextSurface`] for `finder-core`.
//!
//! Models the editable surface as an ordered list of segments: plain text runs interleaved
//! with highlight markers. Wrapping splits the containing run around a new marker;
//! unwrapping restores the marker's text in place; normalization merges adjacent runs and
//! drops empty residue. Selection and scrolling are recorded rather than rendered, so hosts
//! (and tests) can observe them through [`SimpleSurface::selection`].
//!
//! Intended for hosts without a native marker-capable surface, and for exercising the engine
//! end to end.
//!
//! # Quick Start
//!
//! ```rust
//! use finder_core::{FindEngine, TextSurface};
//! use finder_surface_simple::SimpleSurface;
//!
//! let mut engine = FindEngine::new(SimpleSurface::new("catcat"));
//! engine.set_query("cat");
//! assert_eq!(engine.match_count(), 2);
//!
//! engine.replace_all("dog");
//! assert_eq!(engine.surface().flattened_text(), "dogdog");
//! assert_eq!(engine.match_count(), 0);
//! ```

use finder_core::{HighlightHandle, SurfaceError, TextSurface};

#[derive(Debug, Clone)]
enum Segment {
    Run(String),
    Highlight { handle: HighlightHandle, text: String },
}

impl Segment {
    fn text(&self) -> &str {
        match self {
            Segment::Run(text) => text,
            Segment::Highlight { text, .. } => text,
        }
    }

    fn text_mut(&mut self) -> &mut String {
        match self {
            Segment::Run(text) => text,
            Segment::Highlight { text, .. } => text,
        }
    }

    fn char_len(&self) -> usize {
        self.text().chars().count()
    }
}

/// Byte offset of `char_offset` within `text`, clamped to the end.
fn byte_at(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// A segment-based in-memory text surface.
///
/// Offsets in every operation are character offsets over the flattened content (all marker
/// texts included, marker structure ignored), matching the [`TextSurface`] contract.
#[derive(Debug, Clone, Default)]
pub struct SimpleSurface {
    segments: Vec<Segment>,
    next_handle: u64,
    selection: Option<HighlightHandle>,
}

impl SimpleSurface {
    /// Create a surface over `text`.
    pub fn new(text: &str) -> Self {
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Run(text.to_string())]
        };
        Self {
            segments,
            next_handle: 0,
            selection: None,
        }
    }

    /// Total flattened content length in characters.
    pub fn char_count(&self) -> usize {
        self.segments.iter().map(Segment::char_len).sum()
    }

    /// Number of live highlight markers.
    pub fn highlight_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Highlight { .. }))
            .count()
    }

    /// The text currently wrapped by `handle`, if the marker is live.
    pub fn highlight_text(&self, handle: HighlightHandle) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Highlight { handle: h, text } if *h == handle => Some(text.as_str()),
            _ => None,
        })
    }

    /// The marker the user-visible selection currently sits on, if any.
    pub fn selection(&self) -> Option<HighlightHandle> {
        self.selection
    }

    /// Insert `text` at `offset` in the flattened content.
    ///
    /// An offset on a run/marker boundary attaches to the earlier segment; an offset inside
    /// a marker grows the marker's text (markers are live content, not read-only overlays).
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), SurfaceError> {
        if offset > self.char_count() {
            return Err(SurfaceError::OutOfBounds {
                start: offset,
                len: 0,
            });
        }
        if self.segments.is_empty() {
            if !text.is_empty() {
                self.segments.push(Segment::Run(text.to_string()));
            }
            return Ok(());
        }

        let mut pos = 0;
        for segment in &mut self.segments {
            let seg_len = segment.char_len();
            if offset > pos + seg_len {
                pos += seg_len;
                continue;
            }
            // offset <= char_count, so some segment always takes the insertion.
            let local = byte_at(segment.text(), offset - pos);
            segment.text_mut().insert_str(local, text);
            break;
        }
        Ok(())
    }

    /// Delete `len` characters starting at `start` in the flattened content.
    ///
    /// The range may span runs and markers; a marker whose text is fully deleted stays live
    /// with empty text.
    pub fn delete(&mut self, start: usize, len: usize) -> Result<(), SurfaceError> {
        let end = start + len;
        if end > self.char_count() {
            return Err(SurfaceError::OutOfBounds { start, len });
        }

        let mut pos = 0;
        for segment in &mut self.segments {
            let seg_len = segment.char_len();
            let seg_start = pos;
            let seg_end = pos + seg_len;
            pos = seg_end;

            let cut_start = start.max(seg_start);
            let cut_end = end.min(seg_end);
            if cut_start >= cut_end {
                continue;
            }

            let text = segment.text_mut();
            let byte_start = byte_at(text, cut_start - seg_start);
            let byte_end = byte_at(text, cut_end - seg_start);
            text.replace_range(byte_start..byte_end, "");
        }
        Ok(())
    }

    fn find_highlight(&mut self, handle: HighlightHandle) -> Option<usize> {
        self.segments.iter().position(|segment| {
            matches!(segment, Segment::Highlight { handle: h, .. } if *h == handle)
        })
    }

    fn alloc_handle(&mut self) -> HighlightHandle {
        let handle = HighlightHandle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl TextSurface for SimpleSurface {
    fn flattened_text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    fn wrap(&mut self, start: usize, len: usize) -> Result<HighlightHandle, SurfaceError> {
        let total = self.char_count();
        if start + len > total {
            return Err(SurfaceError::OutOfBounds { start, len });
        }

        let mut pos = 0;
        for i in 0..self.segments.len() {
            let seg_len = self.segments[i].char_len();
            if start >= pos + seg_len {
                pos += seg_len;
                continue;
            }

            let Segment::Run(text) = &self.segments[i] else {
                return Err(SurfaceError::SplitsMarker { start, len });
            };
            let local = start - pos;
            if local + len > seg_len {
                return Err(SurfaceError::SplitsMarker { start, len });
            }

            let byte_start = byte_at(text, local);
            let byte_end = byte_at(text, local + len);
            let before = text[..byte_start].to_string();
            let wrapped = text[byte_start..byte_end].to_string();
            let after = text[byte_end..].to_string();

            let handle = self.alloc_handle();
            let mut replacement = Vec::with_capacity(3);
            if !before.is_empty() {
                replacement.push(Segment::Run(before));
            }
            replacement.push(Segment::Highlight {
                handle,
                text: wrapped,
            });
            if !after.is_empty() {
                replacement.push(Segment::Run(after));
            }
            self.segments.splice(i..=i, replacement);
            return Ok(handle);
        }

        // start == total: only a zero-length marker fits here.
        if len == 0 {
            let handle = self.alloc_handle();
            self.segments.push(Segment::Highlight {
                handle,
                text: String::new(),
            });
            return Ok(handle);
        }
        Err(SurfaceError::OutOfBounds { start, len })
    }

    fn unwrap_highlight(&mut self, handle: HighlightHandle) -> Result<(), SurfaceError> {
        let Some(index) = self.find_highlight(handle) else {
            return Err(SurfaceError::StaleHandle(handle));
        };
        let text = self.segments[index].text().to_string();
        // An empty marker leaves an empty run behind; normalize() cleans those up.
        self.segments[index] = Segment::Run(text);
        if self.selection == Some(handle) {
            self.selection = None;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            match segment {
                Segment::Run(text) if text.is_empty() => {}
                Segment::Run(text) => {
                    if let Some(Segment::Run(last)) = merged.last_mut() {
                        last.push_str(&text);
                    } else {
                        merged.push(Segment::Run(text));
                    }
                }
                highlight => merged.push(highlight),
            }
        }
        self.segments = merged;
    }

    fn set_highlight_text(
        &mut self,
        handle: HighlightHandle,
        text: &str,
    ) -> Result<(), SurfaceError> {
        let Some(index) = self.find_highlight(handle) else {
            return Err(SurfaceError::StaleHandle(handle));
        };
        *self.segments[index].text_mut() = text.to_string();
        Ok(())
    }

    fn select_and_scroll_to(&mut self, handle: HighlightHandle) -> Result<(), SurfaceError> {
        if self.find_highlight(handle).is_none() {
            return Err(SurfaceError::StaleHandle(handle));
        }
        self.selection = Some(handle);
        Ok(())
    }
}

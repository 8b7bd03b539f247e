//! The text surface adapter consumed by the engine.
//!
//! The surface is the live editable content: plain text interleaved with removable highlight
//! markers. The engine never touches content directly — it goes through [`TextSurface`], and
//! it treats the surface as exclusively owned for the duration of any clear/rebuild call.
//!
//! All offsets are character offsets over the **flattened** content, i.e. the text with all
//! markers conceptually removed. Wrapping and unwrapping must preserve that flattened text
//! exactly; a marker owns no text beyond what it wraps.

use std::fmt;

/// Opaque identity of one live highlight marker in a surface.
///
/// Handles are issued by the surface and remain valid until the marker is unwrapped. A
/// handle that outlives its marker is *stale*; surface operations report this via
/// [`SurfaceError::StaleHandle`] rather than panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HighlightHandle(pub u64);

impl HighlightHandle {
    /// Create a new handle id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Surface adapter errors.
///
/// These are recoverable inconsistencies, not fatal faults: the engine reacts to any of them
/// by clearing its entire highlight state (a partially-wrapped surface is worse than a clean
/// one) and never propagates them to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// The handle no longer identifies a live marker in the surface.
    StaleHandle(HighlightHandle),
    /// The range extends past the end of the flattened content.
    OutOfBounds {
        /// Requested start character offset.
        start: usize,
        /// Requested length in characters.
        len: usize,
    },
    /// The range is not contained in a single unmarked text run (it touches or crosses an
    /// existing marker).
    SplitsMarker {
        /// Requested start character offset.
        start: usize,
        /// Requested length in characters.
        len: usize,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle(handle) => {
                write!(f, "stale highlight handle: {}", handle.0)
            }
            Self::OutOfBounds { start, len } => {
                write!(f, "range {start}+{len} is outside the surface content")
            }
            Self::SplitsMarker { start, len } => {
                write!(f, "range {start}+{len} crosses a highlight marker boundary")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Capability set the engine consumes from the hosting surface.
///
/// Implementations are expected to uphold two contracts:
///
/// 1. **Text preservation**: `wrap` and `unwrap_highlight` never change the flattened text,
///    only the marker structure around it.
/// 2. **Current-content addressing**: `wrap` offsets address the flattened content *as it is
///    at call time*, so the engine may interleave scanning and wrapping one match at a time.
pub trait TextSurface {
    /// Current plain-text content with all markers conceptually removed.
    fn flattened_text(&self) -> String;

    /// Wrap the given range of the current content in a removable marker.
    ///
    /// A zero-length range is valid and produces a marker wrapping no text (the degenerate
    /// empty-match case); unwrapping it restores the content unchanged.
    fn wrap(&mut self, start: usize, len: usize) -> Result<HighlightHandle, SurfaceError>;

    /// Remove the marker, restoring its contained text in place.
    fn unwrap_highlight(&mut self, handle: HighlightHandle) -> Result<(), SurfaceError>;

    /// Merge adjacent plain-text runs and drop empty residue left by removals.
    fn normalize(&mut self);

    /// Overwrite the marker's contained text.
    fn set_highlight_text(
        &mut self,
        handle: HighlightHandle,
        text: &str,
    ) -> Result<(), SurfaceError>;

    /// Move the user-visible selection onto the marker and scroll it into view.
    fn select_and_scroll_to(&mut self, handle: HighlightHandle) -> Result<(), SurfaceError>;
}

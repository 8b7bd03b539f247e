//! The find/replace engine: highlight management, cyclic navigation, replace.
//!
//! # Overview
//!
//! [`FindEngine`] owns a [`TextSurface`] and keeps three pieces of state over it:
//!
//! - the active [`SearchQuery`]
//! - the ordered highlight list (one live marker per match, document order)
//! - the optional current-match index
//!
//! Every state transition funnels through [`rebuild`](FindEngine::rebuild): clear the old
//! markers, re-scan the current content, materialize new markers. Scanning and wrapping are
//! interleaved one match at a time, so each span is resolved against the surface content as
//! it is *after* the previous wrap.
//!
//! # Data flow
//!
//! The engine follows a unidirectional pattern: the host drives it through commands
//! ([`set_query`](FindEngine::set_query), [`find_next`](FindEngine::find_next), ...), edits
//! the underlying content through [`surface_mut`](FindEngine::surface_mut) followed by
//! [`content_changed`](FindEngine::content_changed), and observes results through the
//! [`subscribe`](FindEngine::subscribe) callback mechanism and the state accessors.
//!
//! # Concurrency
//!
//! Single-threaded and synchronous: each operation runs to completion before the host
//! regains control, so at most one rebuild is ever in flight. Multi-threaded hosts must
//! serialize all engine calls externally — the highlight list and current index are
//! unsynchronized mutable state.

use crate::search::{self, SearchQuery};
use crate::surface::{HighlightHandle, TextSurface};

/// State change type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchChangeType {
    /// The highlight list was rebuilt (query change, content change, or replace).
    HighlightsRebuilt,
    /// The current-match index moved.
    CurrentChanged,
    /// The engine recovered from a surface inconsistency by clearing all search state.
    SearchCleared,
}

/// State change record passed to subscribers.
#[derive(Debug, Clone, Copy)]
pub struct SearchStateChange {
    /// Change type.
    pub change_type: SearchChangeType,
    /// Highlight count after the change.
    pub match_count: usize,
    /// Current-match index after the change, if set.
    pub current_index: Option<usize>,
}

/// State change callback function type.
pub type SearchStateCallback = Box<dyn FnMut(&SearchStateChange) + Send>;

/// Find/replace engine over an exclusively-owned [`TextSurface`].
///
/// # Example
///
/// (Using any `TextSurface` implementation, e.g. `finder-surface-simple`.)
///
/// ```text
/// let mut engine = FindEngine::new(surface);
/// engine.set_query("cat");          // scans + highlights every occurrence
/// engine.find_next();               // selects match 0
/// engine.replace_current("dog");    // rewrites it, re-scans, keeps the index
/// ```
pub struct FindEngine<S: TextSurface> {
    /// The hosting surface; exclusively owned for the duration of any engine call.
    surface: S,
    /// Compiled query; inactive when the query text is empty.
    query: SearchQuery,
    /// Live markers in document order, rebuilt on every scan.
    highlights: Vec<HighlightHandle>,
    /// Current-match index; `None` when unset.
    current: Option<usize>,
    /// State change callback list.
    callbacks: Vec<SearchStateCallback>,
}

impl<S: TextSurface> FindEngine<S> {
    /// Create an engine over `surface` with no active search.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            query: SearchQuery::inactive(),
            highlights: Vec::new(),
            current: None,
            callbacks: Vec::new(),
        }
    }

    /// Get a reference to the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Get a mutable reference to the surface, for host-driven edits.
    ///
    /// After editing, call [`content_changed`](Self::content_changed) so the highlight list
    /// is re-scanned against the new content.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The raw text of the active query (empty when no search is active).
    pub fn query_text(&self) -> &str {
        self.query.text()
    }

    /// Number of live highlights.
    pub fn match_count(&self) -> usize {
        self.highlights.len()
    }

    /// The current-match index, if set.
    ///
    /// After a replace-triggered rebuild this is preserved by numeric value and may exceed
    /// the new highlight count; selection and navigation treat that residue as unset.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The marker at the current index, if the index is set and in range.
    pub fn current_highlight(&self) -> Option<HighlightHandle> {
        self.highlights.get(self.current?).copied()
    }

    /// Subscribe to search state changes.
    ///
    /// Callbacks fire synchronously after rebuilds, navigation, and recovery.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SearchStateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Set the search query. No-op when `text` equals the current query text; otherwise
    /// recompiles the query and rebuilds highlights, resetting the current index.
    pub fn set_query(&mut self, text: &str) {
        if self.query.text() == text {
            return;
        }
        self.query = SearchQuery::new(text);
        self.rebuild(false);
    }

    /// Notify the engine that the surface content changed through an external edit.
    ///
    /// This is the synchronous equivalent of a content-changed callback registered with the
    /// surface: the host invokes it after every free-form edit, and the engine rebuilds with
    /// the current index reset (the user's place is no longer meaningful).
    pub fn content_changed(&mut self) {
        self.rebuild(false);
    }

    /// Remove every live highlight, restoring the wrapped text in place, then normalize the
    /// surface. Resets the current index unless `preserve_index` is set.
    pub fn clear(&mut self, preserve_index: bool) {
        for handle in std::mem::take(&mut self.highlights) {
            // A marker the host already removed is not a fault during teardown.
            let _ = self.surface.unwrap_highlight(handle);
        }
        self.surface.normalize();
        if !preserve_index {
            self.current = None;
        }
    }

    /// Clear and re-scan: materialize one highlight per match of the active query in the
    /// current surface content, in document order.
    ///
    /// Scanning and wrapping are interleaved: each iteration re-reads the flattened text and
    /// resolves the next span at-or-after the previous span's end. The adapter contract makes
    /// wrapping text-preserving, so the running offset stays valid while the scan still sees
    /// the surface as restructured by earlier wraps. Any wrap failure aborts into full
    /// recovery (all search state cleared).
    pub fn rebuild(&mut self, preserve_index: bool) {
        self.clear(preserve_index);

        if self.query.is_active() {
            let mut from = 0;
            loop {
                let text = self.surface.flattened_text();
                let Some(span) = search::scan_next(&text, &self.query, from) else {
                    break;
                };
                match self.surface.wrap(span.start, span.len) {
                    Ok(handle) => {
                        self.highlights.push(handle);
                        from = span.end();
                    }
                    Err(_) => {
                        self.recover();
                        return;
                    }
                }
            }
        }

        self.notify(SearchChangeType::HighlightsRebuilt);
    }

    /// Advance to the next match, wrapping past the last back to the first, then select it.
    ///
    /// No-op when there are no highlights; the index stays unset and nothing raises.
    pub fn find_next(&mut self) {
        let n = self.highlights.len() as i64;
        if n == 0 {
            return;
        }
        let at = self.current.map_or(-1, |index| index as i64);
        self.current = Some(((at + 1).rem_euclid(n)) as usize);
        self.select_current();
        self.notify(SearchChangeType::CurrentChanged);
    }

    /// Step back to the previous match, wrapping before the first to the last, then select it.
    ///
    /// No-op when there are no highlights.
    pub fn find_previous(&mut self) {
        let n = self.highlights.len() as i64;
        if n == 0 {
            return;
        }
        let at = self.current.map_or(0, |index| index as i64);
        self.current = Some(((at - 1).rem_euclid(n)) as usize);
        self.select_current();
        self.notify(SearchChangeType::CurrentChanged);
    }

    /// Move the user-visible selection onto the current highlight and scroll it into view.
    ///
    /// No-op when the index is unset or out of range (the numeric residue a shrinking
    /// replace rebuild can leave behind).
    pub fn select_current(&mut self) {
        let Some(index) = self.current else {
            return;
        };
        let Some(&handle) = self.highlights.get(index) else {
            return;
        };
        if self.surface.select_and_scroll_to(handle).is_err() {
            self.recover();
        }
    }

    /// Overwrite the current highlight's text with `text`, then rebuild.
    ///
    /// No-op when the current index is unset or out of range. The replacement participates
    /// in the re-scan like any other content, so a replacement that still contains the query
    /// is re-highlighted. The current index is preserved by numeric value across the rebuild
    /// — positional, not identity, preservation.
    pub fn replace_current(&mut self, text: &str) {
        let Some(index) = self.current else {
            return;
        };
        let Some(&handle) = self.highlights.get(index) else {
            return;
        };
        self.select_current();
        if self.surface.set_highlight_text(handle, text).is_err() {
            self.recover();
            return;
        }
        self.rebuild(true);
    }

    /// Overwrite every highlight's text with `text`, then rebuild.
    ///
    /// The current index is preserved by numeric value across the rebuild.
    pub fn replace_all(&mut self, text: &str) {
        let handles = self.highlights.clone();
        for handle in handles {
            if self.surface.set_highlight_text(handle, text).is_err() {
                self.recover();
                return;
            }
        }
        self.rebuild(true);
    }

    /// Fall back to a clean slate after a surface inconsistency: unwrap whatever markers
    /// still respond, drop the list, unset the index. A partially-wrapped surface is worse
    /// than one with no search state at all.
    fn recover(&mut self) {
        self.clear(false);
        self.notify(SearchChangeType::SearchCleared);
    }

    fn notify(&mut self, change_type: SearchChangeType) {
        let change = SearchStateChange {
            change_type,
            match_count: self.highlights.len(),
            current_index: self.current,
        };
        for callback in self.callbacks.iter_mut() {
            callback(&change);
        }
    }
}

#![warn(missing_docs)]
//! Finder Core - Headless Find/Replace Engine
//!
//! # Overview
//!
//! `finder-core` is a headless find/replace kernel for live, mutable text surfaces. It owns
//! no rendering and no I/O: the hosting application supplies the editable content behind the
//! [`TextSurface`] adapter, and the engine keeps incremental substring search, highlight
//! markers, cyclic match navigation, and text-preserving replace consistent over it.
//!
//! # Core Features
//!
//! - **Incremental scanning**: literal, case-sensitive, non-overlapping substring search in
//!   character offsets (Unicode scalar values)
//! - **Highlight management**: one removable marker per match; clearing restores the surface
//!   text exactly
//! - **Cyclic navigation**: next/previous with mandatory wraparound, selection delegated to
//!   the surface
//! - **Replace**: current-match and all-matches rewrite, followed by a full re-scan
//! - **Change Notifications**: synchronous subscription callbacks after every state change
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  FindEngine (queries, commands, callbacks)  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Highlight list + current index             │  ← Search State
//! ├─────────────────────────────────────────────┤
//! │  Match Scanner (escaped-literal regex)      │  ← Pure Scanning
//! ├─────────────────────────────────────────────┤
//! │  TextSurface adapter (host-provided)        │  ← Live Content
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use finder_core::{SearchQuery, scan};
//!
//! let query = SearchQuery::new("ab");
//! let spans = scan("ababab", &query);
//!
//! let starts: Vec<usize> = spans.iter().map(|span| span.start).collect();
//! assert_eq!(starts, vec![0, 2, 4]);
//! ```
//!
//! For the full engine, pair [`FindEngine`] with a [`TextSurface`] implementation — e.g. the
//! segment-based in-memory surface in `finder-surface-simple`.
//!
//! # Module Description
//!
//! - [`search`] - pure substring scanning over flattened text
//! - [`surface`] - the text surface adapter trait and error taxonomy
//! - [`engine`] - highlight management, navigation, replace, notifications
//!
//! # Error Model
//!
//! This is a best-effort UI feature, not a system with recoverable failure modes. Empty or
//! uncompilable queries mean "no matches"; navigation and replace against an empty match set
//! are no-ops; any surface inconsistency degrades to "search state cleared" and never
//! propagates to the host.

pub mod engine;
pub mod search;
pub mod surface;

pub use engine::{FindEngine, SearchChangeType, SearchStateCallback, SearchStateChange};
pub use search::{MatchSpan, SearchQuery, scan, scan_next};
pub use surface::{HighlightHandle, SurfaceError, TextSurface};

#![warn(missing_docs)]
//! Find/Replace Core - Headless Search-and-Replace Engine for Text Buffers
//!
//! # Overview
//!
//! `find-replace-core` implements the find/replace behaviour of a text editor without owning
//! the editor. It talks to the host buffer through the small [`TextBuffer`] trait (selection,
//! caret, a target-range search primitive and selection replacement) and layers on top of it:
//! forward/backward navigation with wrap-around, find-all, single and bulk replacement for
//! literal strings and regular expressions, and a session that caches results, keeps search
//! history and produces status text.
//!
//! All positions are character offsets. "Not found" is always an empty [`TextRange`], never an
//! error; the only error is a regular expression that does not compile.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  SearchSession (results, history, status)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  SearchRequest (mode, scope, escapes)       │  ← User input
//! ├─────────────────────────────────────────────┤
//! │  Query (navigation, wrap, replace)          │  ← Search algorithm
//! ├─────────────────────────────────────────────┤
//! │  LiteralQuery / PatternQuery                │  ← Matchers
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (+ optional undo/mark/highlight)│  ← Host editor
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using Queries Directly
//!
//! ```rust
//! use find_replace_core::{Document, Query, TextBuffer, TextRange};
//!
//! let mut doc = Document::new("one two one");
//! let mut query = Query::literal(doc.whole_range(), "one", true, false);
//!
//! let found = query.find_next(&mut doc, true);
//! assert_eq!(found, TextRange::new(0, 3));
//!
//! let replaced = query.replace_all(&mut doc, "1");
//! assert_eq!(replaced.len(), 2);
//! assert_eq!(doc.text(), "1 two 1");
//! ```
//!
//! ## Using a Session
//!
//! ```rust
//! use find_replace_core::{Document, SearchAction, SearchRequest, SearchSession};
//!
//! let mut doc = Document::new("foo bar foo");
//! let mut session = SearchSession::new();
//! let request = SearchRequest::new("foo");
//!
//! let status = session.execute(&mut doc, &request, SearchAction::FindNext).unwrap();
//! assert_eq!(status.as_deref(), Some("1 out of 2 matches"));
//! assert_eq!(session.find_history().latest(), Some("foo"));
//! ```
//!
//! # Module Description
//!
//! - [`range`] - Character-offset ranges
//! - [`buffer`] - Host buffer trait and optional capabilities
//! - [`document`] - Rope-backed reference buffer with grouped undo
//! - [`search`] - Literal matching over text
//! - [`query`] - Literal and regular-expression queries
//! - [`request`] - User-level requests (mode, scope, flags)
//! - [`session`] - Result caching, history and status text
//! - [`history`] - Most-recently-used string lists
//! - [`escape`] - Extended-mode escape expansion
//! - [`fuzzy`] - Suggestion matching for autocomplete lists
//! - [`error`] - Error types

pub mod buffer;
pub mod document;
pub mod error;
pub mod escape;
pub mod fuzzy;
pub mod history;
pub mod query;
pub mod range;
pub mod request;
pub mod search;
pub mod session;

pub use buffer::{Highlighting, Marking, TextBuffer, UndoGuard, UndoScope};
pub use document::{Document, DocumentConfig};
pub use error::{Result, SearchError};
pub use escape::expand_escapes;
pub use history::{DEFAULT_HISTORY_CAPACITY, History};
pub use query::{LiteralQuery, PatternOptions, PatternQuery, Query, QueryKind};
pub use range::TextRange;
pub use request::{SearchMode, SearchRequest, SearchScope};
pub use search::{LiteralSearcher, SearchOptions};
pub use session::{HistoryUpdate, SearchAction, SearchSession, SessionConfig, SessionState};

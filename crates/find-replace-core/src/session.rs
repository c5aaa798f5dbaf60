//! Find/replace orchestration.
//!
//! [`SearchSession`] sits between a UI and the query engine. It remembers the last executed
//! query and its full result set (so repeated navigation does not rescan the document), keeps
//! the find/replace history, forwards mark/highlight requests to the buffer when it supports
//! them, and turns outcomes into status strings.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --(first find/replace)--> Active --(invalidate)--> Stale --(next find/replace)--> Active
//!   ^                                                                                      |
//!   +-------------------------------------------(clear)------------------------------------+
//! ```
//!
//! The session never observes the buffer on its own: the owner must call
//! [`SearchSession::invalidate`] after external edits or when switching to another buffer.

use crate::buffer::TextBuffer;
use crate::error::{Result, SearchError};
use crate::history::{DEFAULT_HISTORY_CAPACITY, History};
use crate::query::Query;
use crate::range::TextRange;
use crate::request::SearchRequest;

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Capacity of the find and replace histories.
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Where a session is in its query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No query has run since creation or the last [`SearchSession::clear`].
    Idle,
    /// Results match the current query and buffer.
    Active,
    /// The buffer changed; results are recomputed on the next operation.
    Stale,
}

/// Which history lists an operation feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryUpdate<'a> {
    /// A find operation: record the find text.
    Find(&'a str),
    /// A replace operation: record both texts.
    Replace {
        /// Find text.
        find: &'a str,
        /// Replacement text.
        replace: &'a str,
    },
}

/// A user-level action for [`SearchSession::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    /// Select the next match.
    FindNext,
    /// Select the previous match.
    FindPrevious,
    /// Collect every match, optionally marking lines and highlighting spans.
    FindAll {
        /// Mark the lines of every match.
        mark: bool,
        /// Highlight every match.
        highlight: bool,
    },
    /// Replace the selected match and select the next one.
    Replace,
    /// Replace every match.
    ReplaceAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResultStyle {
    mark: bool,
    highlight: bool,
}

impl Default for ResultStyle {
    fn default() -> Self {
        Self {
            mark: false,
            highlight: true,
        }
    }
}

/// Orchestrates queries against one buffer at a time.
#[derive(Debug)]
pub struct SearchSession {
    current_query: Option<Query>,
    current_results: Vec<TextRange>,
    find_history: History,
    replace_history: History,
    needs_recompute: bool,
    style: ResultStyle,
    pinned_scope: Option<TextRange>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    /// Create an idle session with default settings.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create an idle session.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            current_query: None,
            current_results: Vec::new(),
            find_history: History::new(config.history_capacity),
            replace_history: History::new(config.history_capacity),
            needs_recompute: true,
            style: ResultStyle::default(),
            pinned_scope: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        match (&self.current_query, self.needs_recompute) {
            (None, _) => SessionState::Idle,
            (Some(_), true) => SessionState::Stale,
            (Some(_), false) => SessionState::Active,
        }
    }

    /// The last executed query.
    pub fn current_query(&self) -> Option<&Query> {
        self.current_query.as_ref()
    }

    /// Matches of the last executed query, ascending by start offset.
    pub fn current_results(&self) -> &[TextRange] {
        &self.current_results
    }

    /// Recently used find strings, newest first.
    pub fn find_history(&self) -> &History {
        &self.find_history
    }

    /// Recently used replacement strings, newest first.
    pub fn replace_history(&self) -> &History {
        &self.replace_history
    }

    /// Forget both histories.
    pub fn clear_history(&mut self) {
        self.find_history.clear();
        self.replace_history.clear();
    }

    /// Record the find text of a find operation.
    pub fn add_find_history(&mut self, find: &str) {
        self.find_history.add(find);
    }

    /// Record the texts of a replace operation.
    pub fn add_replace_history(&mut self, find: &str, replace: &str) {
        self.find_history.add(find);
        self.replace_history.add(replace);
    }

    fn record_history(&mut self, update: HistoryUpdate<'_>) {
        match update {
            HistoryUpdate::Find(find) => self.add_find_history(find),
            HistoryUpdate::Replace { find, replace } => self.add_replace_history(find, replace),
        }
    }

    /// Force the next operation to rescan the buffer.
    ///
    /// Call after the buffer was edited outside the session or replaced by another one.
    pub fn invalidate(&mut self) {
        self.needs_recompute = true;
    }

    /// Recompute results for `query` if it differs from the current query or the session is
    /// stale; otherwise return the cached results.
    ///
    /// Marks and highlights are reapplied (or cleared) whenever the results are recomputed.
    pub fn update_results<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        query: &Query,
        mark: bool,
        highlight: bool,
    ) -> &[TextRange] {
        if self.needs_recompute || self.current_query.as_ref() != Some(query) {
            self.current_results = query.find_all(buffer);
            self.current_query = Some(query.clone());
            self.style = ResultStyle { mark, highlight };
            log::debug!(
                "recomputed {} result(s) for '{}' in {}",
                self.current_results.len(),
                query,
                query.search_range()
            );

            if highlight {
                self.highlight(buffer, &self.current_results);
            } else {
                self.clear_all_highlights(buffer);
            }
            if mark {
                self.mark(buffer, &self.current_results);
            } else {
                self.clear_all_marks(buffer);
            }
        }

        self.needs_recompute = false;
        &self.current_results
    }

    fn refresh<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B, query: &Query) {
        let ResultStyle { mark, highlight } = self.style;
        self.invalidate();
        self.update_results(buffer, query, mark, highlight);
    }

    /// First match of `query` in the given direction.
    pub fn find<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        query: &mut Query,
        search_up: bool,
    ) -> TextRange {
        query.set_search_up(search_up);
        self.update_results(buffer, query, false, true);
        query.find(buffer)
    }

    /// All matches of `query`.
    pub fn find_all<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        query: &Query,
        mark: bool,
        highlight: bool,
    ) -> &[TextRange] {
        self.update_results(buffer, query, mark, highlight)
    }

    /// See [`Query::find_next`].
    ///
    /// Unlike the query method, the search range of `query` is left as it was, so the same
    /// query can be passed again without invalidating the cached results.
    pub fn find_next<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        query: &mut Query,
        wrap: bool,
    ) -> TextRange {
        self.update_results(buffer, query, false, true);
        Self::keep_range(query, |query| query.find_next(buffer, wrap))
    }

    /// See [`Query::find_previous`]. The search range of `query` is left as it was.
    pub fn find_previous<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        query: &mut Query,
        wrap: bool,
    ) -> TextRange {
        self.update_results(buffer, query, false, true);
        Self::keep_range(query, |query| query.find_previous(buffer, wrap))
    }

    fn keep_range(query: &mut Query, step: impl FnOnce(&mut Query) -> TextRange) -> TextRange {
        let range = query.search_range();
        let found = step(query);
        query.set_search_range(range);
        found
    }

    /// See [`Query::replace`]. Results are recomputed when the buffer changed.
    ///
    /// The search range of `query` only changes by the length difference of the replacement.
    pub fn replace<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        query: &mut Query,
        replacement: &str,
        wrap: bool,
    ) -> TextRange {
        self.update_results(buffer, query, false, true);

        let before = query.search_range();
        if query.replace_selected(buffer, replacement) {
            self.follow_pinned_scope(before, query.search_range());
            self.refresh(buffer, query);
        }
        Self::keep_range(query, |query| query.find_next(buffer, wrap))
    }

    /// See [`Query::replace_all`]. Results are recomputed afterwards.
    pub fn replace_all<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        query: &Query,
        replacement: &str,
    ) -> Vec<TextRange> {
        let len_before = buffer.len_chars();
        let results = query.replace_all(buffer, replacement);

        // Every edit happened inside the range, so its end moves by the document's growth.
        let before = query.search_range().normalized();
        let end = (before.end + buffer.len_chars()).saturating_sub(len_before);
        let after = TextRange::new(before.start, end);
        self.follow_pinned_scope(before, after);

        let mut scope = query.clone();
        scope.set_search_range(after);
        self.refresh(buffer, &scope);
        results
    }

    fn follow_pinned_scope(&mut self, before: TextRange, after: TextRange) {
        if self.pinned_scope == Some(before) {
            self.pinned_scope = Some(after);
        }
    }

    /// Forget the current query and results and remove marks and highlights.
    pub fn clear<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B) -> &[TextRange] {
        self.clear_all_marks(buffer);
        self.clear_all_highlights(buffer);
        self.current_query = None;
        self.current_results.clear();
        self.pinned_scope = None;
        self.needs_recompute = true;
        &self.current_results
    }

    /// Highlight `ranges`, replacing existing highlights. No-op if unsupported.
    pub fn highlight<B: TextBuffer + ?Sized>(&self, buffer: &mut B, ranges: &[TextRange]) {
        if let Some(highlighting) = buffer.highlighting() {
            highlighting.clear_all_highlights();
            highlighting.highlight(ranges);
        }
    }

    /// Mark the lines of `ranges`, replacing existing marks. No-op if unsupported.
    pub fn mark<B: TextBuffer + ?Sized>(&self, buffer: &mut B, ranges: &[TextRange]) {
        if let Some(marking) = buffer.marking() {
            marking.clear_all_marks();
            marking.mark(ranges);
        }
    }

    /// Remove every highlight. No-op if unsupported.
    pub fn clear_all_highlights<B: TextBuffer + ?Sized>(&self, buffer: &mut B) {
        if let Some(highlighting) = buffer.highlighting() {
            highlighting.clear_all_highlights();
        }
    }

    /// Remove every mark. No-op if unsupported.
    pub fn clear_all_marks<B: TextBuffer + ?Sized>(&self, buffer: &mut B) {
        if let Some(marking) = buffer.marking() {
            marking.clear_all_marks();
        }
    }

    /// `"{i} out of {n} matches"` for a range present in the current results, else empty.
    pub fn index_string(&self, range: TextRange) -> String {
        if range.is_empty() {
            return String::new();
        }
        match self.current_results.binary_search(&range) {
            Ok(index) => format!(
                "{} out of {} matches",
                index + 1,
                self.current_results.len()
            ),
            Err(_) => String::new(),
        }
    }

    /// Returns `true` if `range` lies on the far side of the selection for the given
    /// direction, i.e. the search crossed a boundary to reach it.
    pub fn has_wrapped<B: TextBuffer + ?Sized>(
        &self,
        buffer: &B,
        range: TextRange,
        search_up: bool,
    ) -> bool {
        if search_up {
            range.start > buffer.current_position()
        } else {
            range.start < buffer.anchor_position()
        }
    }

    /// Run a single find/replace step and describe its outcome.
    ///
    /// History is recorded first, so a failed search still contributes to it. The operation
    /// returns `None` when it could not run (e.g. its query could not be built); the status
    /// is then `None` too and the caller keeps whatever it displayed before. On a match the
    /// buffer selection moves to it.
    pub fn run_find_replace<B, F>(
        &mut self,
        buffer: &mut B,
        history: HistoryUpdate<'_>,
        search_up: bool,
        operation: F,
    ) -> Option<String>
    where
        B: TextBuffer + ?Sized,
        F: FnOnce(&mut Self, &mut B) -> Option<TextRange>,
    {
        self.record_history(history);
        let Some(result) = operation(self, buffer) else {
            log::debug!("find/replace aborted");
            return None;
        };

        let status = if result.is_empty() {
            "Match not found".to_string()
        } else {
            let mut status = self.index_string(result);
            if self.has_wrapped(&*buffer, result, search_up) {
                let boundary = if search_up { "bottom" } else { "top" };
                if !status.is_empty() {
                    status.push_str(" | ");
                }
                status.push_str("Wrapped from ");
                status.push_str(boundary);
            }
            buffer.set_selection(result);
            status
        };

        self.needs_recompute = false;
        Some(status)
    }

    /// Run a find-all/replace-all operation and describe its outcome.
    pub fn run_find_replace_all<B, F>(
        &mut self,
        buffer: &mut B,
        history: HistoryUpdate<'_>,
        replace: bool,
        operation: F,
    ) -> Option<String>
    where
        B: TextBuffer + ?Sized,
        F: FnOnce(&mut Self, &mut B) -> Option<Vec<TextRange>>,
    {
        self.record_history(history);
        let Some(results) = operation(self, buffer) else {
            log::debug!("find/replace all aborted");
            return None;
        };

        let status = if results.is_empty() {
            "Match could not be found".to_string()
        } else {
            let verb = if replace { "replaced" } else { "found" };
            format!("Total {verb}: {}", results.len())
        };

        self.needs_recompute = false;
        Some(status)
    }

    fn prepare<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &B,
        request: &SearchRequest,
    ) -> Result<Query> {
        let range = request.resolve_range(buffer, &mut self.pinned_scope);
        request.build_query(range).inspect_err(|err| {
            log::warn!("could not build query for '{}': {err}", request.find_text);
        })
    }

    /// Perform `action` for a user request and return the status text to display.
    ///
    /// An empty find text does nothing (`Ok(None)`). If the query cannot be built the history
    /// is still updated and the error is returned.
    pub fn execute<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        request: &SearchRequest,
        action: SearchAction,
    ) -> Result<Option<String>> {
        if request.find_text.is_empty() {
            return Ok(None);
        }

        let find_history = HistoryUpdate::Find(&request.find_text);
        let replace_history = HistoryUpdate::Replace {
            find: &request.find_text,
            replace: &request.replace_text,
        };
        let replacement = request.effective_replace_text();
        let wrap = request.wrap;
        let mut error: Option<SearchError> = None;
        let mut build = |session: &mut Self, buffer: &B| -> Option<Query> {
            session
                .prepare(buffer, request)
                .map_err(|err| error = Some(err))
                .ok()
        };

        let status = match action {
            SearchAction::FindNext => {
                self.run_find_replace(buffer, find_history, false, |session, buffer| {
                    let mut query = build(session, buffer)?;
                    Some(session.find_next(buffer, &mut query, wrap))
                })
            }
            SearchAction::FindPrevious => {
                self.run_find_replace(buffer, find_history, true, |session, buffer| {
                    let mut query = build(session, buffer)?;
                    Some(session.find_previous(buffer, &mut query, wrap))
                })
            }
            SearchAction::Replace => {
                self.run_find_replace(buffer, replace_history, false, |session, buffer| {
                    let mut query = build(session, buffer)?;
                    Some(session.replace(buffer, &mut query, &replacement, wrap))
                })
            }
            SearchAction::FindAll { mark, highlight } => {
                self.run_find_replace_all(buffer, find_history, false, |session, buffer| {
                    let query = build(session, buffer)?;
                    Some(session.find_all(buffer, &query, mark, highlight).to_vec())
                })
            }
            SearchAction::ReplaceAll => {
                self.run_find_replace_all(buffer, replace_history, true, |session, buffer| {
                    let query = build(session, buffer)?;
                    Some(session.replace_all(buffer, &query, &replacement))
                })
            }
        };

        match error {
            Some(err) => Err(err),
            None => Ok(status),
        }
    }
}

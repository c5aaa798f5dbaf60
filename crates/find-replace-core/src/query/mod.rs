//! Search queries.
//!
//! A [`Query`] couples a matcher ([`QueryKind`]) with the range it searches and a direction.
//! Navigation, find-all and single replacement are implemented once here on top of a single
//! per-matcher primitive that finds one match inside a given range; bulk replacement is
//! matcher-specific because literal and pattern replacement track offsets differently.
//!
//! Not finding anything is never an error: every operation reports it as an empty
//! [`TextRange`] (or an empty list).

mod literal;
mod pattern;

pub use literal::LiteralQuery;
pub use pattern::{PatternOptions, PatternQuery};

use crate::buffer::{TextBuffer, UndoGuard};
use crate::error::Result;
use crate::range::TextRange;

/// The matcher behind a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Fixed string.
    Literal(LiteralQuery),
    /// Regular expression.
    Pattern(PatternQuery),
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(q) => q.fmt(f),
            Self::Pattern(q) => q.fmt(f),
        }
    }
}

/// A search bound to a range of a buffer.
///
/// Two queries are equal when they have the same matcher (including its flags) and the same
/// search range; the direction does not take part in equality.
#[derive(Debug, Clone)]
pub struct Query {
    range: TextRange,
    search_up: bool,
    kind: QueryKind,
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.range == other.range && self.kind == other.kind
    }
}

impl Eq for Query {}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl Query {
    /// Create a query from an existing matcher.
    pub fn new(range: TextRange, kind: QueryKind) -> Self {
        Self {
            range,
            search_up: false,
            kind,
        }
    }

    /// A literal query over `range`.
    pub fn literal(
        range: TextRange,
        text: impl Into<String>,
        match_case: bool,
        whole_word: bool,
    ) -> Self {
        Self::new(
            range,
            QueryKind::Literal(LiteralQuery::new(text, match_case, whole_word)),
        )
    }

    /// A regular-expression query over `range`.
    ///
    /// Fails with [`SearchError::InvalidPattern`](crate::SearchError::InvalidPattern) if the
    /// pattern does not compile; no query is produced in that case.
    pub fn pattern(range: TextRange, pattern: &str, options: PatternOptions) -> Result<Self> {
        Ok(Self::new(
            range,
            QueryKind::Pattern(PatternQuery::new(pattern, options)?),
        ))
    }

    /// The range currently searched.
    pub fn search_range(&self) -> TextRange {
        self.range
    }

    /// Replace the searched range.
    pub fn set_search_range(&mut self, range: TextRange) {
        self.range = range;
    }

    /// `true` if searching from the bottom up.
    pub fn search_up(&self) -> bool {
        self.search_up
    }

    /// Set the search direction.
    pub fn set_search_up(&mut self, search_up: bool) {
        self.search_up = search_up;
    }

    /// The matcher.
    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    fn find_once<B: TextBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        range: TextRange,
        up: bool,
    ) -> TextRange {
        let found = match &self.kind {
            QueryKind::Literal(q) => q.find_in(buffer, range, up),
            QueryKind::Pattern(q) => q.find_in(&*buffer, range, up),
        };
        log::trace!("find '{}' in {} (up: {}) -> {}", self, range, up, found);
        found
    }

    /// First match inside the search range (last match when searching up).
    ///
    /// Returns an empty range when nothing matches. The buffer text is not modified.
    pub fn find<B: TextBuffer + ?Sized>(&self, buffer: &mut B) -> TextRange {
        self.find_once(buffer, self.range, self.search_up)
    }

    /// Next match after the caret.
    ///
    /// If the caret lies outside the search range this is plain [`Query::find`]. Otherwise
    /// the range is narrowed to `[caret, end)` and, if that yields nothing and `wrap` is set,
    /// to `[start, caret)`. The narrowed range is kept so repeated calls advance.
    pub fn find_next<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B, wrap: bool) -> TextRange {
        self.search_up = false;

        let caret = buffer.current_position();
        if !self.range.contains_inclusive(caret) {
            return self.find(buffer);
        }

        let original = self.range;
        self.range = TextRange::new(caret, original.end);
        let mut found = self.find(buffer);

        if found.is_empty() && wrap {
            self.range = TextRange::new(original.start, caret);
            found = self.find(buffer);
        }
        found
    }

    /// Previous match before the anchor.
    ///
    /// Switches the query to upward search. Mirrors [`Query::find_next`], narrowing to
    /// `[start, anchor)` first and wrapping to `[anchor, end)`. An anchor outside the search
    /// range is replaced by the caret.
    pub fn find_previous<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        wrap: bool,
    ) -> TextRange {
        self.search_up = true;

        let caret = buffer.current_position();
        if !self.range.contains_inclusive(caret) {
            return self.find(buffer);
        }

        let mut anchor = buffer.anchor_position();
        if !self.range.contains_inclusive(anchor) {
            anchor = caret;
        }

        let original = self.range;
        self.range = TextRange::new(original.start, anchor);
        let mut found = self.find(buffer);

        if found.is_empty() && wrap {
            self.range = TextRange::new(anchor, original.end);
            found = self.find(buffer);
        }
        found
    }

    /// Every non-overlapping match in the search range, ascending by start offset.
    ///
    /// Each search restarts at the end of the previous match. The query itself is not
    /// changed.
    pub fn find_all<B: TextBuffer + ?Sized>(&self, buffer: &mut B) -> Vec<TextRange> {
        let mut cursor = self.range;
        let mut results = Vec::new();

        loop {
            let found = self.find_once(buffer, cursor, false);
            if found.is_empty() {
                break;
            }
            // A match that does not advance the cursor would repeat forever.
            if found.end <= cursor.start {
                log::warn!("buffer reported {found} outside search cursor {cursor}");
                break;
            }
            results.push(found);
            cursor = TextRange::new(found.end, cursor.end);
        }

        results
    }

    /// Replace the current selection if it is exactly a match, then move to the next match.
    ///
    /// The selection is only replaced when searching the selection itself yields the
    /// selection; anything else (no selection, a stale or partial match) is left untouched.
    /// After a replacement the search range end follows the length change, and an upward
    /// query moves the caret to the start of the replaced text. Returns the result of
    /// [`Query::find_next`].
    pub fn replace<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        replacement: &str,
        wrap: bool,
    ) -> TextRange {
        self.replace_selected(buffer, replacement);
        self.find_next(buffer, wrap)
    }

    /// The replacement half of [`Query::replace`]; returns `true` if the buffer changed.
    pub(crate) fn replace_selected<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        replacement: &str,
    ) -> bool {
        let selection = buffer.selection();
        if selection.is_empty() || selection != self.find_once(buffer, selection, self.search_up) {
            return false;
        }

        let inserted = match &self.kind {
            QueryKind::Literal(q) => q.replace_text(buffer, replacement),
            QueryKind::Pattern(q) => q.replace_text(buffer, replacement),
        };

        if selection.end <= self.range.end {
            self.range.end = self.range.end - selection.len() + inserted;
        }
        if self.search_up {
            buffer.go_to_position(selection.start);
        }
        true
    }

    /// Replace every match in the search range as one undoable action.
    ///
    /// Returns the replaced spans in post-replacement coordinates; each span covers the text
    /// actually inserted. The undo group is opened and closed even when nothing matches.
    pub fn replace_all<B: TextBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        replacement: &str,
    ) -> Vec<TextRange> {
        let mut guard = UndoGuard::new(buffer);
        let results = match &self.kind {
            QueryKind::Literal(q) => q.replace_all(&mut *guard, self.range, replacement),
            QueryKind::Pattern(q) => q.replace_all(&mut *guard, self.range, replacement),
        };
        log::debug!("replaced {} occurrence(s) of '{}'", results.len(), self);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn whole(doc: &Document) -> TextRange {
        doc.whole_range()
    }

    #[test]
    fn test_find_is_idempotent() {
        let mut doc = Document::new("alpha beta alpha");
        let query = Query::literal(whole(&doc), "alpha", true, false);
        let first = query.find(&mut doc);
        let second = query.find(&mut doc);
        assert_eq!(first, TextRange::new(0, 5));
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_up_returns_last_match() {
        let mut doc = Document::new("ab ab ab");
        let mut literal = Query::literal(whole(&doc), "ab", true, false);
        literal.set_search_up(true);
        assert_eq!(literal.find(&mut doc), TextRange::new(6, 8));

        let mut pattern = Query::pattern(whole(&doc), "a.", PatternOptions::default()).unwrap();
        pattern.set_search_up(true);
        assert_eq!(pattern.find(&mut doc), TextRange::new(6, 8));
    }

    #[test]
    fn test_equality_tracks_matcher_and_range() {
        let a = Query::literal(TextRange::new(0, 10), "x", true, false);
        let mut b = Query::literal(TextRange::new(0, 10), "x", true, false);
        b.set_search_up(true);
        assert_eq!(a, b);
        assert_ne!(a, Query::literal(TextRange::new(0, 10), "x", false, false));
        assert_ne!(a, Query::literal(TextRange::new(0, 9), "x", true, false));

        let p = Query::pattern(TextRange::new(0, 10), "x", PatternOptions::default()).unwrap();
        assert_ne!(a, p);
        let q = Query::pattern(TextRange::new(0, 10), "x", PatternOptions::default()).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn test_find_next_keeps_narrowed_range() {
        let mut doc = Document::new("x1 x2 x3");
        let mut query = Query::literal(whole(&doc), "x", true, false);
        doc.go_to_position(2);

        assert_eq!(query.find_next(&mut doc, false), TextRange::new(3, 4));
        assert_eq!(query.search_range(), TextRange::new(2, 8));
    }

    #[test]
    fn test_find_next_with_caret_outside_range() {
        let mut doc = Document::new("x1 x2 x3");
        let mut query = Query::literal(TextRange::new(3, 8), "x", true, false);
        doc.go_to_position(0);
        assert_eq!(query.find_next(&mut doc, true), TextRange::new(3, 4));
        assert_eq!(query.search_range(), TextRange::new(3, 8));
    }

    #[test]
    fn test_find_all_skips_zero_length_pattern_matches() {
        let mut doc = Document::new("a,,b,");
        let query = Query::pattern(whole(&doc), "[a-z]*", PatternOptions::default()).unwrap();
        assert_eq!(
            query.find_all(&mut doc),
            vec![TextRange::new(0, 1), TextRange::new(3, 4)]
        );
    }
}

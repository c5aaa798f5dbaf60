//! Find/replace requests as entered by a user.
//!
//! A [`SearchRequest`] carries the raw find/replace strings together with the dialog-level
//! settings (mode, flags, wrap, scope). The session turns it into a [`Query`] right before
//! each operation.

use crate::buffer::TextBuffer;
use crate::error::Result;
use crate::escape::expand_escapes;
use crate::query::{PatternOptions, Query};
use crate::range::TextRange;

/// How the find text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Plain literal text.
    #[default]
    Normal,
    /// Literal text with `\r`, `\n`, `\t` and `\0` escapes.
    Extended,
    /// Regular expression.
    Pattern(PatternOptions),
}

/// Which part of the document is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// The whole document.
    #[default]
    Document,
    /// The selection at the time of the first search; kept until the session is cleared.
    Selection,
    /// An explicit range.
    Range(TextRange),
}

/// User input for one find/replace action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRequest {
    /// Text (or pattern) to find.
    pub find_text: String,
    /// Replacement text; unused by find actions.
    pub replace_text: String,
    /// Interpretation of `find_text` and `replace_text`.
    pub mode: SearchMode,
    /// Case-sensitive literal matching. Pattern mode uses [`PatternOptions::ignore_case`].
    pub match_case: bool,
    /// Whole-word literal matching.
    pub whole_word: bool,
    /// Continue from the other end after reaching a boundary.
    pub wrap: bool,
    /// Searched part of the document.
    pub scope: SearchScope,
}

impl SearchRequest {
    /// A literal request over the whole document with wrapping enabled.
    pub fn new(find_text: impl Into<String>) -> Self {
        Self {
            find_text: find_text.into(),
            wrap: true,
            ..Self::default()
        }
    }

    /// Set the replacement text.
    pub fn with_replacement(mut self, replace_text: impl Into<String>) -> Self {
        self.replace_text = replace_text.into();
        self
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the scope.
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set literal flags.
    pub fn with_flags(mut self, match_case: bool, whole_word: bool) -> Self {
        self.match_case = match_case;
        self.whole_word = whole_word;
        self
    }

    /// Set wrapping.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// The find text after mode-specific preprocessing.
    pub fn effective_find_text(&self) -> String {
        match self.mode {
            SearchMode::Extended => expand_escapes(&self.find_text).into_owned(),
            _ => self.find_text.clone(),
        }
    }

    /// The replacement text after mode-specific preprocessing.
    pub fn effective_replace_text(&self) -> String {
        match self.mode {
            SearchMode::Extended => expand_escapes(&self.replace_text).into_owned(),
            _ => self.replace_text.clone(),
        }
    }

    /// Resolve the scope against `buffer`; `pinned` is the remembered selection scope.
    pub(crate) fn resolve_range<B: TextBuffer + ?Sized>(
        &self,
        buffer: &B,
        pinned: &mut Option<TextRange>,
    ) -> TextRange {
        match self.scope {
            SearchScope::Document => buffer.whole_range(),
            SearchScope::Range(range) => range,
            SearchScope::Selection => {
                // An empty pin is re-read so a later selection can still define the scope.
                let range = match *pinned {
                    Some(range) if !range.is_empty() => range,
                    _ => buffer.selection(),
                };
                *pinned = Some(range);
                range
            }
        }
    }

    /// Build the query for `range`.
    pub fn build_query(&self, range: TextRange) -> Result<Query> {
        match self.mode {
            SearchMode::Pattern(options) => Query::pattern(range, &self.find_text, options),
            SearchMode::Normal | SearchMode::Extended => Ok(Query::literal(
                range,
                self.effective_find_text(),
                self.match_case,
                self.whole_word,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use crate::query::QueryKind;

    #[test]
    fn test_extended_mode_expands_find_and_replace() {
        let request = SearchRequest::new(r"a\tb")
            .with_replacement(r"\n")
            .with_mode(SearchMode::Extended);
        assert_eq!(request.effective_find_text(), "a\tb");
        assert_eq!(request.effective_replace_text(), "\n");

        let query = request.build_query(TextRange::new(0, 3)).unwrap();
        let QueryKind::Literal(literal) = query.kind() else {
            panic!("expected a literal query");
        };
        assert_eq!(literal.text, "a\tb");
    }

    #[test]
    fn test_pattern_mode_reports_invalid_pattern() {
        let request = SearchRequest::new("(abc").with_mode(SearchMode::Pattern(Default::default()));
        assert!(request.build_query(TextRange::new(0, 3)).is_err());
    }

    #[test]
    fn test_selection_scope_is_pinned() {
        let mut doc = Document::new("one two three");
        doc.set_selection(TextRange::new(4, 13));
        let request = SearchRequest::new("t").with_scope(SearchScope::Selection);

        let mut pinned = None;
        assert_eq!(request.resolve_range(&doc, &mut pinned), TextRange::new(4, 13));

        doc.set_selection(TextRange::new(8, 9));
        assert_eq!(request.resolve_range(&doc, &mut pinned), TextRange::new(4, 13));
    }
}

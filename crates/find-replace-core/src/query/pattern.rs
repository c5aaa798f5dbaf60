use crate::buffer::TextBuffer;
use crate::error::{Result, SearchError};
use crate::range::TextRange;
use crate::search::CharIndex;
use regex::{Regex, RegexBuilder};

/// Flags applied when compiling a [`PatternQuery`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PatternOptions {
    /// Case-insensitive matching.
    pub ignore_case: bool,
    /// `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// Whitespace in the pattern is ignored and `#` starts a comment.
    pub ignore_whitespace: bool,
}

/// Matches a regular expression against a snapshot of the search range.
///
/// Replacement text may refer to capture groups with `$1`, `${1}` or `${name}`; `$$` inserts
/// a literal dollar sign. Zero-length matches are never reported.
#[derive(Debug, Clone)]
pub struct PatternQuery {
    regex: Regex,
    options: PatternOptions,
}

impl PatternQuery {
    /// Compile `pattern`.
    ///
    /// Fails with [`SearchError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str, options: PatternOptions) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(options.ignore_case)
            .multi_line(options.multi_line)
            .dot_matches_new_line(options.dot_matches_new_line)
            .ignore_whitespace(options.ignore_whitespace)
            .build()
            .map_err(|source| SearchError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex, options })
    }

    /// The pattern source.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The flags the pattern was compiled with.
    pub fn options(&self) -> PatternOptions {
        self.options
    }

    /// The compiled expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn find_in<B: TextBuffer + ?Sized>(
        &self,
        buffer: &B,
        range: TextRange,
        up: bool,
    ) -> TextRange {
        let range = range.normalized();
        if range.is_empty() {
            return TextRange::EMPTY;
        }

        let text = buffer.text_range(range);
        let index = CharIndex::new(&text);

        // The engine only scans forward; an upward search keeps the last match.
        let mut found = None;
        for m in self.regex.find_iter(&text) {
            if m.start() == m.end() {
                continue;
            }
            found = Some(TextRange::new(
                range.start + index.byte_to_char(m.start()),
                range.start + index.byte_to_char(m.end()),
            ));
            if !up {
                break;
            }
        }

        found.unwrap_or(TextRange::EMPTY)
    }

    /// Substitute over the whole selection; returns the inserted length in characters.
    pub(crate) fn replace_text<B: TextBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        replacement: &str,
    ) -> usize {
        let selected = buffer.text_range(buffer.selection());
        let substituted = self.regex.replace_all(&selected, replacement);
        buffer.replace_selection(&substituted);
        substituted.chars().count()
    }

    pub(crate) fn replace_all<B: TextBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        range: TextRange,
        replacement: &str,
    ) -> Vec<TextRange> {
        let range = range.normalized();
        let text = buffer.text_range(range);
        let index = CharIndex::new(&text);

        // Matches come from the unmodified snapshot, so each one is shifted by the net length
        // change of every replacement applied before it.
        let mut shift: isize = 0;
        let mut results = Vec::new();

        for caps in self.regex.captures_iter(&text) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            if m.start() == m.end() {
                continue;
            }

            let match_start = index.byte_to_char(m.start());
            let match_len = index.byte_to_char(m.end()) - match_start;

            let mut expanded = String::new();
            caps.expand(replacement, &mut expanded);
            let expanded_len = expanded.chars().count();

            let start = (range.start + match_start).saturating_add_signed(shift);
            buffer.set_selection(TextRange::new(start, start + match_len));
            buffer.replace_selection(&expanded);
            results.push(TextRange::new(start, start + expanded_len));

            shift += expanded_len as isize - match_len as isize;
        }

        results
    }
}

impl PartialEq for PatternQuery {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.options == other.options
    }
}

impl Eq for PatternQuery {}

impl std::fmt::Display for PatternQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

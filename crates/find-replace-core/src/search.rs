//! Low-level literal search helpers.
//!
//! These functions operate over a UTF-8 `&str` using **character offsets** (not byte offsets)
//! for all public inputs/outputs. They back the native literal search of
//! [`Document`](crate::Document) and the offset translation of pattern queries. Matching is
//! restricted to a character range of the haystack, while whole-word checks still look at the
//! characters just outside that range.

use crate::range::TextRange;
use regex::{Regex, RegexBuilder};

/// Options that control how a literal search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (alphanumeric and `_`).
    pub whole_word: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
        }
    }
}

#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .cloned()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    pub(crate) fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        let end = self.char_to_byte[char_offset + 1];
        text.get(start..end)?.chars().next()
    }
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, index: &CharIndex, m: TextRange) -> bool {
    if m.is_empty() {
        return false;
    }

    let before = if m.start == 0 {
        None
    } else {
        index.char_at(text, m.start - 1)
    };
    let after = index.char_at(text, m.end);

    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// A compiled literal needle, reusable across searches.
///
/// Case-insensitive matching uses simple case folding, so every match spans exactly as many
/// characters as the needle.
#[derive(Debug, Clone)]
pub struct LiteralSearcher {
    needle: String,
    needle_chars: usize,
    options: SearchOptions,
    re: Regex,
}

impl LiteralSearcher {
    /// Compile `needle`. Returns `None` for an empty needle.
    pub fn new(needle: &str, options: SearchOptions) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }

        let re = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(!options.case_sensitive)
            .build();
        match re {
            Ok(re) => Some(Self {
                needle: needle.to_string(),
                needle_chars: needle.chars().count(),
                options,
                re,
            }),
            Err(err) => {
                log::warn!("literal search could not be compiled: {err}");
                None
            }
        }
    }

    /// Returns `true` if this searcher was built for `needle` with `options`.
    pub fn matches_query(&self, needle: &str, options: SearchOptions) -> bool {
        self.options == options && self.needle == needle
    }

    /// Length of the needle (and of every match) in characters.
    pub fn needle_chars(&self) -> usize {
        self.needle_chars
    }

    /// First occurrence inside `within` (character offsets into `text`).
    pub fn find_forward(&self, text: &str, within: TextRange) -> Option<TextRange> {
        let mut found = None;
        self.scan(text, within, |m| {
            found = Some(m);
            false
        });
        found
    }

    /// Last occurrence inside `within` (character offsets into `text`).
    pub fn find_backward(&self, text: &str, within: TextRange) -> Option<TextRange> {
        let mut found = None;
        self.scan(text, within, |m| {
            found = Some(m);
            true
        });
        found
    }

    /// Visit non-overlapping matches in order until `visit` returns `false`.
    fn scan(&self, text: &str, within: TextRange, mut visit: impl FnMut(TextRange) -> bool) {
        let index = CharIndex::new(text);

        let within = within.normalized();
        let end_char = within.end.min(index.char_count());
        let end_byte = index.char_to_byte(end_char);
        let haystack = &text[..end_byte];

        let mut start_char = within.start.min(end_char);
        while start_char < end_char {
            let start_byte = index.char_to_byte(start_char);
            let Some(m) = self.re.find_at(haystack, start_byte) else {
                break;
            };

            let candidate =
                TextRange::new(index.byte_to_char(m.start()), index.byte_to_char(m.end()));
            if candidate.is_empty() {
                start_char = candidate.end + 1;
                continue;
            }

            if self.options.whole_word && !is_whole_word(text, &index, candidate) {
                // Overlapping candidates may still form a whole word, so only step one character.
                start_char = candidate.start + 1;
                continue;
            }

            if !visit(candidate) {
                break;
            }
            start_char = candidate.end;
        }
    }
}

/// Find the first occurrence of `needle` inside `within`.
///
/// Returns `None` if no match is found or if `needle` is empty.
pub fn find_forward(
    text: &str,
    needle: &str,
    options: SearchOptions,
    within: TextRange,
) -> Option<TextRange> {
    LiteralSearcher::new(needle, options)?.find_forward(text, within)
}

/// Find the last occurrence of `needle` inside `within`.
///
/// Returns `None` if no match is found or if `needle` is empty.
pub fn find_backward(
    text: &str,
    needle: &str,
    options: SearchOptions,
    within: TextRange,
) -> Option<TextRange> {
    LiteralSearcher::new(needle, options)?.find_backward(text, within)
}

use crate::buffer::TextBuffer;
use crate::range::TextRange;

/// Matches a fixed string using the buffer's native literal search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralQuery {
    /// The string to look for. An empty string never matches.
    pub text: String,
    /// Case-sensitive comparison.
    pub match_case: bool,
    /// Only match occurrences bounded by non-word characters.
    pub whole_word: bool,
}

impl LiteralQuery {
    /// Create a literal matcher.
    pub fn new(text: impl Into<String>, match_case: bool, whole_word: bool) -> Self {
        Self {
            text: text.into(),
            match_case,
            whole_word,
        }
    }

    pub(crate) fn find_in<B: TextBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        range: TextRange,
        up: bool,
    ) -> TextRange {
        if self.text.is_empty() {
            return TextRange::EMPTY;
        }

        buffer.set_target_range(if up { range.reversed() } else { range });
        buffer.search_in_target(&self.text, self.match_case, self.whole_word)
    }

    /// Replace the (already verified) selection; returns the inserted length in characters.
    pub(crate) fn replace_text<B: TextBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        replacement: &str,
    ) -> usize {
        buffer.replace_selection(replacement);
        replacement.chars().count()
    }

    pub(crate) fn replace_all<B: TextBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        range: TextRange,
        replacement: &str,
    ) -> Vec<TextRange> {
        let replacement_len = replacement.chars().count();
        let mut cursor = range;
        let mut results = Vec::new();

        loop {
            let found = self.find_in(buffer, cursor, false);
            if found.is_empty() || found.start < cursor.start {
                break;
            }

            buffer.set_selection(found);
            buffer.replace_selection(replacement);

            let replaced = TextRange::new(found.start, found.start + replacement_len);
            // The tail of the range moves with the text the replacement shifted.
            let tail = cursor.end.saturating_sub(found.len()) + replacement_len;
            cursor = TextRange::new(replaced.end, tail);
            results.push(replaced);
        }

        results
    }
}

impl std::fmt::Display for LiteralQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

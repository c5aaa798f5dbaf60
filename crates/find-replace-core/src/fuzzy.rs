//! Suggestion matching for autocomplete lists.
//!
//! An item matches a typed pattern either as a regular expression (first match wins) or, when
//! that fails, as an in-order subsequence of its characters. The result is a list of segments
//! so a UI can render the matched parts differently.

use regex::RegexBuilder;

/// A run of characters of the display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The characters of this run.
    pub text: String,
    /// `true` if the run matched the pattern.
    pub is_match: bool,
}

impl Segment {
    fn new(text: impl Into<String>, is_match: bool) -> Self {
        Self {
            text: text.into(),
            is_match,
        }
    }
}

/// Match `pattern` against `display`.
///
/// Returns the segmentation of `display` on success, or `None` if the pattern matches neither
/// as a regular expression nor as a subsequence.
pub fn match_item(display: &str, pattern: &str, match_case: bool) -> Option<Vec<Segment>> {
    if let Ok(re) = RegexBuilder::new(pattern)
        .case_insensitive(!match_case)
        .build()
        && let Some(m) = re.find(display)
    {
        let mut segments = Vec::with_capacity(3);
        if m.start() > 0 {
            segments.push(Segment::new(&display[..m.start()], false));
        }
        segments.push(Segment::new(m.as_str(), true));
        if m.end() < display.len() {
            segments.push(Segment::new(&display[m.end()..], false));
        }
        return Some(segments);
    }

    fuzzy_match(display, pattern, match_case)
}

fn fold(ch: char, match_case: bool) -> char {
    if match_case {
        ch
    } else {
        ch.to_lowercase().next().unwrap_or(ch)
    }
}

/// Subsequence match: every pattern character must appear in `display`, in order.
pub fn fuzzy_match(display: &str, pattern: &str, match_case: bool) -> Option<Vec<Segment>> {
    let source: Vec<char> = display.chars().collect();
    let wanted: Vec<char> = pattern.chars().map(|c| fold(c, match_case)).collect();
    if wanted.is_empty() {
        return None;
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut pending = String::new();
    let mut matched = String::new();
    let mut next = 0;

    for &ch in &source {
        if next < wanted.len() && fold(ch, match_case) == wanted[next] {
            if !pending.is_empty() {
                if !matched.is_empty() {
                    segments.push(Segment::new(std::mem::take(&mut matched), true));
                }
                segments.push(Segment::new(std::mem::take(&mut pending), false));
            }
            matched.push(ch);
            next += 1;
        } else {
            pending.push(ch);
        }
    }

    if next < wanted.len() {
        return None;
    }

    if !matched.is_empty() {
        segments.push(Segment::new(matched, true));
    }
    if !pending.is_empty() {
        segments.push(Segment::new(pending, false));
    }
    Some(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segs(parts: &[(&str, bool)]) -> Vec<Segment> {
        parts.iter().map(|(t, m)| Segment::new(*t, *m)).collect()
    }

    #[test]
    fn test_regex_match_splits_in_three() {
        assert_eq!(
            match_item("ReadLine", "ad", true),
            Some(segs(&[("Re", false), ("ad", true), ("Line", false)]))
        );
    }

    #[test]
    fn test_falls_back_to_subsequence() {
        assert_eq!(
            match_item("WriteLine", "wl", false),
            Some(segs(&[("W", true), ("rite", false), ("L", true), ("ine", false)]))
        );
    }

    #[test]
    fn test_adjacent_matches_merge() {
        assert_eq!(
            fuzzy_match("abcdef", "abe", true),
            Some(segs(&[("ab", true), ("cd", false), ("e", true), ("f", false)]))
        );
    }

    #[test]
    fn test_invalid_regex_still_fuzzy_matches() {
        assert_eq!(
            match_item("a(b", "(", true),
            Some(segs(&[("a", false), ("(", true), ("b", false)]))
        );
    }

    #[test]
    fn test_incomplete_subsequence_fails() {
        assert_eq!(match_item("abc", "abx", true), None);
        assert_eq!(fuzzy_match("abc", "", true), None);
    }
}

//! Character ranges used for match spans and search bounds.

use std::cmp::Ordering;

/// A half-open interval `[start, end)` over character offsets.
///
/// Ordering is lexicographic on `(start, end)`. A range with `start == end` is the
/// "no match" sentinel returned by every find operation. The `start <= end` invariant is not
/// enforced: a reversed pair is how a backward search is requested from a [`TextBuffer`].
///
/// [`TextBuffer`]: crate::TextBuffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextRange {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl TextRange {
    /// The canonical "no match" value.
    pub const EMPTY: TextRange = TextRange { start: 0, end: 0 };

    /// Create a new range.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty range positioned at `offset`.
    pub const fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns `true` if this range denotes "no match" (`start == end`).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Length in characters. Reversed ranges report the distance between their ends.
    pub fn len(&self) -> usize {
        self.start.abs_diff(self.end)
    }

    /// Returns `true` if `start > end`.
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// The same pair with its ends swapped.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// The pair ordered so that `start <= end`.
    pub fn normalized(&self) -> Self {
        if self.is_reversed() {
            self.reversed()
        } else {
            *self
        }
    }

    /// Returns `true` if `offset` lies within `[start, end]` (both ends inclusive).
    ///
    /// Navigation treats a caret sitting exactly on either boundary as inside the range.
    pub fn contains_inclusive(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Compare against a possibly absent range; an absent range sorts after every value.
    pub fn cmp_nullable(&self, other: Option<&TextRange>) -> Ordering {
        match other {
            Some(other) => self.cmp(other),
            None => Ordering::Less,
        }
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

//! The text-buffer contract consumed by the search engine.
//!
//! The engine never owns text. Everything it needs from an editor is expressed through
//! [`TextBuffer`]: selection and caret access, a target range for the buffer's native literal
//! search, range snapshots and selection replacement. Features that some editors lack (undo
//! grouping, line marks, match highlights) are optional capabilities: a buffer that does not
//! support one simply returns `None` from the corresponding accessor and the engine skips it.

use crate::range::TextRange;
use std::ops::{Deref, DerefMut};

/// Mutable text document driven by queries.
///
/// All offsets are character offsets.
pub trait TextBuffer {
    /// Total length of the document in characters.
    fn len_chars(&self) -> usize;

    /// The current selection, normalized so that `start <= end`.
    fn selection(&self) -> TextRange;

    /// Move the live selection. A reversed range puts the caret at `range.end`, before the
    /// anchor.
    fn set_selection(&mut self, range: TextRange);

    /// Caret offset (the active end of the selection).
    fn current_position(&self) -> usize;

    /// Anchor offset (the fixed end of the selection).
    fn anchor_position(&self) -> usize;

    /// Collapse the selection to `offset`.
    fn go_to_position(&mut self, offset: usize) {
        self.set_selection(TextRange::empty_at(offset));
    }

    /// The range honored by the next [`TextBuffer::search_in_target`] call.
    fn target_range(&self) -> TextRange;

    /// Set the range honored by the next [`TextBuffer::search_in_target`] call.
    ///
    /// A reversed range (`start > end`) requests a backward search over `[end, start)`.
    fn set_target_range(&mut self, range: TextRange);

    /// Native literal search restricted to the target range.
    ///
    /// Returns the match span, or an empty range if nothing matches.
    fn search_in_target(&mut self, text: &str, match_case: bool, whole_word: bool) -> TextRange;

    /// Snapshot of the characters covered by `range`.
    fn text_range(&self, range: TextRange) -> String;

    /// Replace the current selection with `text`.
    ///
    /// Every offset after the selection shifts by `len(text) - len(selection)`.
    fn replace_selection(&mut self, text: &str);

    /// Undo grouping, if the buffer supports it.
    fn undo_scope(&mut self) -> Option<&mut dyn UndoScope> {
        None
    }

    /// Line marking, if the buffer supports it.
    fn marking(&mut self) -> Option<&mut dyn Marking> {
        None
    }

    /// Match highlighting, if the buffer supports it.
    fn highlighting(&mut self) -> Option<&mut dyn Highlighting> {
        None
    }

    /// The range spanning the whole document.
    fn whole_range(&self) -> TextRange {
        TextRange::new(0, self.len_chars())
    }
}

/// Groups a series of edits into one undoable action.
pub trait UndoScope {
    /// Open an undo group. Calls may nest.
    fn begin_undo_action(&mut self);
    /// Close the innermost undo group.
    fn end_undo_action(&mut self);
}

/// Marks the lines touched by a set of ranges (e.g. bookmarks in a gutter).
pub trait Marking {
    /// Mark every line touched by `ranges`.
    fn mark(&mut self, ranges: &[TextRange]);
    /// Remove every mark.
    fn clear_all_marks(&mut self);
}

/// Paints an indicator over a set of ranges.
pub trait Highlighting {
    /// Highlight `ranges`.
    fn highlight(&mut self, ranges: &[TextRange]);
    /// Remove every highlight.
    fn clear_all_highlights(&mut self);
}

/// Scoped undo group over a buffer.
///
/// Opens an undo action on creation and closes it on drop, so the group is released on every
/// exit path. Buffers without [`UndoScope`] are used as-is.
pub struct UndoGuard<'a, B: TextBuffer + ?Sized> {
    buffer: &'a mut B,
}

impl<'a, B: TextBuffer + ?Sized> UndoGuard<'a, B> {
    /// Begin an undo action on `buffer`.
    pub fn new(buffer: &'a mut B) -> Self {
        if let Some(undo) = buffer.undo_scope() {
            undo.begin_undo_action();
        }
        Self { buffer }
    }
}

impl<B: TextBuffer + ?Sized> Deref for UndoGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.buffer
    }
}

impl<B: TextBuffer + ?Sized> DerefMut for UndoGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.buffer
    }
}

impl<B: TextBuffer + ?Sized> Drop for UndoGuard<'_, B> {
    fn drop(&mut self) {
        if let Some(undo) = self.buffer.undo_scope() {
            undo.end_undo_action();
        }
    }
}

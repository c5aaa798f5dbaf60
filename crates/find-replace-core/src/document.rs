//! Rope-backed reference implementation of [`TextBuffer`].
//!
//! `Document` is a headless editor buffer: character-offset text stored in a [`Rope`], a
//! selection made of an anchor and a caret, a target range for native literal search, grouped
//! undo/redo, line marks and match highlights. Each optional capability can be switched off
//! through [`DocumentConfig`] to model editors that do not provide it.

use crate::buffer::{Highlighting, Marking, TextBuffer, UndoScope};
use crate::range::TextRange;
use crate::search::{LiteralSearcher, SearchOptions};
use ropey::Rope;
use std::collections::BTreeSet;

/// Initial number of characters copied out of the rope for a forward search.
const SEARCH_WINDOW: usize = 1024;

/// Capability switches and limits for a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Expose [`UndoScope`] (grouping of edits into one undo step).
    pub undo: bool,
    /// Expose [`Marking`].
    pub marking: bool,
    /// Expose [`Highlighting`].
    pub highlighting: bool,
    /// Maximum number of recorded edits kept for undo.
    pub max_undo: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            undo: true,
            marking: true,
            highlighting: true,
            max_undo: 1000,
        }
    }
}

impl DocumentConfig {
    /// A configuration with every optional capability disabled.
    pub fn minimal() -> Self {
        Self {
            undo: false,
            marking: false,
            highlighting: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SelectionSnapshot {
    anchor: usize,
    caret: usize,
}

#[derive(Debug, Clone)]
struct TextEdit {
    start: usize,
    deleted_text: String,
    inserted_text: String,
}

impl TextEdit {
    fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }
}

#[derive(Debug, Clone)]
struct UndoStep {
    group_id: usize,
    edit: TextEdit,
    before_selection: SelectionSnapshot,
    after_selection: SelectionSnapshot,
}

#[derive(Debug)]
struct UndoRedoManager {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    max_undo: usize,
    next_group_id: usize,
    open_group_id: Option<usize>,
    /// Nesting depth of `begin_undo_action` calls.
    open_depth: usize,
}

impl UndoRedoManager {
    fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo,
            next_group_id: 0,
            open_group_id: None,
            open_depth: 0,
        }
    }

    fn begin_group(&mut self) {
        if self.open_depth == 0 {
            self.open_group_id = Some(self.allocate_group_id());
        }
        self.open_depth += 1;
    }

    fn end_group(&mut self) {
        self.open_depth = self.open_depth.saturating_sub(1);
        if self.open_depth == 0 {
            self.open_group_id = None;
        }
    }

    fn allocate_group_id(&mut self) -> usize {
        let id = self.next_group_id;
        self.next_group_id = self.next_group_id.wrapping_add(1);
        id
    }

    fn push_step(&mut self, mut step: UndoStep) {
        self.redo_stack.clear();

        if self.max_undo == 0 {
            return;
        }
        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
        }

        step.group_id = match self.open_group_id {
            Some(id) => id,
            None => self.allocate_group_id(),
        };
        self.undo_stack.push(step);
    }

    fn pop_group(stack: &mut Vec<UndoStep>) -> Option<Vec<UndoStep>> {
        let last_group_id = stack.last().map(|s| s.group_id)?;
        let mut steps: Vec<UndoStep> = Vec::new();

        while let Some(step) = stack.last() {
            if step.group_id != last_group_id {
                break;
            }
            if let Some(step) = stack.pop() {
                steps.push(step);
            }
        }

        Some(steps)
    }
}

/// In-memory text buffer implementing the full [`TextBuffer`] contract.
#[derive(Debug)]
pub struct Document {
    rope: Rope,
    anchor: usize,
    caret: usize,
    target: TextRange,
    undo_redo: UndoRedoManager,
    marked_lines: BTreeSet<usize>,
    highlights: Vec<TextRange>,
    config: DocumentConfig,
    searcher: Option<LiteralSearcher>,
}

impl Document {
    /// Create a document with every capability enabled.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, DocumentConfig::default())
    }

    /// Create a document with explicit capabilities.
    pub fn with_config(text: &str, config: DocumentConfig) -> Self {
        let rope = Rope::from_str(text);
        let len = rope.len_chars();
        Self {
            rope,
            anchor: 0,
            caret: 0,
            target: TextRange::new(0, len),
            undo_redo: UndoRedoManager::new(config.max_undo),
            marked_lines: BTreeSet::new(),
            highlights: Vec::new(),
            config,
            searcher: None,
        }
    }

    /// The full text of the document.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of lines (a trailing newline starts an empty last line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line index containing the character at `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// Lines currently carrying a mark, ascending.
    pub fn marked_lines(&self) -> Vec<usize> {
        self.marked_lines.iter().copied().collect()
    }

    /// Currently highlighted ranges, in the order they were added.
    pub fn highlights(&self) -> &[TextRange] {
        &self.highlights
    }

    /// Replace `range` with `text` as a single edit, as an external editor action would.
    pub fn edit(&mut self, range: TextRange, text: &str) {
        self.set_selection(range.normalized());
        self.replace_selection(text);
    }

    /// Returns `true` if there is something to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_redo.undo_stack.is_empty()
    }

    /// Returns `true` if there is something to redo.
    pub fn can_redo(&self) -> bool {
        !self.undo_redo.redo_stack.is_empty()
    }

    /// Number of recorded edits available to undo.
    pub fn undo_depth(&self) -> usize {
        self.undo_redo.undo_stack.len()
    }

    /// Undo the most recent undo group. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(steps) = UndoRedoManager::pop_group(&mut self.undo_redo.undo_stack) else {
            return false;
        };

        // Steps come back newest first, which is the order they must be reverted in.
        for step in &steps {
            let edit = &step.edit;
            self.rope
                .remove(edit.start..edit.start + edit.inserted_len());
            self.rope.insert(edit.start, &edit.deleted_text);
        }
        if let Some(oldest) = steps.last() {
            self.restore_selection(oldest.before_selection);
        }

        self.undo_redo.redo_stack.extend(steps);
        true
    }

    /// Redo the most recently undone group. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(steps) = UndoRedoManager::pop_group(&mut self.undo_redo.redo_stack) else {
            return false;
        };

        for step in &steps {
            let edit = &step.edit;
            self.rope
                .remove(edit.start..edit.start + edit.deleted_len());
            self.rope.insert(edit.start, &edit.inserted_text);
        }
        if let Some(newest) = steps.last() {
            self.restore_selection(newest.after_selection);
        }

        self.undo_redo.undo_stack.extend(steps);
        true
    }

    fn snapshot_selection(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            anchor: self.anchor,
            caret: self.caret,
        }
    }

    fn restore_selection(&mut self, snapshot: SelectionSnapshot) {
        let len = self.rope.len_chars();
        self.anchor = snapshot.anchor.min(len);
        self.caret = snapshot.caret.min(len);
    }

    /// Forward search that only materializes as much text after `target.start` as needed.
    ///
    /// Every match spans the needle's length, so the first match inside a window is also the
    /// first match of the whole target.
    fn search_forward(&self, searcher: &LiteralSearcher, target: TextRange) -> Option<TextRange> {
        let mut window = SEARCH_WINDOW.max(searcher.needle_chars() * 2);
        loop {
            let end = target.start.saturating_add(window).min(target.end);
            let within = TextRange::new(target.start, end);
            if let Some(found) = self.search_slice(searcher, within, false) {
                return Some(found);
            }
            if end >= target.end {
                return None;
            }
            window = window.saturating_mul(2);
        }
    }

    /// Search `within` on a copy of just that span, padded by one character on each side for
    /// whole-word checks.
    fn search_slice(
        &self,
        searcher: &LiteralSearcher,
        within: TextRange,
        backward: bool,
    ) -> Option<TextRange> {
        let within = TextRange::new(self.clamp(within.start), self.clamp(within.end));
        let from = within.start.saturating_sub(1);
        let to = self.clamp(within.end + 1);
        let text = self.rope.slice(from..to).to_string();

        let local = TextRange::new(within.start - from, within.end - from);
        let found = if backward {
            searcher.find_backward(&text, local)
        } else {
            searcher.find_forward(&text, local)
        }?;
        Some(TextRange::new(found.start + from, found.end + from))
    }

    fn clamp(&self, offset: usize) -> usize {
        offset.min(self.rope.len_chars())
    }
}

impl TextBuffer for Document {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn selection(&self) -> TextRange {
        TextRange::new(self.anchor, self.caret).normalized()
    }

    fn set_selection(&mut self, range: TextRange) {
        self.anchor = self.clamp(range.start);
        self.caret = self.clamp(range.end);
    }

    fn current_position(&self) -> usize {
        self.caret
    }

    fn anchor_position(&self) -> usize {
        self.anchor
    }

    fn target_range(&self) -> TextRange {
        self.target
    }

    fn set_target_range(&mut self, range: TextRange) {
        self.target = TextRange::new(self.clamp(range.start), self.clamp(range.end));
    }

    fn search_in_target(&mut self, text: &str, match_case: bool, whole_word: bool) -> TextRange {
        let options = SearchOptions {
            case_sensitive: match_case,
            whole_word,
        };
        if !self
            .searcher
            .as_ref()
            .is_some_and(|searcher| searcher.matches_query(text, options))
        {
            self.searcher = LiteralSearcher::new(text, options);
        }
        let Some(searcher) = self.searcher.as_ref() else {
            return TextRange::EMPTY;
        };

        let found = if self.target.is_reversed() {
            self.search_slice(searcher, self.target.reversed(), true)
        } else {
            self.search_forward(searcher, self.target)
        };
        log::trace!("search_in_target {:?} in {} -> {:?}", text, self.target, found);
        found.unwrap_or(TextRange::EMPTY)
    }

    fn text_range(&self, range: TextRange) -> String {
        let range = range.normalized();
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        self.rope.slice(start..end).to_string()
    }

    fn replace_selection(&mut self, text: &str) {
        let selection = self.selection();
        let before_selection = self.snapshot_selection();
        let deleted_text = self.rope.slice(selection.start..selection.end).to_string();

        self.rope.remove(selection.start..selection.end);
        self.rope.insert(selection.start, text);

        let end = selection.start + text.chars().count();
        self.anchor = end;
        self.caret = end;

        self.undo_redo.push_step(UndoStep {
            group_id: 0,
            edit: TextEdit {
                start: selection.start,
                deleted_text,
                inserted_text: text.to_string(),
            },
            before_selection,
            after_selection: self.snapshot_selection(),
        });
    }

    fn undo_scope(&mut self) -> Option<&mut dyn UndoScope> {
        if self.config.undo {
            Some(self as &mut dyn UndoScope)
        } else {
            None
        }
    }

    fn marking(&mut self) -> Option<&mut dyn Marking> {
        if self.config.marking {
            Some(self as &mut dyn Marking)
        } else {
            None
        }
    }

    fn highlighting(&mut self) -> Option<&mut dyn Highlighting> {
        if self.config.highlighting {
            Some(self as &mut dyn Highlighting)
        } else {
            None
        }
    }
}

impl UndoScope for Document {
    fn begin_undo_action(&mut self) {
        self.undo_redo.begin_group();
    }

    fn end_undo_action(&mut self) {
        self.undo_redo.end_group();
    }
}

impl Marking for Document {
    fn mark(&mut self, ranges: &[TextRange]) {
        for range in ranges {
            let range = range.normalized();
            let first = self.line_of(range.start);
            let last = self.line_of(range.end);
            self.marked_lines.extend(first..=last);
        }
    }

    fn clear_all_marks(&mut self) {
        self.marked_lines.clear();
    }
}

impl Highlighting for Document {
    fn highlight(&mut self, ranges: &[TextRange]) {
        self.highlights.extend_from_slice(ranges);
    }

    fn clear_all_highlights(&mut self) {
        self.highlights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_is_normalized_but_keeps_direction() {
        let mut doc = Document::new("hello world");
        doc.set_selection(TextRange::new(8, 2));
        assert_eq!(doc.selection(), TextRange::new(2, 8));
        assert_eq!(doc.current_position(), 2);
        assert_eq!(doc.anchor_position(), 8);
    }

    #[test]
    fn test_replace_selection_moves_caret_to_end() {
        let mut doc = Document::new("hello world");
        doc.set_selection(TextRange::new(6, 11));
        doc.replace_selection("there");
        assert_eq!(doc.text(), "hello there");
        assert_eq!(doc.selection(), TextRange::empty_at(11));

        doc.set_selection(TextRange::new(0, 5));
        doc.replace_selection("hi");
        assert_eq!(doc.text(), "hi there");
        assert_eq!(doc.current_position(), 2);
    }

    #[test]
    fn test_search_in_target_both_directions() {
        let mut doc = Document::new("one two one two");
        doc.set_target_range(TextRange::new(0, 15));
        assert_eq!(doc.search_in_target("two", true, false), TextRange::new(4, 7));

        doc.set_target_range(TextRange::new(15, 0));
        assert_eq!(doc.search_in_target("two", true, false), TextRange::new(12, 15));

        doc.set_target_range(TextRange::new(0, 15));
        assert!(doc.search_in_target("three", true, false).is_empty());
    }

    #[test]
    fn test_forward_search_crosses_window_boundaries() {
        let mut text = "a".repeat(SEARCH_WINDOW - 4);
        text.push_str(" needles needle ");
        text.push_str(&"b".repeat(3 * SEARCH_WINDOW));
        text.push_str(" needle");
        let mut doc = Document::new(&text);
        let len = doc.len_chars();

        // Straddles the first window and must not be skipped.
        doc.set_target_range(TextRange::new(0, len));
        let first = SEARCH_WINDOW - 3;
        assert_eq!(
            doc.search_in_target("needle", true, false),
            TextRange::new(first, first + 6)
        );

        // "needles" is rejected as a whole word; the next candidate lies in a later window.
        assert_eq!(
            doc.search_in_target("needle", true, true),
            TextRange::new(first + 8, first + 14)
        );

        doc.set_target_range(TextRange::new(first + 14, len));
        assert_eq!(
            doc.search_in_target("needle", true, true),
            TextRange::new(len - 6, len)
        );
    }

    #[test]
    fn test_search_sees_edits_made_after_a_search() {
        let mut doc = Document::new("abc abc");
        doc.set_target_range(TextRange::new(0, 7));
        assert_eq!(doc.search_in_target("abc", true, false), TextRange::new(0, 3));

        doc.edit(TextRange::new(0, 3), "x");
        doc.set_target_range(TextRange::new(0, 5));
        assert_eq!(doc.search_in_target("abc", true, false), TextRange::new(2, 5));
    }

    #[test]
    fn test_grouped_undo_reverts_all_edits() {
        let mut doc = Document::new("a a a");
        doc.begin_undo_action();
        doc.edit(TextRange::new(0, 1), "bb");
        doc.edit(TextRange::new(3, 4), "bb");
        doc.end_undo_action();
        doc.edit(TextRange::new(6, 7), "bb");
        assert_eq!(doc.text(), "bb bb bb");

        assert!(doc.undo());
        assert_eq!(doc.text(), "bb bb a");
        assert!(doc.undo());
        assert_eq!(doc.text(), "a a a");
        assert!(!doc.undo());

        assert!(doc.redo());
        assert_eq!(doc.text(), "bb bb a");
        assert!(doc.redo());
        assert_eq!(doc.text(), "bb bb bb");
        assert!(!doc.redo());
    }

    #[test]
    fn test_marks_cover_every_touched_line() {
        let mut doc = Document::new("l0\nl1\nl2\nl3");
        doc.mark(&[TextRange::new(1, 4), TextRange::new(10, 11)]);
        assert_eq!(doc.marked_lines(), vec![0, 1, 3]);
        doc.clear_all_marks();
        assert!(doc.marked_lines().is_empty());
    }

    #[test]
    fn test_minimal_config_hides_capabilities() {
        let mut doc = Document::with_config("abc", DocumentConfig::minimal());
        assert!(doc.undo_scope().is_none());
        assert!(doc.marking().is_none());
        assert!(doc.highlighting().is_none());
    }
}

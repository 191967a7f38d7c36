//! EditableSurface - the editable region: document, live selection, tracker,
//! budget and history in one owner.
//!
//! All content-changing paths end in [`EditableSurface::enforce_limit`], so
//! the plain-text length never stays above the budget maximum.

use tracing::{debug, warn};

use crate::input::{KeyCode, Keystroke};
use crate::util::text::{char_count, normalize_newlines};

use super::budget::CharacterBudget;
use super::document::{EditableDocument, Node, Tag};
use super::error::EditError;
use super::format::RichTextCommands;
use super::history::{EditHistory, Snapshot};
use super::range::{DomPoint, DomRange};
use super::selection::{SavedSelection, SelectionTracker};

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// What happened to a keydown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Cancelled before reaching the document
    Blocked,
    /// Let through without changing content
    Unchanged,
    /// Content changed; `truncated` when the correction had to cut it back
    Changed { truncated: bool },
}

/// What happened to a paste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Nothing was inserted
    Discarded,
    /// `chars` characters of the payload were inserted
    Inserted { chars: usize },
}

/// Result of the post-mutation correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Plain-text characters removed
    pub removed: usize,
    /// Whether the caret went back to its previous offset
    pub caret_restored: bool,
}

/// Caret motions in plain-text offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

#[derive(Debug, Clone)]
pub struct EditableSurface {
    document: EditableDocument,
    /// The live selection; gone whenever focus leaves the surface
    selection: Option<DomRange>,
    tracker: SelectionTracker,
    budget: CharacterBudget,
    history: EditHistory,
    focused: bool,
    editable: bool,
    font_size: u32,
}

impl Default for EditableSurface {
    fn default() -> Self {
        Self::new(EditableDocument::new(), CharacterBudget::default())
    }
}

impl EditableSurface {
    pub fn new(document: EditableDocument, budget: CharacterBudget) -> Self {
        Self {
            document,
            selection: None,
            tracker: SelectionTracker::new(),
            budget,
            history: EditHistory::new(),
            focused: false,
            editable: true,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn document(&self) -> &EditableDocument {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut EditableDocument {
        &mut self.document
    }

    pub fn budget(&self) -> &CharacterBudget {
        &self.budget
    }

    pub fn set_budget(&mut self, budget: CharacterBudget) {
        self.budget = budget;
    }

    pub fn text_len(&self) -> usize {
        self.document.text_len()
    }

    pub fn remaining(&self) -> usize {
        self.budget.remaining(self.text_len())
    }

    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    pub fn html(&self) -> String {
        self.document.to_html()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Lock or unlock the surface against edits
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Set the surface font size, clamped to the supported range
    pub fn set_font_size(&mut self, size: u32) -> u32 {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.font_size
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

// =============================================================================
// Selection and tracking
// =============================================================================

impl EditableSurface {
    pub fn selection(&self) -> Option<&DomRange> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<DomRange>) {
        self.selection = selection;
    }

    /// Collapse the live selection to `point`
    pub fn set_caret(&mut self, point: DomPoint) {
        self.selection = Some(DomRange::caret(point));
    }

    /// Select between two plain-text offsets
    pub fn set_selection_by_offsets(&mut self, anchor: usize, focus: usize) -> Result<(), EditError> {
        let map = self.document.text_map();
        if anchor > map.len() || focus > map.len() {
            return Err(EditError::InvalidPoint);
        }
        self.selection = Some(DomRange::new(
            map.offset_to_point(anchor),
            map.offset_to_point(focus),
        ));
        Ok(())
    }

    /// Live selection as (anchor, focus) plain-text offsets
    pub fn selection_offsets(&self) -> Option<(usize, usize)> {
        let range = self.selection.as_ref()?;
        let map = self.document.text_map();
        Some((
            map.point_to_offset(&range.anchor)?,
            map.point_to_offset(&range.focus)?,
        ))
    }

    /// Plain-text offset of the caret (the selection focus)
    pub fn caret_offset(&self) -> Option<usize> {
        self.selection_offsets().map(|(_, focus)| focus)
    }

    pub fn select_all(&mut self) {
        self.selection = Some(DomRange::new(
            DomPoint::new(Vec::new(), 0),
            self.document.end_point(),
        ));
    }

    /// Hand the live selection to the tracker
    pub fn capture_selection(&mut self) -> bool {
        self.tracker
            .observe(self.selection.as_ref(), self.document.revision())
    }

    pub fn saved_selection(&self) -> Option<&SavedSelection> {
        self.tracker.saved()
    }

    pub fn restore_saved_selection(&self) -> Result<DomRange, EditError> {
        self.tracker.restore(&self.document)
    }

    /// Put the saved selection back as the live one
    pub fn reactivate_saved_selection(&mut self) -> Result<(), EditError> {
        let range = self.restore_saved_selection()?;
        self.selection = Some(range);
        self.focused = true;
        Ok(())
    }

    /// Pointer press and release selecting between two offsets
    pub fn pointer_select(&mut self, anchor: usize, focus: usize) -> Result<(), EditError> {
        self.set_selection_by_offsets(anchor, focus)?;
        self.focused = true;
        self.capture_selection();
        Ok(())
    }

    pub fn key_up(&mut self, _key: &Keystroke) {
        self.capture_selection();
    }

    /// Focus without a live selection puts the caret at the end
    pub fn focus(&mut self) {
        self.focused = true;
        if self.selection.is_none() {
            self.selection = Some(DomRange::caret(self.document.end_point()));
        }
        self.capture_selection();
    }

    /// Focus moves elsewhere and takes the live selection with it
    pub fn blur(&mut self) {
        self.focused = false;
        self.selection = None;
    }
}

// =============================================================================
// History
// =============================================================================

impl EditableSurface {
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            selection: self.selection.clone(),
        }
    }

    pub(crate) fn commit(&mut self, before: Snapshot) {
        self.history.push(before);
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.document.restore_from(&snapshot.document);
        self.selection = snapshot.selection.filter(|range| {
            self.document.contains_point(&range.anchor) && self.document.contains_point(&range.focus)
        });
    }

    pub(crate) fn undo_step(&mut self) -> bool {
        if !self.editable {
            return false;
        }
        let current = self.snapshot();
        match self.history.pop_undo(current) {
            Some(previous) => {
                self.apply_snapshot(previous);
                true
            }
            None => false,
        }
    }

    pub(crate) fn redo_step(&mut self) -> bool {
        if !self.editable {
            return false;
        }
        let current = self.snapshot();
        match self.history.pop_redo(current) {
            Some(next) => {
                self.apply_snapshot(next);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Limit enforcement
// =============================================================================

impl EditableSurface {
    /// Keydown interception followed by the key's default action
    pub fn key_down(&mut self, key: &Keystroke) -> KeyOutcome {
        let len = self.text_len();
        if self.budget.blocks_key(key, len) {
            debug!(%key, len, max = self.budget.max(), "keystroke blocked at limit");
            return KeyOutcome::Blocked;
        }

        let changed = if key.mods.has_cmd() {
            self.shortcut(key)
        } else if let Some(ch) = key.typed_char() {
            self.insert_text_at_caret(&ch.to_string())
        } else {
            self.named_key(key)
        };

        if changed {
            KeyOutcome::Changed {
                truncated: self.enforce_limit().is_some(),
            }
        } else {
            KeyOutcome::Unchanged
        }
    }

    fn shortcut(&mut self, key: &Keystroke) -> bool {
        let KeyCode::Char(ch) = key.key else {
            return false;
        };
        match ch.to_ascii_lowercase() {
            'b' => self.toggle_bold(),
            'i' => self.toggle_italic(),
            'u' => self.toggle_underline(),
            'z' if key.mods.shift() => self.redo(),
            'z' => self.undo(),
            'y' => self.redo(),
            'a' => {
                self.select_all();
                false
            }
            _ => false,
        }
    }

    fn named_key(&mut self, key: &Keystroke) -> bool {
        let extend = key.mods.shift();
        match key.key {
            KeyCode::Enter => self.insert_line_break(),
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_caret(Motion::Left, extend),
            KeyCode::Right => self.move_caret(Motion::Right, extend),
            KeyCode::Up => self.move_caret(Motion::Up, extend),
            KeyCode::Down => self.move_caret(Motion::Down, extend),
            KeyCode::Home => self.move_caret(Motion::LineStart, extend),
            KeyCode::End => self.move_caret(Motion::LineEnd, extend),
            KeyCode::PageUp => self.move_caret(Motion::DocumentStart, extend),
            KeyCode::PageDown => self.move_caret(Motion::DocumentEnd, extend),
            _ => false,
        }
    }

    /// Paste interception: clip to the remaining budget, splice at the live
    /// selection, caret after the pasted text.
    pub fn paste(&mut self, text: &str) -> PasteOutcome {
        if !self.editable || self.selection.is_none() {
            return PasteOutcome::Discarded;
        }
        let text = normalize_newlines(text);
        let clipped = self.budget.clip(&text, self.text_len());
        if clipped.is_empty() {
            debug!(remaining = self.remaining(), "paste discarded");
            return PasteOutcome::Discarded;
        }
        let chars = char_count(clipped);
        if !self.insert_text_at_caret(clipped) {
            return PasteOutcome::Discarded;
        }
        self.enforce_limit();
        PasteOutcome::Inserted { chars }
    }

    /// Post-mutation correction: cut the document back to the maximum and
    /// put the caret back where it was when that offset still exists.
    pub fn enforce_limit(&mut self) -> Option<Truncation> {
        let len = self.text_len();
        if !self.budget.is_exceeded(len) {
            return None;
        }
        let max = self.budget.max();
        let caret = self
            .selection
            .as_ref()
            .and_then(|range| self.document.point_to_offset(&range.focus));

        self.document.truncate_to(max);
        let removed = len - self.text_len();
        if self
            .history
            .last_undo()
            .is_some_and(|prev| prev.document.root() == self.document.root())
        {
            debug!("truncation reverted the last edit, dropping its history entry");
            self.history.discard_last();
        }

        let caret_restored = match caret {
            Some(offset) if offset <= max => self.place_caret_at(offset),
            Some(_) => {
                self.place_caret_at(max);
                false
            }
            None => false,
        };
        debug!(removed, max, caret_restored, "content truncated to limit");
        Some(Truncation {
            removed,
            caret_restored,
        })
    }

    fn place_caret_at(&mut self, offset: usize) -> bool {
        let point = self.document.offset_to_point(offset);
        if self.document.contains_point(&point) {
            self.set_caret(point);
            true
        } else {
            warn!(offset, "could not restore caret after truncation");
            self.selection = None;
            false
        }
    }
}

// =============================================================================
// Editing operations
// =============================================================================

impl EditableSurface {
    /// Replace the live selection with `text`
    pub fn insert_text_at_caret(&mut self, text: &str) -> bool {
        if !self.editable || text.is_empty() {
            return false;
        }
        let Some(range) = self.selection.clone() else {
            return false;
        };
        let before = self.snapshot();
        let result = self
            .document
            .delete_contents(&range)
            .and_then(|point| self.document.insert_text(&point, text));
        match result {
            Ok(caret) => {
                self.set_caret(caret);
                self.commit(before);
                true
            }
            Err(err) => {
                warn!(%err, "text insertion failed");
                false
            }
        }
    }

    /// Replace the live selection with a line break
    pub fn insert_line_break(&mut self) -> bool {
        if !self.editable {
            return false;
        }
        let Some(range) = self.selection.clone() else {
            return false;
        };
        let before = self.snapshot();
        let result = self
            .document
            .delete_contents(&range)
            .and_then(|point| self.document.insert_node(&point, Node::line_break()));
        match result {
            Ok(caret) => {
                self.set_caret(caret);
                self.commit(before);
                true
            }
            Err(err) => {
                warn!(%err, "line break insertion failed");
                false
            }
        }
    }

    fn delete_selection(&mut self, range: &DomRange) -> bool {
        let before = self.snapshot();
        match self.document.delete_contents(range) {
            Ok(point) => {
                self.set_caret(point);
                self.commit(before);
                true
            }
            Err(err) => {
                warn!(%err, "delete failed");
                false
            }
        }
    }

    /// Backspace: selection, embedded node before the caret, or previous character
    pub fn delete_backward(&mut self) -> bool {
        self.delete_adjacent(true)
    }

    /// Delete: selection, embedded node after the caret, or next character
    pub fn delete_forward(&mut self) -> bool {
        self.delete_adjacent(false)
    }

    fn delete_adjacent(&mut self, backward: bool) -> bool {
        if !self.editable {
            return false;
        }
        let Some(range) = self.selection.clone() else {
            return false;
        };
        if !range.is_collapsed() {
            return self.delete_selection(&range);
        }

        if let Some(path) = self.adjacent_embed(&range.focus, backward) {
            let before = self.snapshot();
            if let Some((&index, parent)) = path.split_last() {
                if let Some(siblings) = self.document.children_mut(parent) {
                    siblings.remove(index);
                    self.document.touch();
                    self.set_caret(DomPoint::new(parent.to_vec(), index));
                    self.commit(before);
                    return true;
                }
            }
            return false;
        }

        let map = self.document.text_map();
        let Some(offset) = map.point_to_offset(&range.focus) else {
            return false;
        };
        let (from, to) = if backward {
            match offset.checked_sub(1) {
                Some(from) => (from, offset),
                None => return false,
            }
        } else if offset < map.len() {
            (offset, offset + 1)
        } else {
            return false;
        };

        let start = map.offset_to_point(from);
        let end = map.offset_to_point(to);
        let len_before = map.len();
        let before = self.snapshot();
        if let Err(err) = self.document.delete_contents(&DomRange::new(start, end)) {
            warn!(%err, "delete failed");
            return false;
        }
        if self.document.text_len() < len_before {
            self.place_caret_at(from);
            self.commit(before);
            return true;
        }

        // Only a separator lay between the points: join the blocks instead
        let start = self.document.offset_to_point(from);
        let end = self.document.offset_to_point(to);
        if self.merge_blocks(&start, &end) {
            self.place_caret_at(from);
            self.commit(before);
            true
        } else {
            self.place_caret_at(if backward { from } else { to });
            false
        }
    }

    /// Image directly before/after the caret
    fn adjacent_embed(&self, point: &DomPoint, backward: bool) -> Option<Vec<usize>> {
        let path = match self.document.node(&point.path) {
            Some(Node::Text(text)) => {
                let (&index, parent) = point.path.split_last()?;
                let at_edge = if backward {
                    point.offset == 0
                } else {
                    point.offset >= char_count(text)
                };
                if !at_edge {
                    return None;
                }
                let sibling = if backward {
                    index.checked_sub(1)?
                } else {
                    index + 1
                };
                let mut path = parent.to_vec();
                path.push(sibling);
                path
            }
            _ => {
                let child = if backward {
                    point.offset.checked_sub(1)?
                } else {
                    point.offset
                };
                let mut path = point.path.clone();
                path.push(child);
                path
            }
        };
        match self.document.node(&path)?.tag() {
            Some(Tag::Image) => Some(path),
            _ => None,
        }
    }

    fn merge_blocks(&mut self, start: &DomPoint, end: &DomPoint) -> bool {
        let mergeable = |tag: Tag| {
            matches!(
                tag,
                Tag::Paragraph | Tag::Heading(_) | Tag::Div | Tag::Pre | Tag::ListItem
            )
        };
        let tag_at = |doc: &EditableDocument, path: &[usize]| doc.element(path).map(|el| el.tag);

        let start_block = self.document.enclosing_block(start);
        let end_block = self.document.enclosing_block(end);
        if start_block == end_block {
            return false;
        }

        match (start_block, end_block) {
            (start_block, Some(end_block)) => {
                let Some(end_tag) = tag_at(&self.document, &end_block) else {
                    return false;
                };
                if !mergeable(end_tag) {
                    return false;
                }
                if let Some(start_block) = &start_block {
                    let start_tag = tag_at(&self.document, start_block);
                    if !start_tag.is_some_and(mergeable) || end_block.starts_with(start_block) {
                        return false;
                    }
                }
                let Some((&index, parent)) = end_block.split_last() else {
                    return false;
                };
                let Some(siblings) = self.document.children_mut(parent) else {
                    return false;
                };
                let Node::Element(block) = siblings.remove(index) else {
                    return false;
                };
                match start_block {
                    Some(start_block) => {
                        if let Some(target) = self.document.children_mut(&start_block) {
                            target.extend(block.children);
                        }
                    }
                    // Inline content before the block: unwrap it in place
                    None => {
                        if let Some(siblings) = self.document.children_mut(parent) {
                            for (offset, child) in block.children.into_iter().enumerate() {
                                siblings.insert(index + offset, child);
                            }
                        }
                    }
                }
                self.document.touch();
                true
            }
            // Inline run after a closed block: pull it into the block
            (Some(start_block), None) => {
                let Some(tag) = tag_at(&self.document, &start_block) else {
                    return false;
                };
                if !mergeable(tag) || start_block.len() != 1 {
                    return false;
                }
                let Some(&first) = end.path.first() else {
                    return false;
                };
                let Some(root) = self.document.children_mut(&[]) else {
                    return false;
                };
                let run_len = root[first..]
                    .iter()
                    .take_while(|node| {
                        node.tag()
                            .map_or(true, |tag| !tag.is_block() && tag != Tag::LineBreak)
                    })
                    .count();
                let run: Vec<Node> = root.drain(first..first + run_len).collect();
                if let Some(target) = self.document.children_mut(&start_block) {
                    target.extend(run);
                }
                self.document.touch();
                true
            }
            (None, None) => false,
        }
    }

    /// Move the caret (or the selection focus when extending)
    pub fn move_caret(&mut self, motion: Motion, extend: bool) -> bool {
        let Some(range) = self.selection.clone() else {
            return false;
        };
        let map = self.document.text_map();
        let (Some(anchor), Some(focus)) = (
            map.point_to_offset(&range.anchor),
            map.point_to_offset(&range.focus),
        ) else {
            return false;
        };

        let text: Vec<char> = self.document.plain_text().chars().collect();
        let total = text.len();
        let line_start = |offset: usize| {
            text[..offset]
                .iter()
                .rposition(|&c| c == '\n')
                .map_or(0, |i| i + 1)
        };
        let line_end = |offset: usize| {
            text[offset..]
                .iter()
                .position(|&c| c == '\n')
                .map_or(total, |i| offset + i)
        };

        let target = match motion {
            // A non-extending horizontal move collapses an existing selection
            Motion::Left if !extend && anchor != focus => anchor.min(focus),
            Motion::Right if !extend && anchor != focus => anchor.max(focus),
            Motion::Left => focus.saturating_sub(1),
            Motion::Right => (focus + 1).min(total),
            Motion::Up => {
                let start = line_start(focus);
                if start == 0 {
                    0
                } else {
                    let column = focus - start;
                    let prev_start = line_start(start - 1);
                    prev_start + column.min(start - 1 - prev_start)
                }
            }
            Motion::Down => {
                let column = focus - line_start(focus);
                let end = line_end(focus);
                if end >= total {
                    total
                } else {
                    let next_start = end + 1;
                    next_start + column.min(line_end(next_start) - next_start)
                }
            }
            Motion::LineStart => line_start(focus),
            Motion::LineEnd => line_end(focus),
            Motion::DocumentStart => 0,
            Motion::DocumentEnd => total,
        };

        let focus_point = map.offset_to_point(target);
        self.selection = Some(if extend {
            DomRange::new(range.anchor, focus_point)
        } else {
            DomRange::caret(focus_point)
        });
        // Movement never changes content
        false
    }

    /// Remove all content (read-only surfaces are left alone)
    pub fn clear(&mut self) -> bool {
        if !self.editable {
            return false;
        }
        let before = self.snapshot();
        self.document.clear();
        if self.selection.is_some() {
            self.set_caret(DomPoint::new(Vec::new(), 0));
        }
        self.commit(before);
        true
    }

    /// Replace all content, caret at the end
    pub fn replace_content(&mut self, nodes: Vec<Node>) {
        let before = self.snapshot();
        self.document.replace_children(nodes);
        if self.selection.is_some() {
            let end = self.document.end_point();
            self.set_caret(end);
        }
        self.commit(before);
        self.enforce_limit();
    }
}

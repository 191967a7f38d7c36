//! Tree points and ranges, and the splicing operations performed on them.
//!
//! A [`DomPoint`] is a path of child indices from the root to a container
//! plus an offset: a character offset when the container is a text node, a
//! child index when it is an element. Ordering follows document order.

use std::cmp::Ordering;

use crate::util::text::{char_count, char_to_byte};

use super::document::{EditableDocument, Node};
use super::error::EditError;

/// A position in the document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DomPoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl DomPoint {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Point inside child `index` of this point's container
    pub fn child(&self, index: usize, offset: usize) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self { path, offset }
    }

    /// Adjust for a node inserted at `index` in the container `parent`
    pub(crate) fn shift_for_insert(&mut self, parent: &[usize], index: usize) {
        if self.path.len() > parent.len() && self.path.starts_with(parent) {
            let slot = &mut self.path[parent.len()];
            if *slot >= index {
                *slot += 1;
            }
        } else if self.path == parent && self.offset >= index {
            self.offset += 1;
        }
    }
}

fn common_prefix_len(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl Ord for DomPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let common = common_prefix_len(&self.path, &other.path);
        let self_is_container = self.path.len() == common;
        let other_is_container = other.path.len() == common;
        match (self_is_container, other_is_container) {
            (true, true) => self.offset.cmp(&other.offset),
            // An ancestor boundary at or before the branch child comes first
            (true, false) => {
                if self.offset <= other.path[common] {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                if other.offset <= self.path[common] {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, false) => self.path[common].cmp(&other.path[common]),
        }
    }
}

impl PartialOrd for DomPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A selection range with anchor (fixed end) and focus (moving end)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomRange {
    pub anchor: DomPoint,
    pub focus: DomPoint,
}

impl DomRange {
    pub fn new(anchor: DomPoint, focus: DomPoint) -> Self {
        Self { anchor, focus }
    }

    /// Collapsed range (caret)
    pub fn caret(point: DomPoint) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Earlier of the two ends
    pub fn start(&self) -> &DomPoint {
        if self.anchor <= self.focus {
            &self.anchor
        } else {
            &self.focus
        }
    }

    /// Later of the two ends
    pub fn end(&self) -> &DomPoint {
        if self.anchor <= self.focus {
            &self.focus
        } else {
            &self.anchor
        }
    }

    /// Collapse onto the start or the end
    pub fn collapse(&mut self, to_start: bool) {
        let point = if to_start {
            self.start().clone()
        } else {
            self.end().clone()
        };
        self.anchor = point.clone();
        self.focus = point;
    }

    /// Collapse to the boundary right after the node at `node_path`
    pub fn set_after(&mut self, node_path: &[usize]) {
        if let Some((&index, parent)) = node_path.split_last() {
            *self = DomRange::caret(DomPoint::new(parent.to_vec(), index + 1));
        }
    }
}

type Bound<'a> = Option<(&'a [usize], usize)>;

/// Remove everything between two element boundaries, returning the removed
/// content. Partially contained elements stay in place and are represented
/// in the result by shallow clones holding their removed descendants.
fn extract_between(children: &mut Vec<Node>, start: Bound<'_>, end: Bound<'_>) -> Vec<Node> {
    let (first_full, start_branch) = match start {
        None => (0, None),
        Some(([], offset)) => (offset, None),
        Some(([branch, rest @ ..], offset)) => (branch + 1, Some((*branch, rest, offset))),
    };
    let (end_full, end_branch) = match end {
        None => (children.len(), None),
        Some(([], offset)) => (offset, None),
        Some(([branch, rest @ ..], offset)) => (*branch, Some((*branch, rest, offset))),
    };
    let first_full = first_full.min(children.len());
    let end_full = end_full.min(children.len());

    let mut out = Vec::new();

    if let (Some((sb, s_rest, s_off)), Some((eb, e_rest, e_off))) = (start_branch, end_branch) {
        if sb == eb {
            if let Some(Node::Element(el)) = children.get_mut(sb) {
                let inner =
                    extract_between(&mut el.children, Some((s_rest, s_off)), Some((e_rest, e_off)));
                out.push(Node::Element(el.shallow_clone().with_children(inner)));
            }
            return out;
        }
    }

    if let Some((sb, rest, offset)) = start_branch {
        if let Some(Node::Element(el)) = children.get_mut(sb) {
            let inner = extract_between(&mut el.children, Some((rest, offset)), None);
            out.push(Node::Element(el.shallow_clone().with_children(inner)));
        }
    }

    let removed = if first_full < end_full {
        out.extend(children.drain(first_full..end_full));
        end_full - first_full
    } else {
        0
    };

    if let Some((eb, rest, offset)) = end_branch {
        if let Some(Node::Element(el)) = children.get_mut(eb.saturating_sub(removed)) {
            let inner = extract_between(&mut el.children, None, Some((rest, offset)));
            out.push(Node::Element(el.shallow_clone().with_children(inner)));
        }
    }

    out
}

impl EditableDocument {
    /// Turn a point inside a text node into an element boundary, splitting
    /// the text node when the point falls strictly inside it. Returns the
    /// boundary and whether a node was inserted.
    pub(crate) fn split_text_at(&mut self, point: &DomPoint) -> Result<(DomPoint, bool), EditError> {
        if !self.contains_point(point) {
            return Err(EditError::InvalidPoint);
        }
        let Some((&index, parent)) = point.path.split_last() else {
            return Ok((point.clone(), false));
        };
        let tail = match self.node_mut(&point.path) {
            Some(Node::Text(text)) => {
                if point.offset == 0 {
                    return Ok((DomPoint::new(parent.to_vec(), index), false));
                }
                if point.offset >= char_count(text) {
                    return Ok((DomPoint::new(parent.to_vec(), index + 1), false));
                }
                let at = char_to_byte(text, point.offset);
                text.split_off(at)
            }
            Some(Node::Element(_)) => return Ok((point.clone(), false)),
            None => return Err(EditError::InvalidPoint),
        };
        let siblings = self.children_mut(parent).ok_or(EditError::InvalidPoint)?;
        siblings.insert(index + 1, Node::Text(tail));
        self.touch();
        Ok((DomPoint::new(parent.to_vec(), index + 1), true))
    }

    /// Remove the content of `range`, returning the collapsed start point
    /// and the removed nodes.
    pub fn extract_contents(&mut self, range: &DomRange) -> Result<(DomPoint, Vec<Node>), EditError> {
        let start = range.start().clone();
        let end = range.end().clone();
        if !self.contains_point(&start) || !self.contains_point(&end) {
            return Err(EditError::InvalidPoint);
        }
        if start == end {
            return Ok((start, Vec::new()));
        }

        if start.path == end.path {
            if let Some(Node::Text(text)) = self.node_mut(&start.path) {
                let from = char_to_byte(text, start.offset);
                let to = char_to_byte(text, end.offset);
                let removed: String = text.drain(from..to).collect();
                self.touch();
                return Ok((start, vec![Node::Text(removed)]));
            }
        }

        // Split the end first so the start indices stay valid
        let (mut end_b, _) = self.split_text_at(&end)?;
        let (start_b, inserted) = self.split_text_at(&start)?;
        if inserted {
            if let Some((_, parent)) = start.path.split_last() {
                end_b.shift_for_insert(parent, start_b.offset);
            }
        }

        // Only nodes below the common container are cloned
        let common = common_prefix_len(&start_b.path, &end_b.path);
        let container = self
            .children_mut(&start_b.path[..common])
            .ok_or(EditError::InvalidPoint)?;
        let fragment = extract_between(
            container,
            Some((&start_b.path[common..], start_b.offset)),
            Some((&end_b.path[common..], end_b.offset)),
        );
        self.touch();
        Ok((start_b, fragment))
    }

    /// Delete the content of `range`; returns the collapsed start point
    pub fn delete_contents(&mut self, range: &DomRange) -> Result<DomPoint, EditError> {
        self.extract_contents(range).map(|(point, _)| point)
    }

    /// Insert `node` at `point`, splitting a text container when needed.
    /// Returns the boundary right after the inserted node.
    pub fn insert_node(&mut self, point: &DomPoint, node: Node) -> Result<DomPoint, EditError> {
        let (boundary, _) = self.split_text_at(point)?;
        let siblings = self
            .children_mut(&boundary.path)
            .ok_or(EditError::InvalidPoint)?;
        let index = boundary.offset.min(siblings.len());
        siblings.insert(index, node);
        self.touch();
        Ok(DomPoint::new(boundary.path, index + 1))
    }

    /// Insert text at `point`, merging into an adjacent text node when one
    /// exists. Returns the caret position right after the inserted text.
    pub fn insert_text(&mut self, point: &DomPoint, text: &str) -> Result<DomPoint, EditError> {
        if !self.contains_point(point) {
            return Err(EditError::InvalidPoint);
        }
        let added = char_count(text);
        if added == 0 {
            return Ok(point.clone());
        }

        if let Some(Node::Text(existing)) = self.node_mut(&point.path) {
            let at = char_to_byte(existing, point.offset);
            existing.insert_str(at, text);
            self.touch();
            return Ok(DomPoint::new(point.path.clone(), point.offset + added));
        }

        let siblings = self
            .children_mut(&point.path)
            .ok_or(EditError::InvalidPoint)?;
        let index = point.offset.min(siblings.len());
        if index > 0 {
            if let Some(Node::Text(prev)) = siblings.get_mut(index - 1) {
                let len = char_count(prev);
                prev.push_str(text);
                self.touch();
                return Ok(point.child(index - 1, len + added));
            }
        }
        if let Some(Node::Text(next)) = siblings.get_mut(index) {
            next.insert_str(0, text);
            self.touch();
            return Ok(point.child(index, added));
        }
        siblings.insert(index, Node::Text(text.to_string()));
        self.touch();
        Ok(point.child(index, added))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::document::{Element, Tag};

    fn p(path: &[usize], offset: usize) -> DomPoint {
        DomPoint::new(path.to_vec(), offset)
    }

    fn sample() -> EditableDocument {
        // "Hello <b>bold</b> world"
        EditableDocument::from_nodes(vec![
            Node::text("Hello "),
            Node::element(Tag::Bold, vec![Node::text("bold")]),
            Node::text(" world"),
        ])
    }

    #[test]
    fn test_point_ordering() {
        assert!(p(&[0], 2) < p(&[0], 3));
        assert!(p(&[0], 6) < p(&[1, 0], 0));
        assert!(p(&[], 1) < p(&[1, 0], 0));
        assert!(p(&[], 2) > p(&[1, 0], 4));
        assert!(p(&[1, 0], 4) < p(&[2], 0));
        assert_eq!(p(&[1], 0).cmp(&p(&[1], 0)), Ordering::Equal);
    }

    #[test]
    fn test_range_start_end_reversed() {
        let range = DomRange::new(p(&[2], 3), p(&[0], 1));
        assert_eq!(range.start(), &p(&[0], 1));
        assert_eq!(range.end(), &p(&[2], 3));

        let mut collapsed = range.clone();
        collapsed.collapse(true);
        assert!(collapsed.is_collapsed());
        assert_eq!(collapsed.focus, p(&[0], 1));
    }

    #[test]
    fn test_set_after() {
        let mut range = DomRange::caret(p(&[0], 0));
        range.set_after(&[1]);
        assert_eq!(range, DomRange::caret(p(&[], 2)));
    }

    #[test]
    fn test_delete_within_text() {
        let mut doc = sample();
        let point = doc
            .delete_contents(&DomRange::new(p(&[0], 1), p(&[0], 4)))
            .unwrap();
        assert_eq!(point, p(&[0], 1));
        assert_eq!(doc.plain_text(), "Ho bold world");
    }

    #[test]
    fn test_delete_across_formatting() {
        let mut doc = sample();
        // "Hel|lo <b>bo|ld</b>"
        let point = doc
            .delete_contents(&DomRange::new(p(&[0], 3), p(&[1, 0], 2)))
            .unwrap();
        assert_eq!(doc.plain_text(), "Helld world");
        assert_eq!(doc.to_html(), "Hel<b>ld</b> world");
        assert!(doc.contains_point(&point));
        assert_eq!(doc.point_to_offset(&point), Some(3));
    }

    #[test]
    fn test_extract_returns_removed_structure() {
        let mut doc = sample();
        let (_, fragment) = doc
            .extract_contents(&DomRange::new(p(&[1, 0], 2), p(&[2], 3)))
            .unwrap();
        let removed = EditableDocument::from_nodes(fragment);
        assert_eq!(removed.to_html(), "<b>ld</b> wo");
        assert_eq!(doc.to_html(), "Hello <b>bo</b>rld");
    }

    #[test]
    fn test_delete_across_blocks() {
        let mut doc = EditableDocument::from_nodes(vec![
            Node::element(Tag::Paragraph, vec![Node::text("first")]),
            Node::element(Tag::Paragraph, vec![Node::text("second")]),
            Node::element(Tag::Paragraph, vec![Node::text("third")]),
        ]);
        let point = doc
            .delete_contents(&DomRange::new(p(&[0, 0], 2), p(&[2, 0], 3)))
            .unwrap();
        assert_eq!(doc.plain_text(), "fi\nrd");
        assert!(doc.contains_point(&point));
    }

    #[test]
    fn test_insert_node_splits_text() {
        let mut doc = EditableDocument::from_plain_text("abcd");
        let img = Node::Element(Element::new(Tag::Image).with_attr("src", "data:x"));
        let after = doc.insert_node(&p(&[0], 2), img).unwrap();
        assert_eq!(after, p(&[], 2));
        assert_eq!(doc.to_html(), "ab<img src=\"data:x\">cd");
    }

    #[test]
    fn test_insert_node_at_text_edges_does_not_split() {
        let mut doc = EditableDocument::from_plain_text("ab");
        let after = doc.insert_node(&p(&[0], 2), Node::line_break()).unwrap();
        assert_eq!(after, p(&[], 2));
        assert_eq!(doc.children().len(), 2);

        let after = doc.insert_node(&p(&[0], 0), Node::line_break()).unwrap();
        assert_eq!(after, p(&[], 1));
        assert_eq!(doc.plain_text(), "\nab\n");
    }

    #[test]
    fn test_insert_text_merges_with_neighbour() {
        let mut doc = EditableDocument::from_nodes(vec![Node::text("ab"), Node::line_break()]);
        let caret = doc.insert_text(&p(&[], 1), "cd").unwrap();
        assert_eq!(caret, p(&[0], 4));
        assert_eq!(doc.children().len(), 2);
        assert_eq!(doc.plain_text(), "abcd\n");
    }

    #[test]
    fn test_insert_text_into_empty_document() {
        let mut doc = EditableDocument::new();
        let caret = doc.insert_text(&p(&[], 0), "hi").unwrap();
        assert_eq!(caret, p(&[0], 2));
        assert_eq!(doc.plain_text(), "hi");
    }

    #[test]
    fn test_invalid_points_rejected() {
        let mut doc = EditableDocument::from_plain_text("ab");
        assert_eq!(
            doc.insert_text(&p(&[0], 9), "x"),
            Err(EditError::InvalidPoint)
        );
        assert_eq!(
            doc.delete_contents(&DomRange::new(p(&[0], 0), p(&[5], 0))),
            Err(EditError::InvalidPoint)
        );
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut doc = EditableDocument::from_plain_text("ab");
        let before = doc.revision();
        doc.insert_text(&p(&[0], 1), "x").unwrap();
        assert!(doc.revision() > before);
    }
}

//! Rich-text commands over the live selection.
//!
//! [`RichTextCommands`] is the seam between toolbar/shortcut handling and
//! the document: callers only ever go through the trait, and every command
//! that changes content is followed by the post-mutation correction.

use tracing::{debug, warn};

use super::document::{EditableDocument, Element, Node, Tag};
use super::range::{DomPoint, DomRange};
use super::surface::EditableSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Block formats offered by the block picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    Paragraph,
    /// Heading level, clamped to 1-4
    Heading(u8),
}

impl BlockFormat {
    pub fn tag(self) -> Tag {
        match self {
            BlockFormat::Paragraph => Tag::Paragraph,
            BlockFormat::Heading(level) => Tag::Heading(level.clamp(1, 4)),
        }
    }
}

/// Formatting operations applied to the live selection. Each returns
/// whether the document changed.
pub trait RichTextCommands {
    fn toggle_bold(&mut self) -> bool;
    fn toggle_italic(&mut self) -> bool;
    fn toggle_underline(&mut self) -> bool;
    fn toggle_strikethrough(&mut self) -> bool;
    fn set_alignment(&mut self, alignment: Alignment) -> bool;
    fn insert_ordered_list(&mut self) -> bool;
    fn insert_unordered_list(&mut self) -> bool;
    fn format_block(&mut self, format: BlockFormat) -> bool;
    fn set_font_name(&mut self, name: &str) -> bool;
    fn create_link(&mut self, url: &str) -> bool;
    fn undo(&mut self) -> bool;
    fn redo(&mut self) -> bool;
}

fn common_prefix(a: &[usize], b: &[usize]) -> Vec<usize> {
    a.iter()
        .zip(b)
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| *x)
        .collect()
}

/// Innermost element with `tag` containing the whole range
fn enclosing_tag(doc: &EditableDocument, range: &DomRange, tag: Tag) -> Option<Vec<usize>> {
    let common = common_prefix(&range.start().path, &range.end().path);
    (1..=common.len())
        .rev()
        .map(|len| &common[..len])
        .find(|path| doc.element(path).is_some_and(|el| el.tag == tag))
        .map(<[usize]>::to_vec)
}

/// Replace the element at `path` with its children
fn unwrap_element(doc: &mut EditableDocument, path: &[usize]) -> bool {
    let Some((&index, parent)) = path.split_last() else {
        return false;
    };
    let Some(siblings) = doc.children_mut(parent) else {
        return false;
    };
    let Node::Element(el) = siblings.remove(index) else {
        return false;
    };
    for (offset, child) in el.children.into_iter().enumerate() {
        siblings.insert(index + offset, child);
    }
    doc.touch();
    true
}

/// The block containing `point`; a root-level inline run is wrapped in a
/// `<div>` first so it has one.
fn ensure_block(doc: &mut EditableDocument, point: &DomPoint) -> Option<Vec<usize>> {
    if let Some(path) = doc.enclosing_block(point) {
        return Some(path);
    }
    let root = doc.children_mut(&[])?;
    if root.is_empty() {
        root.push(Node::element(Tag::Div, Vec::new()));
        doc.touch();
        return Some(vec![0]);
    }
    let top = match point.path.first() {
        Some(&index) => index,
        None => point.offset.min(root.len() - 1),
    };
    if root[top].tag().is_some_and(Tag::is_block) {
        return Some(vec![top]);
    }

    let inline = |node: &Node| node.tag().map_or(true, |tag| !tag.is_block() && tag != Tag::LineBreak);
    let (start, end) = if inline(&root[top]) {
        let start = root[..top]
            .iter()
            .rposition(|node| !inline(node))
            .map_or(0, |i| i + 1);
        let end = root[top..]
            .iter()
            .position(|node| !inline(node))
            .map_or(root.len(), |i| top + i);
        (start, end)
    } else {
        (top, top + 1)
    };

    let run: Vec<Node> = root.drain(start..end).collect();
    root.insert(start, Node::element(Tag::Div, run));
    doc.touch();
    Some(vec![start])
}

fn retag_block(doc: &mut EditableDocument, path: &[usize], tag: Tag) -> bool {
    let Some(el) = doc.element_mut(path) else {
        return false;
    };
    match el.tag {
        Tag::Paragraph | Tag::Heading(_) | Tag::Div | Tag::Pre => {
            if el.tag == tag {
                return false;
            }
            el.tag = tag;
        }
        Tag::ListItem => {
            let children = std::mem::take(&mut el.children);
            el.children = vec![Node::element(tag, children)];
        }
        _ => return false,
    }
    doc.touch();
    true
}

fn toggle_list(doc: &mut EditableDocument, path: &[usize], list_tag: Tag) -> bool {
    let Some(tag) = doc.element(path).map(|el| el.tag) else {
        return false;
    };
    match tag {
        Tag::ListItem => {
            let Some((&_, parent)) = path.split_last() else {
                return false;
            };
            let Some(list) = doc.element_mut(parent) else {
                return false;
            };
            if list.tag == list_tag {
                // Same kind of list: turn the items back into paragraphs
                let items = std::mem::take(&mut list.children);
                let paragraphs: Vec<Node> = items
                    .into_iter()
                    .map(|item| match item {
                        Node::Element(el) if el.tag == Tag::ListItem => {
                            Node::element(Tag::Paragraph, el.children)
                        }
                        other => other,
                    })
                    .collect();
                let Some((&index, grandparent)) = parent.split_last() else {
                    return false;
                };
                let Some(siblings) = doc.children_mut(grandparent) else {
                    return false;
                };
                siblings.remove(index);
                for (offset, node) in paragraphs.into_iter().enumerate() {
                    siblings.insert(index + offset, node);
                }
            } else {
                list.tag = list_tag;
            }
        }
        Tag::Paragraph | Tag::Div | Tag::Heading(_) | Tag::Pre => {
            let Some((&index, parent)) = path.split_last() else {
                return false;
            };
            let Some(siblings) = doc.children_mut(parent) else {
                return false;
            };
            let Node::Element(block) = siblings.remove(index) else {
                return false;
            };
            let item_children = match block.tag {
                Tag::Paragraph | Tag::Div => block.children,
                _ => vec![Node::Element(block)],
            };
            siblings.insert(
                index,
                Node::element(list_tag, vec![Node::element(Tag::ListItem, item_children)]),
            );
        }
        _ => return false,
    }
    doc.touch();
    true
}

impl EditableSurface {
    /// Run a structural change on the document at the selection start,
    /// keeping the selection at the same plain-text offsets.
    fn block_command(
        &mut self,
        name: &str,
        apply: impl FnOnce(&mut EditableDocument, &DomPoint) -> bool,
    ) -> bool {
        if !self.is_editable() {
            return false;
        }
        let Some(range) = self.selection().cloned() else {
            return false;
        };
        let offsets = self.selection_offsets();
        let before = self.snapshot();
        if !apply(self.document_mut(), range.start()) {
            return false;
        }
        if let Some((anchor, focus)) = offsets {
            let len = self.text_len();
            if let Err(err) = self.set_selection_by_offsets(anchor.min(len), focus.min(len)) {
                warn!(%err, command = name, "could not restore selection");
            }
        }
        self.commit(before);
        debug!(command = name, "block command applied");
        self.enforce_limit();
        true
    }

    /// Wrap the selected content in `wrapper`, selecting the wrapped content
    fn wrap_selection(&mut self, wrapper: Element) -> bool {
        if !self.is_editable() {
            return false;
        }
        let Some(range) = self.selection().cloned().filter(|r| !r.is_collapsed()) else {
            return false;
        };
        let before = self.snapshot();
        let tag = wrapper.tag;
        let doc = self.document_mut();
        let result = doc.extract_contents(&range).and_then(|(start, fragment)| {
            let count = fragment.len();
            doc.insert_node(&start, Node::Element(wrapper.with_children(fragment)))
                .map(|after| (after, count))
        });
        match result {
            Ok((after, count)) => {
                let wrapper_point = after.child(after.offset.saturating_sub(1), 0);
                let mut wrapper_path = after.path.clone();
                wrapper_path.push(after.offset.saturating_sub(1));
                self.set_selection(Some(DomRange::new(
                    wrapper_point,
                    DomPoint::new(wrapper_path, count),
                )));
                self.commit(before);
                debug!(tag = tag.name(), "selection wrapped");
                self.enforce_limit();
                true
            }
            Err(err) => {
                warn!(%err, tag = tag.name(), "could not wrap selection");
                false
            }
        }
    }

    fn toggle_inline(&mut self, tag: Tag) -> bool {
        if !self.is_editable() {
            return false;
        }
        let Some(range) = self.selection().cloned().filter(|r| !r.is_collapsed()) else {
            return false;
        };
        match enclosing_tag(self.document(), &range, tag) {
            Some(path) => self.block_command(tag.name(), move |doc, _| unwrap_element(doc, &path)),
            None => self.wrap_selection(Element::new(tag)),
        }
    }

    fn insert_list(&mut self, list_tag: Tag) -> bool {
        self.block_command(list_tag.name(), move |doc, point| {
            ensure_block(doc, point).is_some_and(|path| toggle_list(doc, &path, list_tag))
        })
    }
}

impl RichTextCommands for EditableSurface {
    fn toggle_bold(&mut self) -> bool {
        self.toggle_inline(Tag::Bold)
    }

    fn toggle_italic(&mut self) -> bool {
        self.toggle_inline(Tag::Italic)
    }

    fn toggle_underline(&mut self) -> bool {
        self.toggle_inline(Tag::Underline)
    }

    fn toggle_strikethrough(&mut self) -> bool {
        self.toggle_inline(Tag::Strikethrough)
    }

    fn set_alignment(&mut self, alignment: Alignment) -> bool {
        self.block_command("align", move |doc, point| {
            let Some(path) = ensure_block(doc, point) else {
                return false;
            };
            let Some(el) = doc.element_mut(&path) else {
                return false;
            };
            el.set_style_property("text-align", alignment.css());
            doc.touch();
            true
        })
    }

    fn insert_ordered_list(&mut self) -> bool {
        self.insert_list(Tag::OrderedList)
    }

    fn insert_unordered_list(&mut self) -> bool {
        self.insert_list(Tag::UnorderedList)
    }

    fn format_block(&mut self, format: BlockFormat) -> bool {
        self.block_command("formatBlock", move |doc, point| {
            ensure_block(doc, point).is_some_and(|path| retag_block(doc, &path, format.tag()))
        })
    }

    fn set_font_name(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        self.wrap_selection(Element::new(Tag::Font).with_attr("face", name.trim()))
    }

    fn create_link(&mut self, url: &str) -> bool {
        if url.trim().is_empty() {
            return false;
        }
        self.wrap_selection(Element::new(Tag::Link).with_attr("href", url.trim()))
    }

    fn undo(&mut self) -> bool {
        let changed = self.undo_step();
        if changed {
            self.enforce_limit();
        }
        changed
    }

    fn redo(&mut self) -> bool {
        let changed = self.redo_step();
        if changed {
            self.enforce_limit();
        }
        changed
    }
}

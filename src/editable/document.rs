//! Node tree backing the editable surface.
//!
//! The tree mirrors the subset of HTML an editable region produces: text
//! runs, inline formatting, blocks, lists, tables, code blocks, images and
//! line breaks. Two views are derived from it:
//!
//! - [`EditableDocument::plain_text`]: the character-count authority used by
//!   the budget and the export
//! - [`EditableDocument::to_html`]: the serialized rich content shown by the
//!   preview

use std::collections::HashMap;

use crate::util::text::{char_count, char_to_byte, escape_attr, escape_text, word_count};

use super::range::DomPoint;

/// Element kinds understood by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The implicit container holding the document
    Root,
    Paragraph,
    /// Heading level 1-4
    Heading(u8),
    Div,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Link,
    Font,
    OrderedList,
    UnorderedList,
    ListItem,
    Table,
    TableHead,
    TableBody,
    TableRow,
    HeaderCell,
    Cell,
    Pre,
    Code,
    Image,
    LineBreak,
}

impl Tag {
    /// HTML element name
    pub fn name(self) -> &'static str {
        match self {
            Tag::Root | Tag::Div => "div",
            Tag::Paragraph => "p",
            Tag::Heading(1) => "h1",
            Tag::Heading(2) => "h2",
            Tag::Heading(3) => "h3",
            Tag::Heading(_) => "h4",
            Tag::Bold => "b",
            Tag::Italic => "i",
            Tag::Underline => "u",
            Tag::Strikethrough => "strike",
            Tag::Link => "a",
            Tag::Font => "font",
            Tag::OrderedList => "ol",
            Tag::UnorderedList => "ul",
            Tag::ListItem => "li",
            Tag::Table => "table",
            Tag::TableHead => "thead",
            Tag::TableBody => "tbody",
            Tag::TableRow => "tr",
            Tag::HeaderCell => "th",
            Tag::Cell => "td",
            Tag::Pre => "pre",
            Tag::Code => "code",
            Tag::Image => "img",
            Tag::LineBreak => "br",
        }
    }

    /// Block elements start on a new line in the plain-text view
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::Paragraph
                | Tag::Heading(_)
                | Tag::Div
                | Tag::OrderedList
                | Tag::UnorderedList
                | Tag::ListItem
                | Tag::Table
                | Tag::TableHead
                | Tag::TableBody
                | Tag::TableRow
                | Tag::Pre
        )
    }

    /// Table cells are separated by tabs in the plain-text view
    pub fn is_cell(self) -> bool {
        matches!(self, Tag::HeaderCell | Tag::Cell)
    }

    /// Void elements never have children
    pub fn is_void(self) -> bool {
        matches!(self, Tag::Image | Tag::LineBreak)
    }
}

/// An element node: tag, attributes in insertion order, children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Set one property inside the `style` attribute, keeping the others
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut parts: Vec<String> = self
            .attr("style")
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|decl| !decl.is_empty())
            .filter(|decl| {
                decl.split(':')
                    .next()
                    .map(|name| name.trim() != property)
                    .unwrap_or(true)
            })
            .map(str::to_string)
            .collect();
        parts.push(format!("{}: {}", property, value));
        self.set_attr("style", format!("{};", parts.join("; ")));
    }

    /// Same tag and attributes, no children
    pub(crate) fn shallow_clone(&self) -> Element {
        Element {
            tag: self.tag,
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn element(tag: Tag, children: Vec<Node>) -> Self {
        Node::Element(Element::new(tag).with_children(children))
    }

    pub fn line_break() -> Self {
        Node::Element(Element::new(Tag::LineBreak))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<Tag> {
        self.as_element().map(|el| el.tag)
    }
}

// =============================================================================
// Plain-text walk
// =============================================================================

/// Running state of the plain-text walk.
///
/// Block elements emit a newline when entered with non-empty output that
/// does not already end in one. Content that follows a closed block gets a
/// deferred newline, emitted only when that content actually appears.
#[derive(Debug, Default, Clone)]
struct TextAcc {
    len: usize,
    ends_with_newline: bool,
    pending_break: bool,
}

impl TextAcc {
    fn needs_break(&self) -> bool {
        self.len > 0 && !self.ends_with_newline
    }

    fn push_char(&mut self, ch: char) {
        self.len += 1;
        self.ends_with_newline = ch == '\n';
    }

    fn push_str(&mut self, text: &str) {
        if let Some(last) = text.chars().last() {
            self.len += char_count(text);
            self.ends_with_newline = last == '\n';
        }
    }

    /// Whether the next content would be preceded by a deferred newline
    fn break_due(&self) -> bool {
        self.pending_break && self.needs_break()
    }

    /// Emit the deferred newline if one is due
    fn flush_break(&mut self) -> bool {
        let due = self.break_due();
        self.pending_break = false;
        if due {
            self.push_char('\n');
        }
        due
    }
}

/// Receives the pieces of the plain-text walk
trait TextSink {
    /// A separator character; `at` is the offset just after it
    fn separator(&mut self, _ch: char, _at: usize, _point: DomPoint) {}
    /// A text node starting at `start`
    fn text(&mut self, _path: &[usize], _start: usize, _text: &str) {}
    /// The boundary before child `index` of `container`
    fn boundary(&mut self, _container: &[usize], _index: usize, _offset: usize) {}
}

impl TextSink for () {}

impl TextSink for String {
    fn separator(&mut self, ch: char, _at: usize, _point: DomPoint) {
        self.push(ch);
    }

    fn text(&mut self, _path: &[usize], _start: usize, text: &str) {
        self.push_str(text);
    }
}

fn walk<S: TextSink>(el: &Element, path: &mut Vec<usize>, acc: &mut TextAcc, sink: &mut S) {
    for (index, child) in el.children.iter().enumerate() {
        sink.boundary(path, index, acc.len);
        path.push(index);
        match child {
            Node::Text(text) => {
                if !text.is_empty() && acc.flush_break() {
                    sink.separator('\n', acc.len, DomPoint::new(path.clone(), 0));
                }
                sink.text(path, acc.len, text);
                acc.push_str(text);
            }
            Node::Element(child_el) => match child_el.tag {
                Tag::LineBreak => {
                    let parent = path[..path.len() - 1].to_vec();
                    if acc.flush_break() {
                        sink.separator('\n', acc.len, DomPoint::new(parent.clone(), index));
                    }
                    acc.push_char('\n');
                    sink.separator('\n', acc.len, DomPoint::new(parent, index + 1));
                }
                Tag::Image => {}
                tag => {
                    if tag.is_block() {
                        acc.pending_break = false;
                        if acc.needs_break() {
                            acc.push_char('\n');
                            sink.separator('\n', acc.len, DomPoint::new(path.clone(), 0));
                        }
                    } else if tag.is_cell() && index > 0 {
                        if acc.flush_break() {
                            sink.separator('\n', acc.len, DomPoint::new(path.clone(), 0));
                        }
                        acc.push_char('\t');
                        sink.separator('\t', acc.len, DomPoint::new(path.clone(), 0));
                    }
                    walk(child_el, path, acc, sink);
                    if tag.is_block() && acc.needs_break() {
                        acc.pending_break = true;
                    }
                }
            },
        }
        path.pop();
    }
    sink.boundary(path, el.children.len(), acc.len);
}

/// Recursive structure-preserving truncation. Returns whether anything
/// was removed.
fn truncate_element(el: &mut Element, acc: &mut TextAcc, max: usize) -> bool {
    let mut keep = el.children.len();
    let mut changed = false;

    for index in 0..el.children.len() {
        if acc.len >= max {
            keep = index;
            break;
        }
        let room = max - acc.len;
        let break_cost = usize::from(acc.break_due());
        match &mut el.children[index] {
            Node::Text(text) => {
                if text.is_empty() {
                    continue;
                }
                if room <= break_cost {
                    keep = index;
                    break;
                }
                acc.flush_break();
                let room = max - acc.len;
                if char_count(text) > room {
                    let cut = char_to_byte(text, room);
                    text.truncate(cut);
                    acc.push_str(text);
                    changed = true;
                    keep = index + 1;
                    break;
                }
                acc.push_str(text);
            }
            Node::Element(child) => match child.tag {
                Tag::LineBreak => {
                    if room < break_cost + 1 {
                        keep = index;
                        break;
                    }
                    acc.flush_break();
                    acc.push_char('\n');
                }
                Tag::Image => {}
                tag => {
                    if tag.is_block() {
                        acc.pending_break = false;
                        if acc.needs_break() {
                            acc.push_char('\n');
                        }
                    } else if tag.is_cell() && index > 0 {
                        if room < break_cost + 1 {
                            keep = index;
                            break;
                        }
                        acc.flush_break();
                        acc.push_char('\t');
                    }
                    changed |= truncate_element(child, acc, max);
                    if tag.is_block() && acc.needs_break() {
                        acc.pending_break = true;
                    }
                }
            },
        }
    }

    if keep < el.children.len() {
        el.children.truncate(keep);
        changed = true;
    }
    changed
}

/// What the tail of a child list ends with, scanning backwards
enum Tail {
    Empty,
    Content,
    Closed,
}

/// Append a `<br>` to the innermost block or cell that ends the content,
/// so a deferred block break survives as a real newline.
fn close_last_block(children: &mut [Node]) -> Tail {
    for node in children.iter_mut().rev() {
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(_) => return Tail::Content,
            Node::Element(el) => match el.tag {
                Tag::Image => {}
                Tag::LineBreak => return Tail::Content,
                tag if tag.is_block() || tag.is_cell() => {
                    if !matches!(close_last_block(&mut el.children), Tail::Closed) {
                        el.children.push(Node::line_break());
                    }
                    return Tail::Closed;
                }
                _ => match close_last_block(&mut el.children) {
                    Tail::Empty => {}
                    tail => return tail,
                },
            },
        }
    }
    Tail::Empty
}

fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_text(text, out),
        Node::Element(el) => {
            out.push('<');
            out.push_str(el.tag.name());
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');
            if el.tag.is_void() {
                return;
            }
            for child in &el.children {
                write_html(child, out);
            }
            out.push_str("</");
            out.push_str(el.tag.name());
            out.push('>');
        }
    }
}

// =============================================================================
// Offset mapping
// =============================================================================

#[derive(Debug, Clone)]
struct TextSpan {
    path: Vec<usize>,
    start: usize,
    len: usize,
}

/// Mapping between tree points and plain-text offsets, built from one walk
#[derive(Debug, Clone, Default)]
pub struct TextMap {
    total: usize,
    spans: Vec<TextSpan>,
    separators: Vec<(usize, DomPoint)>,
    boundaries: HashMap<DomPoint, usize>,
}

impl TextSink for TextMap {
    fn separator(&mut self, _ch: char, at: usize, point: DomPoint) {
        self.separators.push((at, point));
    }

    fn text(&mut self, path: &[usize], start: usize, text: &str) {
        self.spans.push(TextSpan {
            path: path.to_vec(),
            start,
            len: char_count(text),
        });
    }

    fn boundary(&mut self, container: &[usize], index: usize, offset: usize) {
        self.boundaries
            .insert(DomPoint::new(container.to_vec(), index), offset);
    }
}

impl TextMap {
    /// Total plain-text length
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Plain-text offset of a tree point, if the point exists in the tree
    pub fn point_to_offset(&self, point: &DomPoint) -> Option<usize> {
        if let Some(span) = self.spans.iter().find(|span| span.path == point.path) {
            return Some(span.start + point.offset.min(span.len));
        }
        self.boundaries.get(point).copied()
    }

    /// Tree point for a plain-text offset (clamped to the text length)
    pub fn offset_to_point(&self, offset: usize) -> DomPoint {
        let offset = offset.min(self.total);
        if let Some(span) = self
            .spans
            .iter()
            .find(|span| span.len > 0 && span.start <= offset && offset <= span.start + span.len)
        {
            return DomPoint::new(span.path.clone(), offset - span.start);
        }
        if let Some((_, point)) = self.separators.iter().find(|(at, _)| *at == offset) {
            return point.clone();
        }
        if offset == 0 {
            return DomPoint::new(Vec::new(), 0);
        }
        // Past every recorded piece: the end of the root
        let end = self
            .boundaries
            .keys()
            .filter(|point| point.path.is_empty())
            .map(|point| point.offset)
            .max()
            .unwrap_or(0);
        DomPoint::new(Vec::new(), end)
    }
}

// =============================================================================
// EditableDocument
// =============================================================================

/// The editable content: a node tree under an implicit root plus a
/// revision counter bumped on every mutation.
#[derive(Debug, Clone)]
pub struct EditableDocument {
    root: Element,
    revision: u64,
}

impl Default for EditableDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl EditableDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            root: Element::new(Tag::Root),
            revision: 0,
        }
    }

    /// Create a document from top-level nodes
    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self {
            root: Element::new(Tag::Root).with_children(children),
            revision: 0,
        }
    }

    /// Create a document from plain text, one `<br>` per newline
    pub fn from_plain_text(text: &str) -> Self {
        Self::from_nodes(plain_text_nodes(text))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn children(&self) -> &[Node] {
        &self.root.children
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Bump the revision after a mutation
    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    /// Replace the whole content
    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.root.children = children;
        self.touch();
    }

    /// Remove all content
    pub fn clear(&mut self) {
        self.replace_children(Vec::new());
    }

    /// Adopt the content of `snapshot`; the revision keeps counting up
    pub(crate) fn restore_from(&mut self, snapshot: &EditableDocument) {
        self.root = snapshot.root.clone();
        self.touch();
    }

    /// Node at `path` (the root itself has no node)
    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.children.get(*first)?;
        for &index in rest {
            node = match node {
                Node::Element(el) => el.children.get(index)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub(crate) fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.children.get_mut(*first)?;
        for &index in rest {
            node = match node {
                Node::Element(el) => el.children.get_mut(index)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    /// Element at `path`; the empty path is the root
    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        if path.is_empty() {
            return Some(&self.root);
        }
        self.node(path).and_then(Node::as_element)
    }

    pub(crate) fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        if path.is_empty() {
            return Some(&mut self.root);
        }
        match self.node_mut(path)? {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Children of the container element at `path` (never a void element)
    pub(crate) fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let el = self.element_mut(path)?;
        if el.tag.is_void() {
            return None;
        }
        Some(&mut el.children)
    }

    /// Whether `point` addresses a valid container and offset
    pub fn contains_point(&self, point: &DomPoint) -> bool {
        if point.path.is_empty() {
            return point.offset <= self.root.children.len();
        }
        match self.node(&point.path) {
            Some(Node::Text(text)) => point.offset <= char_count(text),
            Some(Node::Element(el)) => !el.tag.is_void() && point.offset <= el.children.len(),
            None => false,
        }
    }

    /// Nearest block element containing `point` (the root does not count)
    pub fn enclosing_block(&self, point: &DomPoint) -> Option<Vec<usize>> {
        (1..=point.path.len())
            .rev()
            .map(|len| &point.path[..len])
            .find(|path| self.element(path).is_some_and(|el| el.tag.is_block()))
            .map(<[usize]>::to_vec)
    }

    /// Point after the last top-level node
    pub fn end_point(&self) -> DomPoint {
        DomPoint::new(Vec::new(), self.root.children.len())
    }

    /// The visible plain text (the `innerText` view)
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        walk(&self.root, &mut Vec::new(), &mut TextAcc::default(), &mut out);
        out
    }

    /// Length of the plain text in characters
    pub fn text_len(&self) -> usize {
        let mut acc = TextAcc::default();
        walk(&self.root, &mut Vec::new(), &mut acc, &mut ());
        acc.len
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.plain_text())
    }

    /// Serialized rich content (the `innerHTML` view)
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.root.children {
            write_html(child, &mut out);
        }
        out
    }

    /// Offset mapping for the current tree
    pub fn text_map(&self) -> TextMap {
        let mut map = TextMap::default();
        let mut acc = TextAcc::default();
        walk(&self.root, &mut Vec::new(), &mut acc, &mut map);
        map.total = acc.len;
        map
    }

    pub fn point_to_offset(&self, point: &DomPoint) -> Option<usize> {
        self.text_map().point_to_offset(point)
    }

    pub fn offset_to_point(&self, offset: usize) -> DomPoint {
        self.text_map().offset_to_point(offset)
    }

    /// Cut the content so the plain text is at most `max` characters,
    /// keeping the structure and formatting of the retained prefix.
    /// Returns whether anything was removed.
    pub fn truncate_to(&mut self, max: usize) -> bool {
        let mut acc = TextAcc::default();
        let changed = truncate_element(&mut self.root, &mut acc, max);
        // A cut right after a block leaves room for exactly its deferred break
        if changed && acc.len < max && acc.break_due() {
            close_last_block(&mut self.root.children);
        }
        if changed {
            self.touch();
        }
        changed
    }
}

/// Text runs separated by `<br>` elements
pub fn plain_text_nodes(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            nodes.push(Node::line_break());
        }
        if !line.is_empty() {
            nodes.push(Node::text(line));
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(children: Vec<Node>) -> Node {
        Node::element(Tag::Paragraph, children)
    }

    fn bold(text: &str) -> Node {
        Node::element(Tag::Bold, vec![Node::text(text)])
    }

    fn table_doc() -> EditableDocument {
        let row = |tag: Tag, cells: &[&str]| {
            Node::element(
                Tag::TableRow,
                cells
                    .iter()
                    .map(|c| Node::element(tag, vec![Node::text(*c)]))
                    .collect(),
            )
        };
        EditableDocument::from_nodes(vec![
            Node::text("intro"),
            Node::element(
                Tag::Table,
                vec![
                    Node::element(Tag::TableHead, vec![row(Tag::HeaderCell, &["H1", "H2"])]),
                    Node::element(Tag::TableBody, vec![row(Tag::Cell, &["a", "b"])]),
                ],
            ),
            Node::text("after"),
        ])
    }

    #[test]
    fn test_plain_text_inline_and_breaks() {
        let doc = EditableDocument::from_nodes(vec![
            Node::text("Hello "),
            bold("world"),
            Node::line_break(),
            Node::text("next"),
        ]);
        assert_eq!(doc.plain_text(), "Hello world\nnext");
        assert_eq!(doc.text_len(), 16);
    }

    #[test]
    fn test_plain_text_blocks() {
        let doc = EditableDocument::from_nodes(vec![
            para(vec![Node::text("one")]),
            para(vec![Node::text("two")]),
            para(vec![]),
            para(vec![Node::text("three")]),
        ]);
        assert_eq!(doc.plain_text(), "one\ntwo\nthree");
    }

    #[test]
    fn test_plain_text_table() {
        let doc = table_doc();
        assert_eq!(doc.plain_text(), "intro\nH1\tH2\na\tb\nafter");
        assert_eq!(doc.text_len(), doc.plain_text().chars().count());
    }

    #[test]
    fn test_images_contribute_nothing() {
        let doc = EditableDocument::from_nodes(vec![
            Node::text("ab"),
            Node::Element(Element::new(Tag::Image).with_attr("src", "https://x/y.png")),
            Node::text("cd"),
        ]);
        assert_eq!(doc.plain_text(), "abcd");
    }

    #[test]
    fn test_from_plain_text_round_trips() {
        for text in ["", "a", "a\nb", "\n\nx\n", "line one\n\nline three"] {
            let doc = EditableDocument::from_plain_text(text);
            assert_eq!(doc.plain_text(), text, "round trip of {:?}", text);
        }
    }

    #[test]
    fn test_to_html_escapes() {
        let doc = EditableDocument::from_nodes(vec![
            Node::text("a < b"),
            Node::Element(
                Element::new(Tag::Link)
                    .with_attr("href", "https://x/?a=1&b=\"2\"")
                    .with_children(vec![Node::text("link")]),
            ),
            Node::line_break(),
        ]);
        assert_eq!(
            doc.to_html(),
            "a &lt; b<a href=\"https://x/?a=1&amp;b=&quot;2&quot;\">link</a><br>"
        );
    }

    #[test]
    fn test_truncate_keeps_formatting() {
        let mut doc = EditableDocument::from_nodes(vec![
            Node::text("abc"),
            bold("defgh"),
            Node::text("ijk"),
        ]);
        assert!(doc.truncate_to(5));
        assert_eq!(doc.plain_text(), "abcde");
        assert_eq!(doc.to_html(), "abc<b>de</b>");
    }

    #[test]
    fn test_truncate_noop_when_within_limit() {
        let mut doc = EditableDocument::from_plain_text("short");
        let revision = doc.revision();
        assert!(!doc.truncate_to(10));
        assert_eq!(doc.revision(), revision);
    }

    #[test]
    fn test_truncate_is_exact_prefix_across_blocks() {
        let doc = EditableDocument::from_nodes(vec![
            para(vec![Node::text("one")]),
            para(vec![Node::text("two")]),
        ]);
        let full = doc.plain_text();
        for max in 0..full.chars().count() {
            let mut cut = doc.clone();
            cut.truncate_to(max);
            let expected: String = full.chars().take(max).collect();
            assert_eq!(cut.plain_text(), expected, "max = {}", max);
        }
    }

    #[test]
    fn test_truncate_table_prefix() {
        let doc = table_doc();
        let full = doc.plain_text();
        for max in 0..full.chars().count() {
            let mut cut = doc.clone();
            cut.truncate_to(max);
            let expected: String = full.chars().take(max).collect();
            assert_eq!(cut.plain_text(), expected, "max = {}", max);
        }
    }

    #[test]
    fn test_truncate_exact_prefix_with_breaks_after_blocks() {
        let docs = [
            EditableDocument::from_nodes(vec![
                para(vec![Node::text("ab"), bold("cd")]),
                Node::line_break(),
                Node::text("ef"),
                Node::line_break(),
                para(vec![Node::text("gh")]),
            ]),
            EditableDocument::from_nodes(vec![
                Node::element(
                    Tag::UnorderedList,
                    vec![
                        Node::element(Tag::ListItem, vec![Node::text("one")]),
                        Node::element(
                            Tag::ListItem,
                            vec![para(vec![Node::text("two")]), Node::line_break()],
                        ),
                    ],
                ),
                Node::text("z"),
            ]),
            EditableDocument::from_nodes(vec![
                Node::element(Tag::Div, vec![para(vec![Node::text("ab")]), bold("ef")]),
                para(vec![Node::text("xy")]),
            ]),
        ];
        for doc in docs {
            let full = doc.plain_text();
            for max in 0..full.chars().count() {
                let mut cut = doc.clone();
                cut.truncate_to(max);
                let expected: String = full.chars().take(max).collect();
                assert_eq!(cut.plain_text(), expected, "{:?} max = {}", full, max);
                assert_eq!(cut.text_len(), max);
            }
        }
    }

    #[test]
    fn test_truncate_moves_break_into_closed_block() {
        let mut doc = EditableDocument::from_nodes(vec![
            para(vec![Node::text("ab"), bold("cd")]),
            Node::line_break(),
            Node::text("ef"),
        ]);
        assert!(doc.truncate_to(5));
        assert_eq!(doc.plain_text(), "abcd\n");
        assert_eq!(doc.to_html(), "<p>ab<b>cd</b><br></p>");
    }

    #[test]
    fn test_offset_mapping_round_trip() {
        let doc = EditableDocument::from_nodes(vec![
            Node::text("ab"),
            bold("cd"),
            Node::line_break(),
            Node::text("ef"),
        ]);
        let map = doc.text_map();
        assert_eq!(map.len(), 7);
        for offset in 0..=7 {
            let point = map.offset_to_point(offset);
            assert!(doc.contains_point(&point), "offset {} -> {:?}", offset, point);
            assert_eq!(map.point_to_offset(&point), Some(offset));
        }
    }

    #[test]
    fn test_offset_mapping_element_boundaries() {
        let doc = EditableDocument::from_nodes(vec![Node::text("ab"), Node::line_break()]);
        let map = doc.text_map();
        assert_eq!(map.point_to_offset(&DomPoint::new(vec![], 0)), Some(0));
        assert_eq!(map.point_to_offset(&DomPoint::new(vec![], 1)), Some(2));
        assert_eq!(map.point_to_offset(&DomPoint::new(vec![], 2)), Some(3));
        assert_eq!(map.offset_to_point(3), DomPoint::new(vec![], 2));
    }

    #[test]
    fn test_contains_point() {
        let doc = EditableDocument::from_nodes(vec![Node::text("ab"), Node::line_break()]);
        assert!(doc.contains_point(&DomPoint::new(vec![0], 2)));
        assert!(!doc.contains_point(&DomPoint::new(vec![0], 3)));
        assert!(!doc.contains_point(&DomPoint::new(vec![1], 0)));
        assert!(!doc.contains_point(&DomPoint::new(vec![2], 0)));
        assert!(doc.contains_point(&DomPoint::new(vec![], 2)));
    }

    #[test]
    fn test_set_style_property_replaces() {
        let mut el = Element::new(Tag::Paragraph).with_attr("style", "color: red; text-align: left;");
        el.set_style_property("text-align", "center");
        assert_eq!(el.attr("style"), Some("color: red; text-align: center;"));
    }
}

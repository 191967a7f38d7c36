//! Insertion pipeline: splices externally prepared content (images, text,
//! tables, code blocks) at the selection captured before focus moved away.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::document::{Element, EditableDocument, Node, Tag};
use super::error::EditError;
use super::range::{DomPoint, DomRange};
use super::surface::EditableSurface;

/// Text placed inside a freshly inserted code block
pub const CODE_PLACEHOLDER: &str = "// Your code here";

const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%; margin: 10px 0;";
const HEADER_CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px; text-align: left;";
const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px;";
const PRE_STYLE: &str = "background-color: #282c34; color: #abb2bf; padding: 10px; border-radius: 5px; overflow-x: auto; margin: 10px 0;";

/// What to do when an insertion finds no usable saved selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSelection {
    /// Do nothing
    #[default]
    Drop,
    /// Insert at the end of the document
    Append,
}

/// Image element to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub src: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub alt: String,
}

/// Content waiting to be spliced into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInsertion {
    Image(ImageSpec),
    Text(String),
    Table { rows: usize, cols: usize },
    CodeBlock { language: Option<String> },
}

/// Result of a successful insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Caret after the inserted content
    pub caret: DomPoint,
    /// Whether the post-insertion correction had to cut content
    pub truncated: bool,
}

/// Accepted image sources: http(s) URLs and inline data URLs
pub fn is_valid_image_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:")
}

enum Content {
    Node(Node),
    Text(String),
}

impl PendingInsertion {
    /// Whether the insertion adds plain text (and so must fit the budget)
    pub fn is_text_bearing(&self) -> bool {
        !matches!(self, PendingInsertion::Image(_))
    }

    /// Short name for logs and notices
    pub fn kind(&self) -> &'static str {
        match self {
            PendingInsertion::Image(_) => "image",
            PendingInsertion::Text(_) => "text",
            PendingInsertion::Table { .. } => "table",
            PendingInsertion::CodeBlock { .. } => "code block",
        }
    }

    fn content(&self) -> Result<Content, EditError> {
        match self {
            PendingInsertion::Image(spec) => image_node(spec).map(Content::Node),
            PendingInsertion::Text(text) => Ok(Content::Text(text.clone())),
            PendingInsertion::Table { rows, cols } => table_node(*rows, *cols).map(Content::Node),
            PendingInsertion::CodeBlock { language } => {
                Ok(Content::Node(code_block_node(language.as_deref())))
            }
        }
    }
}

/// `<img>` with `src`, `alt` and the optional dimensions
pub fn image_node(spec: &ImageSpec) -> Result<Node, EditError> {
    if !is_valid_image_url(&spec.src) {
        return Err(EditError::InvalidImageUrl(spec.src.clone()));
    }
    let mut img = Element::new(Tag::Image)
        .with_attr("src", spec.src.as_str())
        .with_attr("alt", spec.alt.as_str());
    if let Some(width) = spec.width {
        img.set_attr("width", width.to_string());
    }
    if let Some(height) = spec.height {
        img.set_attr("height", height.to_string());
    }
    Ok(Node::Element(img))
}

/// Table with a header row and `rows - 1` body rows
pub fn table_node(rows: usize, cols: usize) -> Result<Node, EditError> {
    if rows < 1 || cols < 1 {
        return Err(EditError::InvalidTableSize { rows, cols });
    }
    let cell = |tag: Tag, style: &str, text: String| {
        Node::Element(
            Element::new(tag)
                .with_attr("style", style)
                .with_children(vec![Node::Text(text)]),
        )
    };
    let header = Node::element(
        Tag::TableRow,
        (1..=cols)
            .map(|j| cell(Tag::HeaderCell, HEADER_CELL_STYLE, format!("Header {}", j)))
            .collect(),
    );
    let body = (1..rows)
        .map(|i| {
            Node::element(
                Tag::TableRow,
                (1..=cols)
                    .map(|j| cell(Tag::Cell, CELL_STYLE, format!("Cell {}-{}", i, j)))
                    .collect(),
            )
        })
        .collect();
    Ok(Node::Element(
        Element::new(Tag::Table)
            .with_attr("style", TABLE_STYLE)
            .with_children(vec![
                Node::element(Tag::TableHead, vec![header]),
                Node::element(Tag::TableBody, body),
            ]),
    ))
}

/// `<pre><code class="language-x">` holding the placeholder line
pub fn code_block_node(language: Option<&str>) -> Node {
    let mut code = Element::new(Tag::Code).with_children(vec![Node::text(CODE_PLACEHOLDER)]);
    if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
        code.set_attr("class", format!("language-{}", language));
    }
    Node::Element(
        Element::new(Tag::Pre)
            .with_attr("style", PRE_STYLE)
            .with_children(vec![Node::Element(code)]),
    )
}

/// Delete the range content, then place the new content at its start
fn splice(doc: &mut EditableDocument, range: &DomRange, content: Content) -> Result<DomPoint, EditError> {
    let point = doc.delete_contents(range)?;
    match content {
        Content::Text(text) => doc.insert_text(&point, &text),
        Content::Node(node) => doc.insert_node(&point, node),
    }
}

/// Restores the saved selection and splices pending content there.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionPipeline {
    pub missing_selection: MissingSelection,
}

impl InsertionPipeline {
    pub fn new(missing_selection: MissingSelection) -> Self {
        Self { missing_selection }
    }

    /// Where the insertion goes: the restored selection, or the document
    /// end when configured to append.
    fn target(&self, surface: &EditableSurface) -> Result<DomRange, EditError> {
        match surface.restore_saved_selection() {
            Ok(range) => Ok(range),
            Err(err @ (EditError::NoSelection | EditError::StaleSelection)) => {
                match self.missing_selection {
                    MissingSelection::Drop => Err(err),
                    MissingSelection::Append => {
                        debug!(%err, "no usable selection, appending at document end");
                        Ok(DomRange::caret(surface.document().end_point()))
                    }
                }
            }
            Err(err) => Err(err),
        }
    }

    pub fn insert(
        &self,
        surface: &mut EditableSurface,
        pending: &PendingInsertion,
    ) -> Result<InsertOutcome, EditError> {
        if !surface.is_editable() {
            return Err(EditError::ReadOnly);
        }
        let range = self.target(surface)?;

        if pending.is_text_bearing() {
            let current = surface.text_len();
            let mut scratch = surface.document().clone();
            splice(&mut scratch, &range, pending.content()?)?;
            let resulting = scratch.text_len();
            if surface.budget().is_exceeded(resulting) {
                return Err(EditError::BudgetExceeded {
                    needed: resulting.saturating_sub(current),
                    remaining: surface.budget().remaining(current),
                });
            }
        }

        let content = pending.content()?;
        let before = surface.snapshot();
        let caret = splice(surface.document_mut(), &range, content)?;
        surface.commit(before);
        surface.set_caret(caret.clone());
        surface.capture_selection();
        let truncated = surface.enforce_limit().is_some();

        info!(kind = pending.kind(), ?caret, "content inserted");
        Ok(InsertOutcome { caret, truncated })
    }
}

/// Aspect-ratio coupling for the image dimension fields.
///
/// With known natural dimensions and the lock on, editing one axis sets the
/// other to the rounded proportional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionLock {
    natural: Option<(u32, u32)>,
    pub locked: bool,
    width: Option<u32>,
    height: Option<u32>,
}

impl Default for DimensionLock {
    fn default() -> Self {
        Self {
            natural: None,
            locked: true,
            width: None,
            height: None,
        }
    }
}

impl DimensionLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn natural(&self) -> Option<(u32, u32)> {
        self.natural
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Record probed dimensions and fill both fields with them; zero
    /// dimensions (failed probe) leave the ratio unknown.
    pub fn set_natural(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            self.natural = None;
            return;
        }
        self.natural = Some((width, height));
        self.width = Some(width);
        self.height = Some(height);
    }

    pub fn set_width(&mut self, width: Option<u32>) {
        self.width = width;
        if let (true, Some((w0, h0)), Some(w)) = (self.locked, self.natural, width) {
            self.height = Some(scale(w, h0, w0));
        }
    }

    pub fn set_height(&mut self, height: Option<u32>) {
        self.height = height;
        if let (true, Some((w0, h0)), Some(h)) = (self.locked, self.natural, height) {
            self.width = Some(scale(h, w0, h0));
        }
    }

    /// Back to the natural size
    pub fn reset(&mut self) {
        if let Some((w0, h0)) = self.natural {
            self.width = Some(w0);
            self.height = Some(h0);
        }
    }

    /// Forget the natural size and both fields; the lock setting stays
    pub fn clear_size(&mut self) {
        self.natural = None;
        self.width = None;
        self.height = None;
    }
}

fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    (f64::from(value) * f64::from(numerator) / f64::from(denominator)).round() as u32
}

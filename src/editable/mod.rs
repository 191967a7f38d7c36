//! Selection-preserving content editing for the inkpad surface.
//!
//! The editable surface owns a rich-text node tree and keeps three things
//! consistent while the user types, pastes, formats and inserts content:
//!
//! - the live selection, captured into a [`SelectionTracker`] so it survives
//!   focus moving into a modal
//! - the character budget, enforced before a keystroke lands and corrected
//!   after every mutation by structure-preserving truncation
//! - the insertion point used by the [`InsertionPipeline`] for images,
//!   tables, code blocks and imported text
//!
//! # Architecture
//!
//! - [`EditableDocument`]: node tree, plain-text view, HTML serialization
//! - [`DomPoint`] / [`DomRange`]: tree positions and the splicing built on them
//! - [`SelectionTracker`]: the last known selection, tagged with a revision
//! - [`CharacterBudget`]: pre-insertion checks against the maximum length
//! - [`EditableSurface`]: the editing state machine tying it all together
//! - [`RichTextCommands`]: formatting commands applied to the live selection
//!
//! # Example
//!
//! ```ignore
//! use inkpad::editable::{CharacterBudget, EditableDocument, EditableSurface};
//!
//! let mut surface = EditableSurface::new(EditableDocument::new(), CharacterBudget::new(10));
//! surface.focus();
//! surface.paste("hello wonderful world");
//!
//! assert_eq!(surface.plain_text(), "hello wond");
//! ```

mod budget;
mod document;
mod error;
mod format;
mod history;
mod insertion;
mod range;
mod selection;
mod surface;

// Re-export main types
pub use budget::CharacterBudget;
pub use document::{plain_text_nodes, EditableDocument, Element, Node, Tag, TextMap};
pub use error::EditError;
pub use format::{Alignment, BlockFormat, RichTextCommands};
pub use history::{EditHistory, Snapshot};
pub use insertion::{
    code_block_node, image_node, is_valid_image_url, table_node, DimensionLock, ImageSpec,
    InsertOutcome, InsertionPipeline, MissingSelection, PendingInsertion, CODE_PLACEHOLDER,
};
pub use range::{DomPoint, DomRange};
pub use selection::{SavedSelection, SelectionTracker};
pub use surface::{
    EditableSurface, KeyOutcome, Motion, PasteOutcome, Truncation, DEFAULT_FONT_SIZE,
    MAX_FONT_SIZE, MIN_FONT_SIZE,
};

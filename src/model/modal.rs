//! Structured input modals: image, table, code block and link
//!
//! Modals only hold field state. Opening one captures the surface selection
//! first; confirming hands a [`PendingInsertion`] to the insertion pipeline.

use std::path::PathBuf;

use crate::commands::RequestId;
use crate::editable::{is_valid_image_url, DimensionLock, ImageSpec, PendingInsertion};

pub const TABLE_INPUT_ERROR: &str = "Please enter valid numbers for rows and columns.";
pub const DEFAULT_IMAGE_ALT: &str = "Image";
pub const DEFAULT_UPLOAD_ALT: &str = "Uploaded image";
const DEFAULT_TABLE_SIZE: &str = "3";
const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// Identifies which modal is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalId {
    Image,
    Table,
    CodeBlock,
    Link,
}

/// Image modal tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageTab {
    #[default]
    Url,
    File,
}

/// State for the image modal
#[derive(Debug, Clone, Default)]
pub struct ImageModal {
    pub tab: ImageTab,
    pub url: String,
    pub file: Option<PathBuf>,
    pub alt: String,
    pub dims: DimensionLock,
    /// Dimension probe still in flight
    pub probe: Option<RequestId>,
}

impl ImageModal {
    /// Confirm is enabled for a valid URL on the URL tab or a chosen file
    /// on the file tab
    pub fn can_confirm(&self) -> bool {
        match self.tab {
            ImageTab::Url => is_valid_image_url(&self.url),
            ImageTab::File => self.file.is_some(),
        }
    }

    /// Alt text, falling back to the default for the active tab
    pub fn alt_text(&self) -> String {
        let alt = self.alt.trim();
        if !alt.is_empty() {
            return alt.to_string();
        }
        match self.tab {
            ImageTab::Url => DEFAULT_IMAGE_ALT.to_string(),
            ImageTab::File => DEFAULT_UPLOAD_ALT.to_string(),
        }
    }

    /// Image element for `src` with the current alt text and dimensions
    pub fn spec(&self, src: impl Into<String>) -> ImageSpec {
        ImageSpec {
            src: src.into(),
            width: self.dims.width(),
            height: self.dims.height(),
            alt: self.alt_text(),
        }
    }
}

/// Parse a dimension field; empty or invalid text clears the value
pub fn parse_dimension(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// State for the table modal
#[derive(Debug, Clone)]
pub struct TableModal {
    pub rows: String,
    pub cols: String,
}

impl Default for TableModal {
    fn default() -> Self {
        Self {
            rows: DEFAULT_TABLE_SIZE.to_string(),
            cols: DEFAULT_TABLE_SIZE.to_string(),
        }
    }
}

impl TableModal {
    /// Both fields as positive integers
    pub fn size(&self) -> Result<(usize, usize), &'static str> {
        let parse = |text: &str| text.trim().parse::<usize>().ok().filter(|n| *n >= 1);
        match (parse(&self.rows), parse(&self.cols)) {
            (Some(rows), Some(cols)) => Ok((rows, cols)),
            _ => Err(TABLE_INPUT_ERROR),
        }
    }

    pub fn insertion(&self) -> Result<PendingInsertion, &'static str> {
        self.size()
            .map(|(rows, cols)| PendingInsertion::Table { rows, cols })
    }
}

/// State for the code block modal
#[derive(Debug, Clone)]
pub struct CodeBlockModal {
    pub language: String,
}

impl Default for CodeBlockModal {
    fn default() -> Self {
        Self {
            language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

impl CodeBlockModal {
    pub fn insertion(&self) -> PendingInsertion {
        let language = self.language.trim();
        PendingInsertion::CodeBlock {
            language: (!language.is_empty()).then(|| language.to_string()),
        }
    }
}

/// State for the link modal
#[derive(Debug, Clone, Default)]
pub struct LinkModal {
    pub url: String,
}

/// Union of all modal states
#[derive(Debug, Clone)]
pub enum ModalState {
    Image(ImageModal),
    Table(TableModal),
    CodeBlock(CodeBlockModal),
    Link(LinkModal),
}

impl ModalState {
    /// Get the modal ID for this state
    pub fn id(&self) -> ModalId {
        match self {
            ModalState::Image(_) => ModalId::Image,
            ModalState::Table(_) => ModalId::Table,
            ModalState::CodeBlock(_) => ModalId::CodeBlock,
            ModalState::Link(_) => ModalId::Link,
        }
    }

    /// Whether the confirm button is enabled
    pub fn can_confirm(&self) -> bool {
        match self {
            ModalState::Image(image) => image.can_confirm(),
            ModalState::Table(_) | ModalState::CodeBlock(_) => true,
            ModalState::Link(link) => !link.url.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_confirm_rules() {
        let mut modal = ImageModal::default();
        assert!(!modal.can_confirm());
        modal.url = "ftp://host/a.png".into();
        assert!(!modal.can_confirm());
        modal.url = "data:image/png;base64,AAAA".into();
        assert!(modal.can_confirm());

        modal.tab = ImageTab::File;
        assert!(!modal.can_confirm());
        modal.file = Some(PathBuf::from("photo.png"));
        assert!(modal.can_confirm());
    }

    #[test]
    fn test_alt_defaults_per_tab() {
        let mut modal = ImageModal::default();
        assert_eq!(modal.alt_text(), "Image");
        modal.tab = ImageTab::File;
        assert_eq!(modal.alt_text(), "Uploaded image");
        modal.alt = "  cat ".into();
        assert_eq!(modal.alt_text(), "cat");
    }

    #[test]
    fn test_table_size_validation() {
        let mut table = TableModal::default();
        assert_eq!(table.size(), Ok((3, 3)));
        table.rows = "0".into();
        assert_eq!(table.size(), Err(TABLE_INPUT_ERROR));
        table.rows = "two".into();
        assert_eq!(table.size(), Err(TABLE_INPUT_ERROR));
        table.rows = " 4 ".into();
        table.cols = "2".into();
        assert_eq!(
            table.insertion(),
            Ok(PendingInsertion::Table { rows: 4, cols: 2 })
        );
    }

    #[test]
    fn test_code_language_optional() {
        let mut code = CodeBlockModal::default();
        assert_eq!(
            code.insertion(),
            PendingInsertion::CodeBlock {
                language: Some("javascript".into())
            }
        );
        code.language = "   ".into();
        assert_eq!(code.insertion(), PendingInsertion::CodeBlock { language: None });
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("640"), Some(640));
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("0"), None);
        assert_eq!(parse_dimension("wide"), None);
    }
}

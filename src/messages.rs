//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;

use crate::commands::{DialogPurpose, RequestId};
use crate::editable::{Alignment, BlockFormat};
use crate::input::Keystroke;
use crate::model::ImageTab;

/// Events on the editable surface
#[derive(Debug, Clone)]
pub enum SurfaceMsg {
    /// Key pressed (interception, shortcuts, default action)
    KeyDown(Keystroke),
    /// Key released (selection capture)
    KeyUp(Keystroke),
    /// Pointer press and release selecting between plain-text offsets
    PointerSelect { anchor: usize, focus: usize },
    Focus,
    Blur,
    /// Plain-text payload of a paste event
    Paste(String),
    SelectAll,
    /// Reset the document (explicit user action)
    Clear,
    /// Lock or unlock editing
    SetEditable(bool),
    SetFontSize(u32),
}

/// Toolbar formatting commands
#[derive(Debug, Clone)]
pub enum FormatMsg {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Align(Alignment),
    OrderedList,
    UnorderedList,
    Block(BlockFormat),
    FontName(String),
    Undo,
    Redo,
}

/// Structured input modals
#[derive(Debug, Clone)]
pub enum ModalMsg {
    OpenImage,
    OpenTable,
    OpenCodeBlock,
    OpenLink,

    // === Image modal ===
    SelectImageTab(ImageTab),
    SetImageUrl(String),
    SetImageAlt(String),
    /// Width field text; empty clears it
    SetImageWidth(String),
    /// Height field text; empty clears it
    SetImageHeight(String),
    ToggleAspectLock,
    ResetImageSize,
    BrowseImageFile,
    ImageFileChosen(Option<PathBuf>),
    /// Natural dimensions of the probed image; `None` when it could not be read
    ImageProbed {
        request: RequestId,
        dimensions: Option<(u32, u32)>,
    },

    // === Table / code / link modals ===
    SetTableRows(String),
    SetTableCols(String),
    SetCodeLanguage(String),
    SetLinkUrl(String),

    Confirm,
    Cancel,
}

/// File, clipboard and async completion messages
#[derive(Debug, Clone)]
pub enum FileMsg {
    /// Import a plain-text file, replacing the document
    Import(PathBuf),
    /// Ask the user for a file to import
    BrowseImport,
    /// Result of an open file dialog
    DialogClosed {
        purpose: DialogPurpose,
        path: Option<PathBuf>,
    },
    /// Text file read completed
    TextLoaded {
        request: RequestId,
        result: Result<String, String>,
    },
    /// Export the plain text (to the configured file name when `None`)
    Export(Option<PathBuf>),
    ExportCompleted {
        path: PathBuf,
        result: Result<(), String>,
    },
    /// Image file read completed, as a `data:` URL
    ImageLoaded {
        request: RequestId,
        result: Result<String, String>,
    },
    /// Paste the clipboard text at the live selection
    PasteFromClipboard,
    ClipboardRead(Result<String, String>),
}

/// UI messages (notifications)
#[derive(Debug, Clone)]
pub enum UiMsg {
    Notify(String),
    DismissNotification,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Surface(SurfaceMsg),
    Format(FormatMsg),
    Modal(ModalMsg),
    File(FileMsg),
    Ui(UiMsg),
}

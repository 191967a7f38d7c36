//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! Every asynchronous command carries the [`RequestId`] its completion
//! message echoes back.

use std::fmt;
use std::path::PathBuf;

/// Identifies one asynchronous request so a late completion can be matched
/// against the request that is still live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an image probe reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
}

/// What a file dialog result is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPurpose {
    /// Plain-text file replacing the document
    ImportText,
    /// Image file for the image modal
    ImageFile,
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw of the surface, preview and counters
    Redraw,
    /// Read a plain-text file; completes with `FileMsg::TextLoaded`
    LoadTextFile { request: RequestId, path: PathBuf },
    /// Write the exported plain text; completes with `FileMsg::ExportCompleted`
    SaveFile { path: PathBuf, content: String },
    /// Read an image file as a data URL; completes with `FileMsg::ImageLoaded`
    ReadImageFile { request: RequestId, path: PathBuf },
    /// Determine natural image dimensions; completes with `ModalMsg::ImageProbed`
    ProbeImage {
        request: RequestId,
        source: ImageSource,
    },
    /// Read plain text from the system clipboard; completes with
    /// `FileMsg::ClipboardRead`
    ReadClipboard,
    /// Show native open file dialog
    ShowOpenFileDialog { purpose: DialogPurpose },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            // Async work redraws when its completion message arrives
            Cmd::LoadTextFile { .. }
            | Cmd::SaveFile { .. }
            | Cmd::ReadImageFile { .. }
            | Cmd::ProbeImage { .. }
            | Cmd::ReadClipboard
            | Cmd::ShowOpenFileDialog { .. } => false,
        }
    }
}

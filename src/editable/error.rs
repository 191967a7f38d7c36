//! Errors raised by editing operations on the surface.

use thiserror::Error;

/// Failure of an editing operation.
///
/// Update handlers never propagate these: each one degrades to "no visible
/// change" plus, where the user needs to know, a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The saved selection no longer resolves against the document
    #[error("saved selection no longer resolves against the document")]
    StaleSelection,

    /// No selection has been captured yet
    #[error("no selection has been captured")]
    NoSelection,

    /// A point does not address a valid container or offset
    #[error("point does not address a valid position in the document")]
    InvalidPoint,

    /// A text-bearing insertion would push the document past its maximum
    #[error("insertion needs {needed} characters but only {remaining} remain")]
    BudgetExceeded { needed: usize, remaining: usize },

    /// Table dimensions must both be at least one
    #[error("invalid table size {rows}x{cols}")]
    InvalidTableSize { rows: usize, cols: usize },

    /// Image sources must be http(s) or data URLs
    #[error("invalid image URL: {0}")]
    InvalidImageUrl(String),

    /// The surface is locked against edits
    #[error("the editable surface is read-only")]
    ReadOnly,
}

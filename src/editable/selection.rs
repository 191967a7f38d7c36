//! Selection tracking across focus changes.
//!
//! The live selection disappears whenever focus leaves the surface (a modal
//! input takes it, a file picker opens). The tracker keeps the last range
//! observed on pointer release, key release and focus so insertions can be
//! placed where the user left off.

use tracing::{debug, trace};

use super::document::EditableDocument;
use super::error::EditError;
use super::range::DomRange;

/// A captured range plus the document revision it was captured against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSelection {
    pub range: DomRange,
    pub revision: u64,
}

/// Remembers the most recent live selection of one surface.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    saved: Option<SavedSelection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the live selection. Without one, the previous capture is kept.
    /// Returns whether a capture happened.
    pub fn observe(&mut self, live: Option<&DomRange>, revision: u64) -> bool {
        let Some(range) = live else {
            trace!("no live selection, keeping previous capture");
            return false;
        };
        trace!(?range, revision, "selection captured");
        self.saved = Some(SavedSelection {
            range: range.clone(),
            revision,
        });
        true
    }

    pub fn saved(&self) -> Option<&SavedSelection> {
        self.saved.as_ref()
    }

    pub fn clear(&mut self) {
        self.saved = None;
    }

    /// Resolve the saved selection against the current document.
    ///
    /// A capture from an older revision is still used when both of its ends
    /// resolve; one that no longer resolves is reported as stale.
    pub fn restore(&self, doc: &EditableDocument) -> Result<DomRange, EditError> {
        let saved = self.saved.as_ref().ok_or(EditError::NoSelection)?;
        if !doc.contains_point(&saved.range.anchor) || !doc.contains_point(&saved.range.focus) {
            debug!(
                captured = saved.revision,
                current = doc.revision(),
                "saved selection no longer resolves"
            );
            return Err(EditError::StaleSelection);
        }
        if saved.revision != doc.revision() {
            debug!(
                captured = saved.revision,
                current = doc.revision(),
                "restoring selection captured against an older revision"
            );
        }
        Ok(saved.range.clone())
    }
}

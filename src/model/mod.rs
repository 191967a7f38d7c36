//! Application model - the complete state of the editor
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod modal;
pub mod preview;
pub mod ui;

pub use modal::{
    parse_dimension, CodeBlockModal, ImageModal, ImageTab, LinkModal, ModalId, ModalState,
    TableModal,
};
pub use preview::{CounterLevel, CounterState, PreviewPane};
pub use ui::UiState;

use crate::commands::RequestId;
use crate::config::EditorConfig;
use crate::editable::{CharacterBudget, EditableDocument, EditableSurface, ImageSpec, InsertionPipeline};

/// An image insertion waiting for its file read to complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImageRead {
    pub request: RequestId,
    /// Everything but `src`, which the read provides
    pub spec: ImageSpec,
}

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// The editable region with its selection tracker, budget and history
    pub surface: EditableSurface,
    /// Rich content mirrored from the surface
    pub preview: PreviewPane,
    pub counter: CounterState,
    /// UI state (modal, notifications)
    pub ui: UiState,
    /// Persisted editor configuration
    pub config: EditorConfig,
    pub pipeline: InsertionPipeline,
    /// Image file read in flight for a confirmed image modal
    pub pending_image: Option<PendingImageRead>,
    /// Text import in flight
    pub pending_import: Option<RequestId>,
    next_request: u64,
}

impl AppModel {
    /// Create a model with an empty document
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(config, EditableDocument::new())
    }

    /// Create a model around an existing document
    pub fn with_document(config: EditorConfig, document: EditableDocument) -> Self {
        let mut surface = EditableSurface::new(document, CharacterBudget::new(config.max_chars));
        surface.set_font_size(config.font_size);
        let mut model = Self {
            surface,
            preview: PreviewPane::default(),
            counter: CounterState::default(),
            ui: UiState::new(),
            pipeline: InsertionPipeline::new(config.missing_selection),
            config,
            pending_image: None,
            pending_import: None,
            next_request: 0,
        };
        model.surface.enforce_limit();
        sync_views(&mut model);
        model
    }

    /// Allocate a fresh id for an asynchronous request
    pub fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    /// Notify the user
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%message, "notification");
        self.ui.notify(message);
    }
}

/// Resync the preview and the counters with the surface. Returns whether
/// anything was stale.
pub fn sync_views(model: &mut AppModel) -> bool {
    if !model.preview.is_stale(&model.surface) {
        return false;
    }
    model.preview.sync(&model.surface);
    model.counter.sync(
        &model.surface,
        model.config.warn_threshold,
        model.config.critical_threshold,
    );
    true
}

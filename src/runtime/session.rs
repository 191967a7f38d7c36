//! Headless session: replays command-line actions as the messages the UI
//! would send, running side effects to completion between steps

use serde::Serialize;
use tracing::{debug, info};

use super::{Platform, Runtime};
use crate::cli::{ImageArg, StartupAction, StartupConfig};
use crate::messages::{FileMsg, ModalMsg, Msg, SurfaceMsg};
use crate::model::{ImageTab, ModalState};

/// Final state of a session
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub html: String,
    pub text: String,
    pub chars: usize,
    pub max_chars: usize,
    pub remaining: usize,
    pub words: usize,
    pub counter: String,
    pub notifications: Vec<String>,
}

impl<P: Platform> Runtime<P> {
    /// Import, place the caret, run every action, then export
    pub fn run_startup(&mut self, startup: &StartupConfig) {
        if let Some(path) = &startup.file {
            self.dispatch(Msg::File(FileMsg::Import(path.clone())));
            self.run_until_idle();
        }

        let caret = match startup.caret {
            Some(offset) => SurfaceMsg::PointerSelect {
                anchor: offset,
                focus: offset,
            },
            None => SurfaceMsg::Focus,
        };
        self.dispatch(Msg::Surface(caret));

        for action in &startup.actions {
            debug!(?action, "startup action");
            self.perform(action);
            self.run_until_idle();
        }

        if let Some(path) = &startup.export {
            self.dispatch(Msg::File(FileMsg::Export(path.clone())));
            self.run_until_idle();
        }
    }

    fn perform(&mut self, action: &StartupAction) {
        match action {
            StartupAction::Paste(text) => {
                self.dispatch(Msg::Surface(SurfaceMsg::Paste(text.clone())));
            }
            StartupAction::PasteClipboard => {
                self.dispatch(Msg::File(FileMsg::PasteFromClipboard));
            }
            StartupAction::Image {
                source,
                width,
                height,
                alt,
            } => {
                self.modal(ModalMsg::OpenImage);
                match source {
                    ImageArg::Url(url) => self.modal(ModalMsg::SetImageUrl(url.clone())),
                    ImageArg::File(path) => {
                        self.modal(ModalMsg::SelectImageTab(ImageTab::File));
                        self.modal(ModalMsg::ImageFileChosen(Some(path.clone())));
                    }
                }
                // Natural size must be known before the fields are edited
                self.run_until_idle();
                if let Some(alt) = alt {
                    self.modal(ModalMsg::SetImageAlt(alt.clone()));
                }
                if width.is_some() && height.is_some() && self.aspect_locked() {
                    self.modal(ModalMsg::ToggleAspectLock);
                }
                if let Some(width) = width {
                    self.modal(ModalMsg::SetImageWidth(width.to_string()));
                }
                if let Some(height) = height {
                    self.modal(ModalMsg::SetImageHeight(height.to_string()));
                }
                self.confirm();
            }
            StartupAction::Table { rows, cols } => {
                self.modal(ModalMsg::OpenTable);
                self.modal(ModalMsg::SetTableRows(rows.clone()));
                self.modal(ModalMsg::SetTableCols(cols.clone()));
                self.confirm();
            }
            StartupAction::CodeBlock { language } => {
                self.modal(ModalMsg::OpenCodeBlock);
                if let Some(language) = language {
                    self.modal(ModalMsg::SetCodeLanguage(language.clone()));
                }
                self.confirm();
            }
        }
    }

    fn modal(&mut self, msg: ModalMsg) {
        self.dispatch(Msg::Modal(msg));
    }

    fn aspect_locked(&self) -> bool {
        matches!(&self.model.ui.active_modal, Some(ModalState::Image(image)) if image.dims.locked)
    }

    /// Confirm, and cancel when the modal refuses to close
    fn confirm(&mut self) {
        self.modal(ModalMsg::Confirm);
        if let Some(state) = &self.model.ui.active_modal {
            info!(modal = ?state.id(), "modal left open after confirm, cancelling");
            self.modal(ModalMsg::Cancel);
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let surface = &self.model.surface;
        SessionSummary {
            html: surface.html(),
            text: surface.plain_text(),
            chars: surface.text_len(),
            max_chars: surface.budget().max(),
            remaining: self.model.counter.remaining,
            words: self.model.counter.words,
            counter: self.model.counter.display(),
            notifications: self.model.ui.notifications.iter().cloned().collect(),
        }
    }
}

//! Modal handlers: image, table, code block and link input
//!
//! Opening a modal captures the surface selection and moves focus away from
//! the surface. Confirming restores the captured selection through the
//! insertion pipeline; cancelling puts it back as the live selection.

use tracing::{debug, info, warn};

use crate::commands::{Cmd, DialogPurpose, ImageSource};
use crate::editable::{EditError, PendingInsertion, RichTextCommands};
use crate::messages::ModalMsg;
use crate::model::{
    parse_dimension, AppModel, CodeBlockModal, ImageModal, ImageTab, LinkModal, ModalState,
    PendingImageRead, TableModal,
};

const TABLE_BUDGET_ERROR: &str = "Adding this table would exceed the character limit.";
const CODE_BUDGET_ERROR: &str = "Adding this code block would exceed the character limit.";
const TEXT_BUDGET_ERROR: &str = "Adding this text would exceed the character limit.";

/// Handle modal messages
pub fn update_modal(model: &mut AppModel, msg: ModalMsg) -> Option<Cmd> {
    match msg {
        ModalMsg::OpenImage => open(model, ModalState::Image(ImageModal::default())),
        ModalMsg::OpenTable => open(model, ModalState::Table(TableModal::default())),
        ModalMsg::OpenCodeBlock => open(model, ModalState::CodeBlock(CodeBlockModal::default())),
        ModalMsg::OpenLink => open(model, ModalState::Link(LinkModal::default())),

        ModalMsg::SelectImageTab(tab) => with_image(model, |image| image.tab = tab),
        ModalMsg::SetImageUrl(url) => set_image_url(model, url),
        ModalMsg::SetImageAlt(alt) => with_image(model, |image| image.alt = alt),
        ModalMsg::SetImageWidth(text) => {
            with_image(model, |image| image.dims.set_width(parse_dimension(&text)))
        }
        ModalMsg::SetImageHeight(text) => {
            with_image(model, |image| image.dims.set_height(parse_dimension(&text)))
        }
        ModalMsg::ToggleAspectLock => {
            with_image(model, |image| image.dims.locked = !image.dims.locked)
        }
        ModalMsg::ResetImageSize => with_image(model, |image| image.dims.reset()),
        ModalMsg::BrowseImageFile => image_modal(model).map(|_| Cmd::ShowOpenFileDialog {
            purpose: DialogPurpose::ImageFile,
        }),
        ModalMsg::ImageFileChosen(path) => {
            let path = path?;
            let request = model.next_request_id();
            let image = image_modal(model)?;
            image.tab = ImageTab::File;
            image.file = Some(path.clone());
            image.dims.clear_size();
            image.probe = Some(request);
            Some(Cmd::ProbeImage {
                request,
                source: ImageSource::File(path),
            })
        }
        ModalMsg::ImageProbed {
            request,
            dimensions,
        } => {
            let Some(image) = image_modal(model).filter(|image| image.probe == Some(request))
            else {
                debug!(%request, "stale image probe ignored");
                return None;
            };
            image.probe = None;
            let (width, height) = dimensions.unwrap_or((0, 0));
            image.dims.set_natural(width, height);
            Some(Cmd::Redraw)
        }

        ModalMsg::SetTableRows(rows) => with_modal(model, |state| {
            if let ModalState::Table(table) = state {
                table.rows = rows;
            }
        }),
        ModalMsg::SetTableCols(cols) => with_modal(model, |state| {
            if let ModalState::Table(table) = state {
                table.cols = cols;
            }
        }),
        ModalMsg::SetCodeLanguage(language) => with_modal(model, |state| {
            if let ModalState::CodeBlock(code) = state {
                code.language = language;
            }
        }),
        ModalMsg::SetLinkUrl(url) => with_modal(model, |state| {
            if let ModalState::Link(link) = state {
                link.url = url;
            }
        }),

        ModalMsg::Confirm => confirm(model),
        ModalMsg::Cancel => {
            let state = model.ui.close_modal()?;
            debug!(modal = ?state.id(), "modal cancelled");
            refocus(model);
            Some(Cmd::Redraw)
        }
    }
}

fn open(model: &mut AppModel, state: ModalState) -> Option<Cmd> {
    if model.ui.has_modal() {
        debug!(modal = ?state.id(), "another modal is already open");
        return None;
    }
    // The surface loses focus to the modal; keep its selection first
    model.surface.capture_selection();
    model.surface.blur();
    debug!(modal = ?state.id(), "modal opened");
    model.ui.open_modal(state);
    Some(Cmd::Redraw)
}

fn image_modal(model: &mut AppModel) -> Option<&mut ImageModal> {
    match model.ui.active_modal.as_mut() {
        Some(ModalState::Image(image)) => Some(image),
        _ => None,
    }
}

fn with_image(model: &mut AppModel, f: impl FnOnce(&mut ImageModal)) -> Option<Cmd> {
    let image = image_modal(model)?;
    f(image);
    Some(Cmd::Redraw)
}

fn with_modal(model: &mut AppModel, f: impl FnOnce(&mut ModalState)) -> Option<Cmd> {
    let state = model.ui.active_modal.as_mut()?;
    f(state);
    Some(Cmd::Redraw)
}

/// A valid URL starts a dimension probe; anything else cancels the
/// previous one
fn set_image_url(model: &mut AppModel, url: String) -> Option<Cmd> {
    image_modal(model)?;
    let request = model.next_request_id();
    let image = image_modal(model)?;
    image.url = url.clone();
    image.dims.clear_size();
    if !image.can_confirm() || image.tab != ImageTab::Url {
        image.probe = None;
        return Some(Cmd::Redraw);
    }
    image.probe = Some(request);
    Some(Cmd::ProbeImage {
        request,
        source: ImageSource::Url(url),
    })
}

/// Put the saved selection back as the live one after a modal closes
fn refocus(model: &mut AppModel) {
    if model.surface.selection().is_none() {
        if let Err(err) = model.surface.reactivate_saved_selection() {
            debug!(%err, "no selection to restore after modal");
            return;
        }
    }
    model.surface.focus();
}

fn confirm(model: &mut AppModel) -> Option<Cmd> {
    let state = model.ui.active_modal.as_ref()?;
    if !state.can_confirm() {
        debug!(modal = ?state.id(), "confirm disabled");
        return None;
    }

    // Field validation keeps the modal open
    if let ModalState::Table(table) = state {
        if let Err(message) = table.size() {
            model.notify(message);
            return Some(Cmd::Redraw);
        }
    }

    let state = model.ui.close_modal()?;
    let cmd = match state {
        ModalState::Image(image) => match image.tab {
            ImageTab::Url => {
                let spec = image.spec(image.url.clone());
                insert_pending(model, PendingInsertion::Image(spec))
            }
            ImageTab::File => {
                let path = image.file.clone()?;
                let request = model.next_request_id();
                model.pending_image = Some(PendingImageRead {
                    request,
                    spec: image.spec(String::new()),
                });
                info!(path = %path.display(), %request, "reading image file");
                Some(Cmd::ReadImageFile { request, path })
            }
        },
        ModalState::Table(table) => match table.insertion() {
            Ok(pending) => insert_pending(model, pending),
            Err(_) => None,
        },
        ModalState::CodeBlock(code) => insert_pending(model, code.insertion()),
        ModalState::Link(link) => {
            refocus(model);
            model
                .surface
                .create_link(&link.url)
                .then_some(Cmd::Redraw)
        }
    };
    refocus(model);
    cmd.or(Some(Cmd::Redraw))
}

/// Run the insertion pipeline, turning failures into notifications
pub fn insert_pending(model: &mut AppModel, pending: PendingInsertion) -> Option<Cmd> {
    match model.pipeline.insert(&mut model.surface, &pending) {
        Ok(outcome) => {
            debug!(kind = pending.kind(), truncated = outcome.truncated, "insertion applied");
            Some(Cmd::Redraw)
        }
        Err(EditError::BudgetExceeded { needed, remaining }) => {
            info!(kind = pending.kind(), needed, remaining, "insertion rejected by budget");
            let message = match pending {
                PendingInsertion::Table { .. } => TABLE_BUDGET_ERROR,
                PendingInsertion::CodeBlock { .. } => CODE_BUDGET_ERROR,
                _ => TEXT_BUDGET_ERROR,
            };
            model.notify(message);
            Some(Cmd::Redraw)
        }
        Err(err @ (EditError::NoSelection | EditError::StaleSelection)) => {
            debug!(%err, kind = pending.kind(), "insertion dropped");
            None
        }
        Err(err) => {
            warn!(%err, kind = pending.kind(), "insertion failed");
            model.notify(err.to_string());
            Some(Cmd::Redraw)
        }
    }
}

//! File, clipboard and async completion handlers

use tracing::{debug, info, warn};

use crate::commands::{Cmd, DialogPurpose};
use crate::editable::{plain_text_nodes, PasteOutcome, PendingInsertion};
use crate::messages::{FileMsg, ModalMsg};
use crate::model::AppModel;
use crate::util::text::{char_count, normalize_newlines, take_chars};
use crate::util::{filename_for_display, validate_file_for_opening};

use super::modal::{insert_pending, update_modal};

/// Handle file messages
pub fn update_file(model: &mut AppModel, msg: FileMsg) -> Option<Cmd> {
    match msg {
        FileMsg::Import(path) => {
            if let Err(err) = validate_file_for_opening(&path) {
                warn!(path = %path.display(), %err, "import rejected");
                model.notify(err.user_message(&filename_for_display(&path)));
                return Some(Cmd::Redraw);
            }
            let request = model.next_request_id();
            model.pending_import = Some(request);
            model.ui.is_loading = true;
            info!(path = %path.display(), %request, "importing text file");
            Some(Cmd::batch(vec![
                Cmd::Redraw,
                Cmd::LoadTextFile { request, path },
            ]))
        }
        FileMsg::BrowseImport => Some(Cmd::ShowOpenFileDialog {
            purpose: DialogPurpose::ImportText,
        }),
        FileMsg::DialogClosed { purpose, path } => match purpose {
            DialogPurpose::ImportText => update_file(model, FileMsg::Import(path?)),
            DialogPurpose::ImageFile => update_modal(model, ModalMsg::ImageFileChosen(path)),
        },
        FileMsg::TextLoaded { request, result } => {
            if model.pending_import != Some(request) {
                debug!(%request, "stale import completion ignored");
                return None;
            }
            model.pending_import = None;
            model.ui.is_loading = false;
            match result {
                Ok(text) => Some(import_text(model, &text)),
                Err(err) => {
                    warn!(%err, "text import failed");
                    model.notify(format!("Could not read file: {}", err));
                    Some(Cmd::Redraw)
                }
            }
        }

        FileMsg::Export(path) => {
            let content = model.surface.plain_text();
            if content.is_empty() {
                debug!("nothing to export");
                return None;
            }
            let path = path.unwrap_or_else(|| model.config.export_file_name.clone().into());
            model.ui.is_saving = true;
            Some(Cmd::batch(vec![Cmd::Redraw, Cmd::SaveFile { path, content }]))
        }
        FileMsg::ExportCompleted { path, result } => {
            model.ui.is_saving = false;
            match result {
                Ok(()) => {
                    info!(path = %path.display(), "exported plain text");
                    model.notify(format!("Saved {}", filename_for_display(&path)));
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "export failed");
                    model.notify(format!("Could not save {}: {}", path.display(), err));
                }
            }
            Some(Cmd::Redraw)
        }

        FileMsg::ImageLoaded { request, result } => {
            if model.pending_image.as_ref().map(|p| p.request) != Some(request) {
                debug!(%request, "stale image read ignored");
                return None;
            }
            let pending = model.pending_image.take()?;
            let src = result.unwrap_or_else(|err| {
                warn!(%err, "image file read failed");
                String::new()
            });
            if src.is_empty() {
                model.notify("Could not read the image file.");
                return Some(Cmd::Redraw);
            }
            let mut spec = pending.spec;
            spec.src = src;
            insert_pending(model, PendingInsertion::Image(spec))
        }

        FileMsg::PasteFromClipboard => Some(Cmd::ReadClipboard),
        FileMsg::ClipboardRead(Ok(text)) => paste_text(model, &text),
        FileMsg::ClipboardRead(Err(err)) => {
            warn!(%err, "clipboard read failed");
            None
        }
    }
}

/// Replace the document with imported text, trimmed to the maximum
fn import_text(model: &mut AppModel, text: &str) -> Cmd {
    let text = normalize_newlines(text);
    let max = model.surface.budget().max();
    let kept = take_chars(&text, max);
    model.surface.replace_content(plain_text_nodes(kept));
    info!(chars = char_count(kept), "text imported");
    if kept.len() < text.len() {
        model.notify(format!("File content was trimmed to {} characters.", max));
    }
    Cmd::Redraw
}

/// Paste at the live selection, or at the saved one while focus is away
/// from the surface
fn paste_text(model: &mut AppModel, text: &str) -> Option<Cmd> {
    if model.surface.selection().is_some() {
        return match model.surface.paste(text) {
            PasteOutcome::Inserted { .. } => Some(Cmd::Redraw),
            PasteOutcome::Discarded => None,
        };
    }
    let text = normalize_newlines(text);
    let clipped = model.surface.budget().clip(&text, model.surface.text_len());
    if clipped.is_empty() {
        return None;
    }
    insert_pending(model, PendingInsertion::Text(clipped.to_string()))
}

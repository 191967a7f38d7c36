//! Surface message handlers: keys, pointer selection, focus and paste

use tracing::{debug, warn};

use crate::commands::Cmd;
use crate::editable::{KeyOutcome, PasteOutcome};
use crate::input::KeyCode;
use crate::messages::{ModalMsg, SurfaceMsg};
use crate::model::AppModel;

use super::modal::update_modal;

/// Handle surface messages
pub fn update_surface(model: &mut AppModel, msg: SurfaceMsg) -> Option<Cmd> {
    // An open modal owns the keyboard
    if model.ui.has_modal() {
        return match msg {
            SurfaceMsg::KeyDown(key) if key.key == KeyCode::Escape => {
                update_modal(model, ModalMsg::Cancel)
            }
            other => {
                debug!(msg = ?other, "surface message ignored while a modal is open");
                None
            }
        };
    }

    let surface = &mut model.surface;
    match msg {
        SurfaceMsg::KeyDown(key) => match surface.key_down(&key) {
            KeyOutcome::Blocked => None,
            KeyOutcome::Unchanged | KeyOutcome::Changed { .. } => Some(Cmd::Redraw),
        },
        SurfaceMsg::KeyUp(key) => {
            surface.key_up(&key);
            None
        }
        SurfaceMsg::PointerSelect { anchor, focus } => {
            if let Err(err) = surface.pointer_select(anchor, focus) {
                warn!(%err, anchor, focus, "pointer selection outside the document");
                return None;
            }
            Some(Cmd::Redraw)
        }
        SurfaceMsg::Focus => {
            surface.focus();
            Some(Cmd::Redraw)
        }
        SurfaceMsg::Blur => {
            surface.blur();
            Some(Cmd::Redraw)
        }
        SurfaceMsg::Paste(text) => match surface.paste(&text) {
            PasteOutcome::Inserted { chars } => {
                debug!(chars, "paste inserted");
                Some(Cmd::Redraw)
            }
            PasteOutcome::Discarded => None,
        },
        SurfaceMsg::SelectAll => {
            surface.select_all();
            surface.capture_selection();
            Some(Cmd::Redraw)
        }
        SurfaceMsg::Clear => surface.clear().then_some(Cmd::Redraw),
        SurfaceMsg::SetEditable(editable) => {
            surface.set_editable(editable);
            debug!(editable, "surface lock changed");
            Some(Cmd::Redraw)
        }
        SurfaceMsg::SetFontSize(size) => {
            let applied = surface.set_font_size(size);
            model.config.font_size = applied;
            Some(Cmd::Redraw)
        }
    }
}

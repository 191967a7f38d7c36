//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod file;
mod format;
mod modal;
mod surface;
mod ui;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::{sync_views, AppModel};

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use file::update_file;
pub use format::update_format;
pub use modal::{insert_pending, update_modal};
pub use surface::update_surface;
pub use ui::update_ui;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let result = match msg {
        Msg::Surface(m) => surface::update_surface(model, m),
        Msg::Format(m) => format::update_format(model, m),
        Msg::Modal(m) => modal::update_modal(model, m),
        Msg::File(m) => file::update_file(model, m),
        Msg::Ui(m) => ui::update_ui(model, m),
    };

    // Every content change resyncs the preview and the counters
    if sync_views(model) && result.is_none() {
        return Some(Cmd::Redraw);
    }
    result
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after selection state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = SelectionSnapshot::from_surface(&model.surface);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = SelectionSnapshot::from_surface(&model.surface);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "selection", %diff, "state changed");
    }
    debug_assert!(
        model.surface.text_len() <= model.surface.budget().max(),
        "{} left the document over its limit",
        msg_name
    );

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Surface(m) => format!("Surface::{:?}", m),
        Msg::Format(m) => format!("Format::{:?}", m),
        Msg::Modal(m) => format!("Modal::{:?}", m),
        // Payloads can be whole files
        Msg::File(m) => {
            let name = format!("{:?}", m);
            let short = crate::util::text::take_chars(&name, 120);
            if short.len() < name.len() {
                format!("File::{}..", short)
            } else {
                format!("File::{}", name)
            }
        }
        Msg::Ui(m) => format!("Ui::{:?}", m),
    }
}

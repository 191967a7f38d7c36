//! Toolbar formatting handlers

use tracing::debug;

use crate::commands::Cmd;
use crate::editable::RichTextCommands;
use crate::messages::FormatMsg;
use crate::model::AppModel;

/// Handle formatting messages
pub fn update_format(model: &mut AppModel, msg: FormatMsg) -> Option<Cmd> {
    let surface = &mut model.surface;
    let changed = match &msg {
        FormatMsg::Bold => surface.toggle_bold(),
        FormatMsg::Italic => surface.toggle_italic(),
        FormatMsg::Underline => surface.toggle_underline(),
        FormatMsg::Strikethrough => surface.toggle_strikethrough(),
        FormatMsg::Align(alignment) => surface.set_alignment(*alignment),
        FormatMsg::OrderedList => surface.insert_ordered_list(),
        FormatMsg::UnorderedList => surface.insert_unordered_list(),
        FormatMsg::Block(format) => surface.format_block(*format),
        FormatMsg::FontName(name) => surface.set_font_name(name),
        FormatMsg::Undo => surface.undo(),
        FormatMsg::Redo => surface.redo(),
    };
    if !changed {
        debug!(?msg, "format command had no effect");
        return None;
    }
    Some(Cmd::Redraw)
}

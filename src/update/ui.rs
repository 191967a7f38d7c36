//! UI update handlers

use crate::commands::Cmd;
use crate::messages::UiMsg;
use crate::model::AppModel;

/// Handle UI messages
pub fn update_ui(model: &mut AppModel, msg: UiMsg) -> Option<Cmd> {
    match msg {
        UiMsg::Notify(message) => {
            model.notify(message);
            Some(Cmd::Redraw)
        }
        UiMsg::DismissNotification => model.ui.dismiss().map(|_| Cmd::Redraw),
    }
}

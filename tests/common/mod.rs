//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use inkpad::config::EditorConfig;
use inkpad::editable::{EditableDocument, Node, Tag};
use inkpad::input::{KeyCode, Keystroke};
use inkpad::messages::{Msg, SurfaceMsg};
use inkpad::model::AppModel;
use inkpad::update::update;

/// Default config with a different maximum
pub fn config_with_max(max: usize) -> EditorConfig {
    EditorConfig {
        max_chars: max,
        ..EditorConfig::default()
    }
}

/// Create a test model holding plain text
pub fn test_model(text: &str, max: usize) -> AppModel {
    AppModel::with_document(config_with_max(max), EditableDocument::from_plain_text(text))
}

/// Create a test model around arbitrary nodes
pub fn test_model_with_nodes(nodes: Vec<Node>, max: usize) -> AppModel {
    AppModel::with_document(config_with_max(max), EditableDocument::from_nodes(nodes))
}

/// `<p>text</p>`
pub fn paragraph(text: &str) -> Node {
    Node::element(Tag::Paragraph, vec![Node::text(text)])
}

/// Pointer selection between two plain-text offsets
pub fn select(model: &mut AppModel, anchor: usize, focus: usize) {
    update(model, Msg::Surface(SurfaceMsg::PointerSelect { anchor, focus }));
}

/// Collapsed pointer selection
pub fn place_caret(model: &mut AppModel, offset: usize) {
    select(model, offset, offset);
}

/// Press and release each key
pub fn press(model: &mut AppModel, key: Keystroke) {
    update(model, Msg::Surface(SurfaceMsg::KeyDown(key)));
    update(model, Msg::Surface(SurfaceMsg::KeyUp(key)));
}

pub fn press_key(model: &mut AppModel, code: KeyCode) {
    press(model, Keystroke::key(code));
}

/// Type text one keystroke at a time
pub fn type_text(model: &mut AppModel, text: &str) {
    for key in Keystroke::typing(text) {
        press(model, key);
    }
}

pub fn text(model: &AppModel) -> String {
    model.surface.plain_text()
}

pub fn html(model: &AppModel) -> String {
    model.surface.html()
}

//! Configuration system tests
//!
//! Tests for config paths, editor config parsing and how the model applies it.

use inkpad::config::EditorConfig;
use inkpad::config_paths;
use inkpad::editable::{EditableDocument, MissingSelection};
use inkpad::messages::{Msg, SurfaceMsg};
use inkpad::model::{AppModel, CounterLevel};
use inkpad::update::update;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_named_after_app() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.ends_with("inkpad"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Editor Config Tests
// ========================================================================

#[test]
fn test_defaults() {
    let config = EditorConfig::default();
    assert_eq!(config.max_chars, 500);
    assert_eq!(config.font_size, 16);
    assert_eq!(config.missing_selection, MissingSelection::Drop);
    assert_eq!(config.export_file_name, "document.txt");
    assert_eq!(config.warn_threshold, 100);
    assert_eq!(config.critical_threshold, 50);
}

#[test]
fn test_yaml_round_trip() {
    let config = EditorConfig {
        max_chars: 280,
        missing_selection: MissingSelection::Append,
        ..EditorConfig::default()
    };
    let yaml = serde_yaml::to_string(&config).unwrap();
    assert!(yaml.contains("missing_selection: append"));
    assert_eq!(EditorConfig::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_unknown_keys_ignored() {
    let config = EditorConfig::from_yaml("max_chars: 42\ntheme: dark\n").unwrap();
    assert_eq!(config.max_chars, 42);
}

#[test]
fn test_font_size_clamped() {
    let config = EditorConfig::from_yaml("font_size: 500\n").unwrap();
    assert_eq!(config.font_size, 72);
    let config = EditorConfig::from_yaml("font_size: 1\n").unwrap();
    assert_eq!(config.font_size, 8);
}

// ========================================================================
// Model Integration Tests
// ========================================================================

#[test]
fn test_model_uses_configured_limit_and_font() {
    let config = EditorConfig::from_yaml("max_chars: 5\nfont_size: 20\n").unwrap();
    let model = AppModel::with_document(config, EditableDocument::from_plain_text("abcdefgh"));
    assert_eq!(model.surface.plain_text(), "abcde");
    assert_eq!(model.surface.font_size(), 20);
}

#[test]
fn test_configured_thresholds_drive_counter_level() {
    let config = EditorConfig::from_yaml("max_chars: 20\nwarn_threshold: 10\ncritical_threshold: 3\n")
        .unwrap();
    let doc = |text: &str| EditableDocument::from_plain_text(text);

    let model = AppModel::with_document(config.clone(), doc("abc"));
    assert_eq!(model.counter.level, CounterLevel::Normal);

    let model = AppModel::with_document(config.clone(), doc("abcdefghijkl"));
    assert_eq!(model.counter.level, CounterLevel::Warning);

    let model = AppModel::with_document(config, doc("abcdefghijklmnopqr"));
    assert_eq!(model.counter.level, CounterLevel::Critical);
}

#[test]
fn test_font_size_message_updates_config() {
    let mut model = AppModel::new(EditorConfig::default());
    update(&mut model, Msg::Surface(SurfaceMsg::SetFontSize(100)));
    assert_eq!(model.surface.font_size(), 72);
    assert_eq!(model.config.font_size, 72);
}

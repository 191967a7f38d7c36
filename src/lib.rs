//! Inkpad - Elm-style rich-text editing core
//!
//! This crate provides an editable rich-text surface that keeps its
//! selection across focus changes, holds the plain-text length under a
//! character budget, and splices structured content (images, tables, code
//! blocks) at the remembered caret. State changes follow the Elm
//! Architecture pattern.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod input;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use messages::Msg;
pub use model::AppModel;

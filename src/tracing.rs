//! Tracing setup and selection diagnostics
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=inkpad::editable=trace` - module-level filtering
//!
//! Logs are also written to `~/.config/inkpad/logs/inkpad.log` with daily
//! rotation, at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::editable::EditableSurface;

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "inkpad.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of the selection state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// Live selection as (anchor, focus) plain-text offsets
    pub live: Option<(usize, usize)>,
    pub saved: bool,
    pub saved_revision: Option<u64>,
    pub revision: u64,
    pub text_len: usize,
}

impl SelectionSnapshot {
    pub fn from_surface(surface: &EditableSurface) -> Self {
        let saved = surface.saved_selection();
        Self {
            live: surface.selection_offsets(),
            saved: saved.is_some(),
            saved_revision: saved.map(|s| s.revision),
            revision: surface.document().revision(),
            text_len: surface.text_len(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.live != other.live {
            changes.push(format!("live: {:?} → {:?}", self.live, other.live));
        }
        if self.saved_revision != other.saved_revision || self.saved != other.saved {
            changes.push(format!(
                "saved: {:?} → {:?}",
                self.saved_revision, other.saved_revision
            ));
        }
        if self.text_len != other.text_len {
            changes.push(format!("len: {} → {}", self.text_len, other.text_len));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

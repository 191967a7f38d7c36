//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/inkpad/config.yaml`

use serde::{Deserialize, Serialize};

use crate::editable::{MissingSelection, MAX_FONT_SIZE, MIN_FONT_SIZE};

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum plain-text length of the editable surface
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Global font size in points (clamped 8..=72 on load)
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// What an insertion does when there is no usable saved selection
    #[serde(default)]
    pub missing_selection: MissingSelection,

    /// File name used by the plain-text export
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,

    /// Counter turns to warning below this many remaining characters
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: usize,

    /// Counter turns critical below this many remaining characters
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: usize,
}

fn default_max_chars() -> usize {
    500
}

fn default_font_size() -> u32 {
    16
}

fn default_export_file_name() -> String {
    "document.txt".to_string()
}

fn default_warn_threshold() -> usize {
    100
}

fn default_critical_threshold() -> usize {
    50
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            font_size: default_font_size(),
            missing_selection: MissingSelection::default(),
            export_file_name: default_export_file_name(),
            warn_threshold: default_warn_threshold(),
            critical_threshold: default_critical_threshold(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a YAML document, normalizing out-of-range values
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config.normalized())
    }

    /// Clamp the font size and keep the critical threshold at or below
    /// the warning threshold
    pub fn normalized(mut self) -> Self {
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.critical_threshold = self.critical_threshold.min(self.warn_threshold);
        if self.export_file_name.trim().is_empty() {
            self.export_file_name = default_export_file_name();
        }
        self
    }
}

//! Command-line argument parsing for the editor
//!
//! Supports:
//! - Importing a plain-text file
//! - Placing the caret at a plain-text offset
//! - Paste, image, table and code block insertions
//! - Exporting the result and a JSON summary

use clap::Parser;
use std::path::PathBuf;

use crate::config::EditorConfig;
use crate::editable::is_valid_image_url;

/// A rich-text editing core with a character budget
#[derive(Parser, Debug, Default)]
#[command(
    name = "inkpad",
    version,
    about = "Rich-text editing with a character budget"
)]
pub struct CliArgs {
    /// Plain-text file to import
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Maximum number of characters (overrides the config)
    #[arg(long, value_name = "N")]
    pub max: Option<usize>,

    /// Put the caret at this plain-text offset (default: document end)
    #[arg(long, value_name = "OFFSET")]
    pub at: Option<usize>,

    /// Paste text at the caret
    #[arg(long, value_name = "TEXT")]
    pub paste: Option<String>,

    /// Paste the clipboard text at the caret
    #[arg(long)]
    pub paste_clipboard: bool,

    /// Insert an image from a URL or a local file
    #[arg(long, value_name = "SRC")]
    pub image: Option<String>,

    /// Image width in pixels (used with --image)
    #[arg(long, value_name = "W")]
    pub width: Option<u32>,

    /// Image height in pixels (used with --image)
    #[arg(long, value_name = "H")]
    pub height: Option<u32>,

    /// Image alt text (used with --image)
    #[arg(long, value_name = "TEXT")]
    pub alt: Option<String>,

    /// Insert a table, e.g. 3x4
    #[arg(long, value_name = "RxC")]
    pub table: Option<String>,

    /// Insert a code block with an optional language
    #[arg(long, value_name = "LANG", num_args = 0..=1)]
    pub code: Option<Option<String>>,

    /// Export the plain text (default: the configured file name)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    /// Print a JSON summary instead of the preview
    #[arg(long)]
    pub json: bool,
}

/// Where an image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageArg {
    Url(String),
    File(PathBuf),
}

impl ImageArg {
    /// URLs are recognized by scheme; anything else is a local path
    pub fn parse(src: &str) -> Self {
        if is_valid_image_url(src) {
            ImageArg::Url(src.to_string())
        } else {
            ImageArg::File(PathBuf::from(src))
        }
    }
}

/// One insertion to perform at the caret, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupAction {
    Paste(String),
    PasteClipboard,
    Image {
        source: ImageArg,
        width: Option<u32>,
        height: Option<u32>,
        alt: Option<String>,
    },
    /// Field texts as typed into the table modal
    Table { rows: String, cols: String },
    /// `None` keeps the modal's default language
    CodeBlock { language: Option<String> },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    pub file: Option<PathBuf>,
    pub max_chars: Option<usize>,
    /// Initial caret offset; the document end when `None`
    pub caret: Option<usize>,
    pub actions: Vec<StartupAction>,
    /// `Some(None)` exports to the configured file name
    pub export: Option<Option<PathBuf>>,
    pub json: bool,
}

/// Split `RxC` (or `RXC`) into the two field texts
fn parse_table(spec: &str) -> Result<(String, String), String> {
    let (rows, cols) = spec
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("--table expects ROWSxCOLS, got '{}'", spec))?;
    Ok((rows.trim().to_string(), cols.trim().to_string()))
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        if self.max == Some(0) {
            return Err("--max must be at least 1".to_string());
        }
        if self.image.is_none()
            && (self.width.is_some() || self.height.is_some() || self.alt.is_some())
        {
            return Err("--width, --height and --alt require --image".to_string());
        }

        let mut actions = Vec::new();
        if let Some(text) = self.paste {
            actions.push(StartupAction::Paste(text));
        }
        if self.paste_clipboard {
            actions.push(StartupAction::PasteClipboard);
        }
        if let Some(src) = self.image {
            actions.push(StartupAction::Image {
                source: ImageArg::parse(&src),
                width: self.width,
                height: self.height,
                alt: self.alt,
            });
        }
        if let Some(spec) = self.table {
            let (rows, cols) = parse_table(&spec)?;
            actions.push(StartupAction::Table { rows, cols });
        }
        if let Some(language) = self.code {
            actions.push(StartupAction::CodeBlock { language });
        }

        Ok(StartupConfig {
            file: self.file,
            max_chars: self.max,
            caret: self.at,
            actions,
            export: self.export,
            json: self.json,
        })
    }
}

impl StartupConfig {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut EditorConfig) {
        if let Some(max) = self.max_chars {
            config.max_chars = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args() {
        let config = CliArgs::default().into_config().unwrap();
        assert_eq!(config, StartupConfig::default());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::parse_from([
            "inkpad", "notes.txt", "--max", "120", "--at", "4", "--paste", "hi", "--json",
        ]);
        let config = args.into_config().unwrap();
        assert_eq!(config.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(config.max_chars, Some(120));
        assert_eq!(config.caret, Some(4));
        assert_eq!(config.actions, vec![StartupAction::Paste("hi".into())]);
        assert!(config.json);
    }

    #[test]
    fn test_actions_keep_fixed_order() {
        let args = CliArgs::parse_from([
            "inkpad",
            "--code",
            "--table",
            "2x3",
            "--image",
            "https://example.com/a.png",
            "--paste-clipboard",
        ]);
        let config = args.into_config().unwrap();
        assert_eq!(
            config.actions,
            vec![
                StartupAction::PasteClipboard,
                StartupAction::Image {
                    source: ImageArg::Url("https://example.com/a.png".into()),
                    width: None,
                    height: None,
                    alt: None,
                },
                StartupAction::Table {
                    rows: "2".into(),
                    cols: "3".into()
                },
                StartupAction::CodeBlock { language: None },
            ]
        );
    }

    #[test]
    fn test_code_with_language() {
        let args = CliArgs::parse_from(["inkpad", "--code", "rust"]);
        let config = args.into_config().unwrap();
        assert_eq!(
            config.actions,
            vec![StartupAction::CodeBlock {
                language: Some("rust".into())
            }]
        );
    }

    #[test]
    fn test_export_optional_path() {
        let bare = CliArgs::parse_from(["inkpad", "--export"]).into_config().unwrap();
        assert_eq!(bare.export, Some(None));

        let named = CliArgs::parse_from(["inkpad", "--export", "out.txt"])
            .into_config()
            .unwrap();
        assert_eq!(named.export, Some(Some(PathBuf::from("out.txt"))));
    }

    #[test]
    fn test_local_image_path() {
        assert_eq!(
            ImageArg::parse("photos/cat.png"),
            ImageArg::File(PathBuf::from("photos/cat.png"))
        );
        assert!(matches!(ImageArg::parse("data:image/png;base64,AA"), ImageArg::Url(_)));
    }

    #[test]
    fn test_bad_table_spec() {
        let args = CliArgs {
            table: Some("3by4".into()),
            ..Default::default()
        };
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_dimensions_need_image() {
        let args = CliArgs {
            width: Some(100),
            ..Default::default()
        };
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_zero_max_rejected() {
        let args = CliArgs {
            max: Some(0),
            ..Default::default()
        };
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_apply_overrides_max() {
        let startup = StartupConfig {
            max_chars: Some(42),
            ..Default::default()
        };
        let mut config = EditorConfig::default();
        startup.apply(&mut config);
        assert_eq!(config.max_chars, 42);
    }
}

//! Runtime - executes commands and feeds completions back into `update`
//!
//! Side effects run on worker threads; each sends exactly one completion
//! message over the channel. The clipboard and file dialogs go through a
//! [`Platform`] so headless runs and tests can substitute them.

mod session;

pub use session::SessionSummary;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::commands::{Cmd, DialogPurpose, ImageSource};
use crate::messages::{FileMsg, ModalMsg, Msg};
use crate::model::AppModel;
use crate::update::update;
use crate::util::image::{data_url, dimensions, mime_type, probe_url};
use crate::util::{filename_for_display, read_image_file, read_text_file};

/// Desktop services used by the runtime
pub trait Platform: Send + Sync + 'static {
    /// Plain text currently on the clipboard
    fn read_clipboard(&self) -> Result<String, String>;
    /// Ask the user for a file; `None` when cancelled
    fn pick_file(&self, purpose: DialogPurpose) -> Option<PathBuf>;
}

/// System clipboard (arboard) and native dialogs (rfd)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn read_clipboard(&self) -> Result<String, String> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_text())
            .map_err(|e| e.to_string())
    }

    fn pick_file(&self, purpose: DialogPurpose) -> Option<PathBuf> {
        let dlg = rfd::FileDialog::new();
        let dlg = match purpose {
            DialogPurpose::ImportText => dlg.add_filter("Text", &["txt", "md", "text"]),
            DialogPurpose::ImageFile => {
                dlg.add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp", "ico"])
            }
        };
        dlg.pick_file()
    }
}

/// Owns the model and runs the update/command loop
pub struct Runtime<P: Platform = SystemPlatform> {
    pub model: AppModel,
    platform: Arc<P>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Spawned jobs whose completion message has not been processed
    in_flight: usize,
}

impl Runtime<SystemPlatform> {
    pub fn new(model: AppModel) -> Self {
        Self::with_platform(model, SystemPlatform)
    }
}

impl<P: Platform> Runtime<P> {
    pub fn with_platform(model: AppModel, platform: P) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            platform: Arc::new(platform),
            msg_tx,
            msg_rx,
            in_flight: 0,
        }
    }

    /// Run one message through `update` and start its command.
    /// Returns whether a redraw is needed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        match update(&mut self.model, msg) {
            Some(cmd) => {
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                needs_redraw
            }
            None => false,
        }
    }

    /// Number of jobs still running
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Block until every job, including the ones completions start, is done
    pub fn run_until_idle(&mut self) -> bool {
        let mut needs_redraw = false;
        while self.in_flight > 0 {
            match self.msg_rx.recv() {
                Ok(msg) => {
                    self.in_flight -= 1;
                    needs_redraw |= self.dispatch(msg);
                }
                Err(e) => {
                    warn!("Runtime channel closed: {}", e);
                    break;
                }
            }
        }
        needs_redraw
    }

    fn spawn(&mut self, job: impl FnOnce(&P) -> Msg + Send + 'static) {
        let tx = self.msg_tx.clone();
        let platform = Arc::clone(&self.platform);
        self.in_flight += 1;
        std::thread::spawn(move || {
            let msg = job(platform.as_ref());
            let _ = tx.send(msg);
        });
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::LoadTextFile { request, path } => self.spawn(move |_| {
                let result = read_text_file(&path)
                    .map_err(|e| e.user_message(&filename_for_display(&path)));
                Msg::File(FileMsg::TextLoaded { request, result })
            }),
            Cmd::SaveFile { path, content } => self.spawn(move |_| {
                let result = std::fs::write(&path, content).map_err(|e| e.to_string());
                Msg::File(FileMsg::ExportCompleted { path, result })
            }),
            Cmd::ReadImageFile { request, path } => self.spawn(move |_| {
                let result = read_image_file(&path)
                    .map(|bytes| data_url(&bytes, mime_type(&bytes, Some(path.as_path()))))
                    .map_err(|e| e.user_message(&filename_for_display(&path)));
                Msg::File(FileMsg::ImageLoaded { request, result })
            }),
            Cmd::ProbeImage { request, source } => self.spawn(move |_| {
                let dimensions = match &source {
                    ImageSource::Url(url) => probe_url(url),
                    ImageSource::File(path) => match read_image_file(path) {
                        Ok(bytes) => dimensions(&bytes),
                        Err(e) => {
                            warn!(path = %path.display(), %e, "image probe failed");
                            None
                        }
                    },
                };
                debug!(%request, ?dimensions, "image probed");
                Msg::Modal(ModalMsg::ImageProbed {
                    request,
                    dimensions,
                })
            }),
            Cmd::ReadClipboard => self.spawn(|platform| {
                Msg::File(FileMsg::ClipboardRead(platform.read_clipboard()))
            }),
            Cmd::ShowOpenFileDialog { purpose } => self.spawn(move |platform| {
                let path = platform.pick_file(purpose);
                Msg::File(FileMsg::DialogClosed { purpose, path })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::editable::EditableDocument;
    use crate::messages::SurfaceMsg;

    struct FakePlatform {
        clipboard: Result<String, String>,
        picked: Option<PathBuf>,
    }

    impl Platform for FakePlatform {
        fn read_clipboard(&self) -> Result<String, String> {
            self.clipboard.clone()
        }

        fn pick_file(&self, _purpose: DialogPurpose) -> Option<PathBuf> {
            self.picked.clone()
        }
    }

    fn runtime(text: &str, clipboard: &str) -> Runtime<FakePlatform> {
        let model = AppModel::with_document(
            EditorConfig::default(),
            EditableDocument::from_plain_text(text),
        );
        Runtime::with_platform(
            model,
            FakePlatform {
                clipboard: Ok(clipboard.to_string()),
                picked: None,
            },
        )
    }

    #[test]
    fn test_clipboard_paste_round_trip() {
        let mut rt = runtime("ab", "XY");
        rt.dispatch(Msg::Surface(SurfaceMsg::PointerSelect { anchor: 1, focus: 1 }));
        rt.dispatch(Msg::File(FileMsg::PasteFromClipboard));
        assert_eq!(rt.pending(), 1);
        rt.run_until_idle();
        assert_eq!(rt.pending(), 0);
        assert_eq!(rt.model.surface.plain_text(), "aXYb");
    }

    #[test]
    fn test_clipboard_error_leaves_document() {
        let model = AppModel::with_document(
            EditorConfig::default(),
            EditableDocument::from_plain_text("ab"),
        );
        let mut rt = Runtime::with_platform(
            model,
            FakePlatform {
                clipboard: Err("no clipboard".to_string()),
                picked: None,
            },
        );
        rt.dispatch(Msg::File(FileMsg::PasteFromClipboard));
        rt.run_until_idle();
        assert_eq!(rt.model.surface.plain_text(), "ab");
    }

    #[test]
    fn test_cancelled_dialog_is_noop() {
        let mut rt = runtime("ab", "");
        rt.dispatch(Msg::File(FileMsg::BrowseImport));
        rt.run_until_idle();
        assert_eq!(rt.model.surface.plain_text(), "ab");
        assert!(!rt.model.ui.is_loading);
    }

    #[test]
    fn test_redraw_is_not_a_job() {
        let mut rt = runtime("ab", "");
        rt.process_cmd(Cmd::batch(vec![Cmd::Redraw, Cmd::None]));
        assert_eq!(rt.pending(), 0);
        assert!(!rt.run_until_idle());
    }
}

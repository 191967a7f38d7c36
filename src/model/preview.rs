//! Preview pane and character/word counters, derived from the surface
//!
//! Both are pure views: [`sync_views`](super::sync_views) recomputes them
//! whenever the document revision moves.

use crate::editable::EditableSurface;

/// Serialized rich content mirrored from the surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewPane {
    pub html: String,
    /// Document revision the HTML was taken from
    pub revision: Option<u64>,
}

impl PreviewPane {
    /// Whether the preview lags behind the surface
    pub fn is_stale(&self, surface: &EditableSurface) -> bool {
        self.revision != Some(surface.document().revision())
    }

    pub fn sync(&mut self, surface: &EditableSurface) {
        self.html = surface.html();
        self.revision = Some(surface.document().revision());
    }
}

/// Counter urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CounterLevel {
    #[default]
    Normal,
    Warning,
    Critical,
}

/// Remaining characters and word count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    pub remaining: usize,
    pub words: usize,
    pub level: CounterLevel,
}

impl CounterState {
    pub fn sync(&mut self, surface: &EditableSurface, warn_below: usize, critical_below: usize) {
        self.remaining = surface.remaining();
        self.words = surface.document().word_count();
        self.level = if self.remaining < critical_below {
            CounterLevel::Critical
        } else if self.remaining < warn_below {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        };
    }

    pub fn display(&self) -> String {
        format!("{} characters | {} words", self.remaining, self.words)
    }
}

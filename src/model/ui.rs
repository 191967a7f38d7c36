//! UI state - the active modal and user notifications

use std::collections::VecDeque;

use super::modal::ModalState;

/// Notifications kept before the oldest is dropped
const MAX_NOTIFICATIONS: usize = 16;

/// UI state - modal and notifications
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active modal (if any)
    pub active_modal: Option<ModalState>,
    /// Messages for the user, oldest first
    pub notifications: VecDeque<String>,
    /// Whether a text file is currently being loaded
    pub is_loading: bool,
    /// Whether an export is currently being written
    pub is_saving: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a modal is currently active
    pub fn has_modal(&self) -> bool {
        self.active_modal.is_some()
    }

    /// Open a modal
    pub fn open_modal(&mut self, state: ModalState) {
        self.active_modal = Some(state);
    }

    /// Close the active modal
    pub fn close_modal(&mut self) -> Option<ModalState> {
        self.active_modal.take()
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(message.into());
    }

    /// Remove the oldest notification
    pub fn dismiss(&mut self) -> Option<String> {
        self.notifications.pop_front()
    }
}

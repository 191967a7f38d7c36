//! Character budget for the editable surface.
//!
//! The budget owns the maximum plain-text length. The surface consults it
//! before a keystroke reaches the document, while clipping pasted text, and
//! after every content change.

use crate::input::Keystroke;
use crate::util::text::take_chars;

/// Maximum plain-text length plus the checks derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterBudget {
    max: usize,
}

impl Default for CharacterBudget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX)
    }
}

impl CharacterBudget {
    pub const DEFAULT_MAX: usize = 500;

    pub fn new(max: usize) -> Self {
        Self { max }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Characters left before the maximum (saturating)
    pub fn remaining(&self, current_len: usize) -> usize {
        self.max.saturating_sub(current_len)
    }

    /// Check if inserting text would exceed the maximum
    pub fn would_exceed(&self, current_len: usize, insert_len: usize) -> bool {
        current_len + insert_len > self.max
    }

    pub fn is_exceeded(&self, current_len: usize) -> bool {
        current_len > self.max
    }

    /// Whether a keydown must be cancelled: at or past the maximum, a key
    /// that produces a single printable character without Ctrl/Meta/Alt.
    /// Everything else (navigation, deletion, Enter, shortcuts) passes.
    pub fn blocks_key(&self, key: &Keystroke, current_len: usize) -> bool {
        current_len >= self.max && key.is_printable()
    }

    /// The part of `text` that still fits
    pub fn clip<'a>(&self, text: &'a str, current_len: usize) -> &'a str {
        take_chars(text, self.remaining(current_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, Modifiers};

    #[test]
    fn test_remaining_saturates() {
        let budget = CharacterBudget::new(10);
        assert_eq!(budget.remaining(3), 7);
        assert_eq!(budget.remaining(10), 0);
        assert_eq!(budget.remaining(25), 0);
    }

    #[test]
    fn test_would_exceed() {
        let budget = CharacterBudget::new(10);
        assert!(!budget.would_exceed(5, 5));
        assert!(budget.would_exceed(8, 3));
    }

    #[test]
    fn test_blocks_printable_only_at_limit() {
        let budget = CharacterBudget::new(5);
        let a = Keystroke::char('a');
        assert!(!budget.blocks_key(&a, 4));
        assert!(budget.blocks_key(&a, 5));
        assert!(budget.blocks_key(&Keystroke::key(KeyCode::Space), 5));
        assert!(budget.blocks_key(
            &Keystroke::new(KeyCode::Char('A'), Modifiers::SHIFT),
            5
        ));
    }

    #[test]
    fn test_action_keys_pass_at_limit() {
        let budget = CharacterBudget::new(5);
        for code in [
            KeyCode::Backspace,
            KeyCode::Delete,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::Tab,
            KeyCode::Escape,
            KeyCode::Enter,
        ] {
            assert!(!budget.blocks_key(&Keystroke::key(code), 5), "{:?}", code);
        }
        for mods in [Modifiers::CTRL, Modifiers::META, Modifiers::ALT] {
            assert!(!budget.blocks_key(&Keystroke::new(KeyCode::Char('c'), mods), 5));
        }
    }

    #[test]
    fn test_clip() {
        let budget = CharacterBudget::new(5);
        assert_eq!(budget.clip("héllo world", 2), "hél");
        assert_eq!(budget.clip("abc", 5), "");
        assert_eq!(budget.clip("abc", 0), "abc");
    }
}

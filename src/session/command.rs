use crate::hints::{HintMode, SelectionState};
use crate::platform::{Key, KeyEvent};

/// The full input vocabulary of a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintCommand {
    FilterChar { ch: char, is_letter: bool },
    Undo,
    UndoAll,
    Select,
    Exit,
}

/// Maps a raw key event onto a command, or None for input the session
/// ignores (releases, unmapped keys, letters when the detector supplied
/// no names to match them against).
pub fn map_key_event(event: KeyEvent, state: &SelectionState) -> Option<HintCommand> {
    if !event.pressed {
        return None;
    }

    match event.key {
        Key::Escape => Some(HintCommand::Exit),
        Key::Enter | Key::Space => {
            // Select is a numeric-mode concept; alphabetic sessions end
            // only by narrowing to one label.
            (state.mode() == HintMode::Numeric).then_some(HintCommand::Select)
        }
        Key::CtrlU => Some(HintCommand::UndoAll),
        Key::Backspace => Some(HintCommand::Undo),
        Key::Char(c) => map_filter_char(c, state),
        Key::Other => None,
    }
}

fn map_filter_char(c: char, state: &SelectionState) -> Option<HintCommand> {
    match state.mode() {
        HintMode::Numeric => {
            if c.is_ascii_digit() {
                return Some(HintCommand::FilterChar {
                    ch: c,
                    is_letter: false,
                });
            }
            if c.is_ascii_alphabetic() && state.names_available() {
                return Some(HintCommand::FilterChar {
                    ch: c,
                    is_letter: true,
                });
            }
            None
        }
        HintMode::Alphabetic => {
            if c.is_control() {
                return None;
            }
            Some(HintCommand::FilterChar {
                ch: c,
                is_letter: false,
            })
        }
    }
}

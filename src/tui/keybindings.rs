//! Key bindings: maps key and mouse events to application actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::layout::pad_at;
use crate::instrument::pad_for_key;

/// Application-level actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Play a pad by index.
    TriggerPad(usize),
    /// Play the focused pad (Enter/Space).
    TriggerFocused,
    /// Move focus to the next pad.
    FocusNext,
    /// Move focus to the previous pad.
    FocusPrev,
    /// Focus and play a pad (mouse press).
    ClickPad(usize),
    VolumeUp,
    VolumeDown,
    SpeedUp,
    SpeedDown,
    ToggleMute,
    ToggleMetronome,
    /// Drop the audio graph and rebuild it on the next interaction.
    ReconnectAudio,
}

/// Map a key event to an action. Press and auto-repeat both trigger;
/// releases are ignored.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => {
            if let Some(pad) = pad_for_key(c) {
                return Some(Action::TriggerPad(pad));
            }
            match c.to_ascii_lowercase() {
                ' ' => Some(Action::TriggerFocused),
                'm' => Some(Action::ToggleMute),
                'b' => Some(Action::ToggleMetronome),
                'r' => Some(Action::ReconnectAudio),
                'q' => Some(Action::Quit),
                '+' | '=' => Some(Action::VolumeUp),
                '-' | '_' => Some(Action::VolumeDown),
                _ => None,
            }
        }
        KeyCode::Enter => Some(Action::TriggerFocused),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        KeyCode::Up => Some(Action::VolumeUp),
        KeyCode::Down => Some(Action::VolumeDown),
        KeyCode::Right => Some(Action::SpeedUp),
        KeyCode::Left => Some(Action::SpeedDown),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Map a mouse event to an action. Only a button press inside a pad counts.
pub fn map_mouse(mouse: MouseEvent, pads: &[Rect]) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(_) => pad_at(pads, mouse.column, mouse.row).map(Action::ClickPad),
        _ => None,
    }
}

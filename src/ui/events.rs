//! Event handling for the browser
//!
//! Polls crossterm and routes key and mouse events by mode. Custom
//! keybinds are checked before the hardwired keys, so a user can move
//! an action without colliding with query editing or list navigation.

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::keybinds::BrowseAction;

use super::state::{BrowserState, Mode};

/// Resolved keybind lookup table, built once per session.
pub type KeybindMap = HashMap<KeyEvent, BrowseAction>;

/// What the tick loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Nothing to act on
    Continue,
    /// A keybind action fired
    Action(BrowseAction),
    /// The search text changed, arm the debounce
    InputChanged,
    /// Submit the current input as a fresh search
    Submit,
    /// Accept the top suggestion and search for it
    AcceptSuggestion,
    /// The picker overlay confirmed its choice
    PickerConfirmed,
    /// The price overlay submitted its buffer
    PriceSubmitted,
    /// Leave the browser
    Exit,
    /// Key consumed with no follow-up work
    Ignored,
}

/// Poll for events and handle them
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn poll_and_handle(
    state: &mut BrowserState,
    custom_binds: &KeybindMap,
    timeout: Duration,
) -> std::io::Result<EventResult> {
    if !event::poll(timeout)? {
        return Ok(EventResult::Continue);
    }

    let result = match event::read()? {
        Event::Key(key) => match state.mode {
            Mode::Normal => handle_normal_mode(state, key, custom_binds),
            Mode::Help => handle_help_mode(state),
            Mode::Picker => handle_picker_mode(state, key),
            Mode::PriceInput => handle_price_mode(state, key),
        },
        Event::Mouse(mouse) => handle_mouse(state, mouse),
        Event::Resize(_, _) => EventResult::Continue,
        _ => EventResult::Ignored,
    };

    Ok(result)
}

/// Handle events in normal mode
fn handle_normal_mode(
    state: &mut BrowserState,
    key: KeyEvent,
    custom_binds: &KeybindMap,
) -> EventResult {
    // Custom keybinds take precedence
    if let Some(action) = custom_binds.get(&key) {
        return EventResult::Action(*action);
    }

    match (key.code, key.modifiers) {
        // Exit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => EventResult::Exit,
        (KeyCode::Esc, _) => {
            if state.show_suggestions {
                state.hide_suggestions();
                EventResult::Continue
            } else {
                EventResult::Exit
            }
        }

        (KeyCode::Enter, _) => EventResult::Submit,
        (KeyCode::Tab, _) => {
            if state.first_suggestion().is_some() {
                EventResult::AcceptSuggestion
            } else {
                EventResult::Ignored
            }
        }

        // Result list navigation
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
            state.move_up();
            EventResult::Continue
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
            state.move_down();
            EventResult::Continue
        }
        (KeyCode::PageUp, _) => {
            state.page_up();
            EventResult::Continue
        }
        (KeyCode::PageDown, _) => {
            state.page_down();
            EventResult::Continue
        }
        (KeyCode::Home, _) => {
            state.move_to_top();
            EventResult::Continue
        }
        (KeyCode::End, _) => {
            state.move_to_bottom();
            EventResult::Continue
        }

        // Search input editing
        (KeyCode::Backspace, _) => {
            if state.input.is_empty() {
                EventResult::Ignored
            } else {
                state.input_backspace();
                EventResult::InputChanged
            }
        }
        (KeyCode::Delete, _) => {
            if state.input_cursor >= state.input.len() {
                EventResult::Ignored
            } else {
                state.input_delete();
                EventResult::InputChanged
            }
        }
        (KeyCode::Left, _) => {
            state.input_cursor_left();
            EventResult::Continue
        }
        (KeyCode::Right, _) => {
            state.input_cursor_right();
            EventResult::Continue
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            if state.input.is_empty() {
                EventResult::Ignored
            } else {
                state.input_clear();
                EventResult::InputChanged
            }
        }
        (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
            if state.input_cursor == 0 {
                EventResult::Ignored
            } else {
                state.input_delete_word();
                EventResult::InputChanged
            }
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            state.input_push(c);
            EventResult::InputChanged
        }

        _ => EventResult::Ignored,
    }
}

/// Handle events in help mode: any key closes the overlay.
fn handle_help_mode(state: &mut BrowserState) -> EventResult {
    state.mode = Mode::Normal;
    EventResult::Continue
}

/// Handle events while a picker overlay is open.
fn handle_picker_mode(state: &mut BrowserState, key: KeyEvent) -> EventResult {
    let Some(picker) = state.picker.as_mut() else {
        state.mode = Mode::Normal;
        return EventResult::Ignored;
    };

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            state.close_picker();
            EventResult::Continue
        }
        (KeyCode::Enter, _) => EventResult::PickerConfirmed,

        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
            picker.move_up();
            EventResult::Continue
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
            picker.move_down();
            EventResult::Continue
        }

        // Multi-select pickers mark with Tab and advance, like the
        // selection column in fzf.
        (KeyCode::Tab, _) if picker.kind.is_multi() => {
            picker.toggle_current();
            picker.move_down();
            EventResult::Continue
        }

        (KeyCode::Backspace, _) => {
            picker.backspace();
            EventResult::Continue
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            picker.push(c);
            EventResult::Continue
        }

        _ => EventResult::Ignored,
    }
}

/// Handle events while the price input overlay is open.
fn handle_price_mode(state: &mut BrowserState, key: KeyEvent) -> EventResult {
    let Some(input) = state.price_input.as_mut() else {
        state.mode = Mode::Normal;
        return EventResult::Ignored;
    };

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            state.close_price_input();
            EventResult::Continue
        }
        (KeyCode::Enter, _) => EventResult::PriceSubmitted,
        (KeyCode::Backspace, _) => {
            input.backspace();
            EventResult::Continue
        }
        (KeyCode::Left, _) => {
            input.cursor_left();
            EventResult::Continue
        }
        (KeyCode::Right, _) => {
            input.cursor_right();
            EventResult::Continue
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            input.push(c);
            EventResult::Continue
        }
        _ => EventResult::Ignored,
    }
}

/// Handle mouse events
fn handle_mouse(state: &mut BrowserState, mouse: MouseEvent) -> EventResult {
    if state.mode != Mode::Normal {
        return EventResult::Ignored;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            state.move_up();
            EventResult::Continue
        }
        MouseEventKind::ScrollDown => {
            state.move_down();
            EventResult::Continue
        }
        _ => EventResult::Ignored,
    }
}

// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Handles typing, sending, clearing, voice capture, suggestions, and panel toggling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::state::TuiState;

const PAGE_SCROLL: u16 = 10;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// User submitted a message (raw, untrimmed text).
    Send(String),
    /// User asked to clear the conversation.
    Clear,
    /// User asked to start voice capture.
    Voice,
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    if ctrl && key.code == KeyCode::Char('o') {
        state.toggle_panel();
        return InputResult::None;
    }

    // A closed panel only answers to open and quit.
    if !state.is_open() {
        return match key.code {
            KeyCode::Esc => InputResult::Quit,
            _ => InputResult::None,
        };
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('l') => InputResult::Clear,
            KeyCode::Char('r') if state.voice_supported && !state.listening => InputResult::Voice,
            _ => InputResult::None,
        };
    }

    match key.code {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(PAGE_SCROLL);
            InputResult::None
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(PAGE_SCROLL);
            InputResult::None
        }
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            InputResult::None
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            InputResult::None
        }
        KeyCode::F(n) if (1..=9).contains(&n) => {
            state.apply_suggestion(usize::from(n - 1));
            InputResult::None
        }
        // Shift+Enter inserts a newline into the input buffer.
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            state.insert_char_at_cursor('\n');
            InputResult::None
        }
        KeyCode::Enter => match state.take_submission() {
            Some(text) => InputResult::Send(text),
            None => InputResult::None,
        },
        KeyCode::Char(c) => {
            state.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            InputResult::None
        }
        KeyCode::Esc => InputResult::Quit,
        _ => InputResult::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Layout};

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn state() -> TuiState {
        TuiState::from_config(&Config::default())
    }

    #[test]
    fn typing_appends_to_input() {
        let mut state = state();
        assert_eq!(handle_key(&mut state, make_key(KeyCode::Char('h'))), InputResult::None);
        handle_key(&mut state, make_key(KeyCode::Char('i')));
        assert_eq!(state.input, "hi");
        assert_eq!(state.cursor_pos, 2);
    }

    #[test]
    fn enter_sends_raw_text_without_clearing() {
        let mut state = state();
        state.prefill_input(" hello ");
        let result = handle_key(&mut state, make_key(KeyCode::Enter));
        assert_eq!(result, InputResult::Send(" hello ".to_string()));
        assert_eq!(state.input, " hello ");
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let mut state = state();
        state.prefill_input("   ");
        assert_eq!(handle_key(&mut state, make_key(KeyCode::Enter)), InputResult::None);
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let mut state = state();
        state.prefill_input("a");
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT),
        );
        assert_eq!(state.input, "a\n");
    }

    #[test]
    fn ctrl_l_clears() {
        let mut state = state();
        assert_eq!(handle_key(&mut state, ctrl('l')), InputResult::Clear);
    }

    #[test]
    fn voice_key_requires_support_and_idle() {
        let mut state = state();
        assert_eq!(handle_key(&mut state, ctrl('r')), InputResult::None);
        state.voice_supported = true;
        assert_eq!(handle_key(&mut state, ctrl('r')), InputResult::Voice);
        state.listening = true;
        assert_eq!(handle_key(&mut state, ctrl('r')), InputResult::None);
    }

    #[test]
    fn function_keys_prefill_suggestions() {
        let mut state = state();
        handle_key(&mut state, make_key(KeyCode::F(1)));
        assert_eq!(state.input, "Exam schedule");
    }

    #[test]
    fn closed_panel_ignores_typing() {
        let mut config = Config::default();
        config.ui.layout = Layout::Collapsible;
        let mut state = TuiState::from_config(&config);
        handle_key(&mut state, make_key(KeyCode::Char('x')));
        assert_eq!(state.input, "");

        handle_key(&mut state, ctrl('o'));
        handle_key(&mut state, make_key(KeyCode::Char('x')));
        assert_eq!(state.input, "x");
    }

    #[test]
    fn page_keys_scroll() {
        let mut state = state();
        handle_key(&mut state, make_key(KeyCode::PageUp));
        assert_eq!(state.scroll_offset, 10);
        handle_key(&mut state, make_key(KeyCode::PageDown));
        handle_key(&mut state, make_key(KeyCode::PageDown));
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn quit_keys() {
        let mut state = state();
        assert_eq!(handle_key(&mut state, ctrl('c')), InputResult::Quit);
        assert_eq!(handle_key(&mut state, make_key(KeyCode::Esc)), InputResult::Quit);
    }
}

//! Key handling: immediate browse keys plus a `:` command line.
//!
//! Browse mode maps single keys straight to session commands. Typing
//! `:` switches to command mode, where keys edit a buffer until Enter
//! submits it or Esc abandons it. The state machine is pure so it can
//! be driven by synthetic key events in tests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A complete command line for the session.
    Command(String),
    /// Visible state changed (command buffer edited); repaint.
    Redraw,
    /// Nothing to do.
    None,
}

/// Input mode and the command buffer when in command mode.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: Option<String>,
}

impl InputState {
    /// Current command buffer, when command mode is active.
    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    /// Advance the state machine by one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputEvent {
        // Ctrl-C quits from either mode.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputEvent::Command("quit".to_string());
        }

        if self.buffer.is_some() {
            self.handle_command_key(key)
        } else {
            self.handle_browse_key(key)
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> InputEvent {
        match key.code {
            KeyCode::Char('q') => InputEvent::Command("quit".to_string()),
            KeyCode::Char('j') | KeyCode::Down => InputEvent::Command("down".to_string()),
            KeyCode::Char('k') | KeyCode::Up => InputEvent::Command("up".to_string()),
            KeyCode::Char('h') => InputEvent::Command("help".to_string()),
            KeyCode::Char(':') => {
                self.buffer = Some(String::new());
                InputEvent::Redraw
            },
            _ => InputEvent::None,
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> InputEvent {
        match key.code {
            KeyCode::Enter => InputEvent::Command(self.buffer.take().unwrap_or_default()),
            KeyCode::Esc => {
                self.buffer = None;
                InputEvent::Redraw
            },
            // Backspace past the start of the buffer leaves command mode,
            // like erasing the `:` itself.
            KeyCode::Backspace => {
                match self.buffer.as_mut() {
                    Some(buf) if !buf.is_empty() => {
                        buf.pop();
                    },
                    _ => self.buffer = None,
                }
                InputEvent::Redraw
            },
            KeyCode::Char(c) => {
                if let Some(buf) = self.buffer.as_mut() {
                    buf.push(c);
                }
                InputEvent::Redraw
            },
            _ => InputEvent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_line(state: &mut InputState, line: &str) {
        for c in line.chars() {
            state.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn browse_keys_map_to_commands() {
        let mut state = InputState::default();
        assert_eq!(
            state.handle_key(press(KeyCode::Char('q'))),
            InputEvent::Command("quit".to_string())
        );
        assert_eq!(
            state.handle_key(press(KeyCode::Char('j'))),
            InputEvent::Command("down".to_string())
        );
        assert_eq!(
            state.handle_key(press(KeyCode::Down)),
            InputEvent::Command("down".to_string())
        );
        assert_eq!(
            state.handle_key(press(KeyCode::Char('k'))),
            InputEvent::Command("up".to_string())
        );
        assert_eq!(
            state.handle_key(press(KeyCode::Char('h'))),
            InputEvent::Command("help".to_string())
        );
        assert_eq!(state.handle_key(press(KeyCode::Char('x'))), InputEvent::None);
    }

    #[test]
    fn colon_enters_command_mode_and_enter_submits() {
        let mut state = InputState::default();
        assert_eq!(
            state.handle_key(press(KeyCode::Char(':'))),
            InputEvent::Redraw
        );
        type_line(&mut state, "open 3");
        assert_eq!(state.buffer(), Some("open 3"));

        let event = state.handle_key(press(KeyCode::Enter));
        assert_eq!(event, InputEvent::Command("open 3".to_string()));
        assert!(state.buffer().is_none());
    }

    #[test]
    fn browse_keys_are_literal_text_in_command_mode() {
        let mut state = InputState::default();
        state.handle_key(press(KeyCode::Char(':')));
        type_line(&mut state, "qjk");
        assert_eq!(state.buffer(), Some("qjk"));
    }

    #[test]
    fn backspace_edits_and_eventually_cancels() {
        let mut state = InputState::default();
        state.handle_key(press(KeyCode::Char(':')));
        type_line(&mut state, "up");

        state.handle_key(press(KeyCode::Backspace));
        assert_eq!(state.buffer(), Some("u"));
        state.handle_key(press(KeyCode::Backspace));
        assert_eq!(state.buffer(), Some(""));
        // One more erases the prompt itself.
        state.handle_key(press(KeyCode::Backspace));
        assert!(state.buffer().is_none());
    }

    #[test]
    fn esc_abandons_the_buffer() {
        let mut state = InputState::default();
        state.handle_key(press(KeyCode::Char(':')));
        type_line(&mut state, "open gemini://x.org/");
        state.handle_key(press(KeyCode::Esc));
        assert!(state.buffer().is_none());
        // Back in browse mode.
        assert_eq!(
            state.handle_key(press(KeyCode::Char('j'))),
            InputEvent::Command("down".to_string())
        );
    }

    #[test]
    fn ctrl_c_quits_from_both_modes() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut state = InputState::default();
        assert_eq!(
            state.handle_key(ctrl_c),
            InputEvent::Command("quit".to_string())
        );

        state.handle_key(press(KeyCode::Char(':')));
        assert_eq!(
            state.handle_key(ctrl_c),
            InputEvent::Command("quit".to_string())
        );
    }
}

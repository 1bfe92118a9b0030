use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::mailbox::Poster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    /// Esc or Ctrl-C, treated like closing the window.
    Close,
}

/// Typed stand-in for the microphone. Enter posts the line to the mailbox
/// exactly as a recognized phrase would be; arrow keys post direction words.
#[derive(Debug, Default)]
pub struct Dictation {
    line: String,
}

impl Dictation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn handle(&mut self, key: KeyEvent, poster: &Poster) -> KeyAction {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return KeyAction::None;
        }
        match key.code {
            KeyCode::Esc => return KeyAction::Close,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyAction::Close
            }
            KeyCode::Char(c) => self.line.push(c),
            KeyCode::Backspace => {
                self.line.pop();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.line);
                if !line.trim().is_empty() {
                    poster.post(line.trim());
                }
            }
            KeyCode::Up => {
                poster.post("up");
            }
            KeyCode::Down => {
                poster.post("down");
            }
            KeyCode::Left => {
                poster.post("left");
            }
            KeyCode::Right => {
                poster.post("right");
            }
            _ => {}
        }
        KeyAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::Mailbox;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_posts_the_line() {
        let mailbox = Mailbox::new();
        let poster = mailbox.poster();
        let mut d = Dictation::new();
        for c in "parix".chars() {
            d.handle(press(KeyCode::Char(c)), &poster);
        }
        d.handle(press(KeyCode::Backspace), &poster);
        d.handle(press(KeyCode::Char('s')), &poster);
        assert_eq!(d.line(), "paris");
        assert_eq!(d.handle(press(KeyCode::Enter), &poster), KeyAction::None);
        assert_eq!(d.line(), "");
        assert_eq!(mailbox.take().as_deref(), Some("paris"));
    }

    #[test]
    fn blank_enter_posts_nothing() {
        let mailbox = Mailbox::new();
        let mut d = Dictation::new();
        d.handle(press(KeyCode::Char(' ')), &mailbox.poster());
        d.handle(press(KeyCode::Enter), &mailbox.poster());
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn arrows_post_directions() {
        let mailbox = Mailbox::new();
        let mut d = Dictation::new();
        d.handle(press(KeyCode::Left), &mailbox.poster());
        assert_eq!(mailbox.take().as_deref(), Some("left"));
    }

    #[test]
    fn close_keys() {
        let mailbox = Mailbox::new();
        let mut d = Dictation::new();
        assert_eq!(d.handle(press(KeyCode::Esc), &mailbox.poster()), KeyAction::Close);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(d.handle(ctrl_c, &mailbox.poster()), KeyAction::Close);
        assert_eq!(d.line(), "");
    }
}

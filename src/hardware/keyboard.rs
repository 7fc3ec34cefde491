use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, poll, read};
use std::io;
use std::time::Duration;

/// Providing Keyboard Input independent of an implementation.
pub trait KeyboardInputProvider {
    /// Checks if input is available, does not block.
    ///
    /// # Errors
    /// - reading from the input device failed
    fn check_input_available(&mut self) -> io::Result<bool>;
    /// Reads one character, blocks until one is available.
    /// Returns a character buffered by `check_input_available` first.
    ///
    /// # Errors
    /// - reading from the input device failed or was interrupted
    fn read_input_character(&mut self) -> io::Result<u16>;
}

/// Keyboard input from the terminal via crossterm key events.
///
/// Expects the terminal to be in raw mode, see [`crate::terminal::set_terminal_raw`].
/// CTRL-C is reported as [`io::ErrorKind::Interrupted`].
#[derive(Debug, Default)]
pub struct TerminalInputProvider {
    available_char: Option<u16>,
}

impl TerminalInputProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            available_char: None,
        }
    }

    fn character_of(event: &KeyEvent) -> io::Result<Option<u16>> {
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "Interrupted by CTRL-C",
            ));
        }
        let c = match event.code {
            KeyCode::Enter => Some('\n'),
            KeyCode::Tab => Some('\t'),
            KeyCode::Backspace => Some('\u{8}'),
            KeyCode::Esc => Some('\u{1b}'),
            code => code.as_char(),
        };
        // LC-3 programs work on ASCII, wider characters do not fit the data register
        Ok(c
            .filter(char::is_ascii)
            .and_then(|c| u8::try_from(c).ok())
            .map(u16::from))
    }

    fn next_key_press(timeout: Option<Duration>) -> io::Result<Option<u16>> {
        loop {
            if let Some(timeout) = timeout
                && !poll(timeout)?
            {
                return Ok(None);
            }
            if let Some(event) = read()?.as_key_press_event()
                && let Some(c) = Self::character_of(&event)?
            {
                return Ok(Some(c));
            }
            if timeout.is_some() {
                return Ok(None);
            }
        }
    }
}

impl KeyboardInputProvider for TerminalInputProvider {
    fn check_input_available(&mut self) -> io::Result<bool> {
        if self.available_char.is_none() {
            self.available_char = Self::next_key_press(Some(Duration::ZERO))?;
        }
        Ok(self.available_char.is_some())
    }
    fn read_input_character(&mut self) -> io::Result<u16> {
        if let Some(c) = self.available_char.take() {
            return Ok(c);
        }
        Self::next_key_press(None)?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "No input available"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use yare::parameterized;

    #[parameterized(
        letter = { KeyCode::Char('a'), Some(u16::from(b'a')) },
        enter = { KeyCode::Enter, Some(0x0A) },
        escape = { KeyCode::Esc, Some(0x1B) },
        non_ascii = { KeyCode::Char('ü'), None },
        function_key = { KeyCode::F(1), None },
    )]
    fn test_character_of_key_press(code: KeyCode, expected: Option<u16>) {
        let event = KeyEvent::new(code, KeyModifiers::NONE);
        assert_that!(
            TerminalInputProvider::character_of(&event).unwrap(),
            eq(expected)
        );
    }
    #[gtest]
    pub fn test_character_of_ctrl_c_interrupts() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let error = TerminalInputProvider::character_of(&event).unwrap_err();
        expect_that!(error.kind(), eq(io::ErrorKind::Interrupted));
    }
}

//! Console plumbing for running programs interactively.
use crossterm::terminal;
use std::io;
use std::io::Write;

/// Restores the terminal from raw mode when dropped.
pub struct RawLock {}

impl Drop for RawLock {
    fn drop(&mut self) {
        // terminal stays in raw mode but no means to repair
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Error resetting terminal {e}");
        }
    }
}

/// Set terminal to raw in best-effort mode, only log on failure, since it does not work
/// without a tty (e.g. piped input or doc tests).
#[must_use]
pub fn set_terminal_raw() -> RawLock {
    if let Err(e) = terminal::enable_raw_mode() {
        log::warn!("Could not set terminal to raw mode: {e}");
    }
    RawLock {}
}

/// Output for a terminal in raw mode, where a line feed does not return the cursor
/// to the first column.
pub struct ConsoleOutput<W: Write> {
    inner: W,
}

impl<W: Write> ConsoleOutput<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for ConsoleOutput<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (idx, part) in buf.split(|b| *b == b'\n').enumerate() {
            if idx > 0 {
                self.inner.write_all(b"\r\n")?;
            }
            self.inner.write_all(part)?;
        }
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_console_output_translates_line_feeds() {
        let mut output = ConsoleOutput::new(Vec::new());
        write!(output, "one\ntwo\n\nthree").unwrap();
        expect_that!(output.inner, eq(&b"one\r\ntwo\r\n\r\nthree".to_vec()));
    }
}

//! Raw-mode terminal key source for the control thread.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Write};
use std::time::Duration;
use voxframe_core::{KeySource, QUIT_KEY};

/// Keyboard input without line buffering or echo.
///
/// Raw mode is entered in [`TerminalKeys::new`] and left again when the
/// value is dropped, including when the control thread exits on an error.
pub struct TerminalKeys {
    _raw: RawModeGuard,
}

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl TerminalKeys {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _raw: RawModeGuard })
    }
}

impl KeySource for TerminalKeys {
    /// Drain pending events until a key press maps to a character.
    fn read_key(&mut self) -> io::Result<Option<char>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(c) = key_char(key) {
                    return Ok(Some(c));
                }
            }
        }
        Ok(None)
    }
}

/// Character for a key event. Raw mode swallows Ctrl-C, so it and Esc map
/// to the quit key.
pub fn key_char(key: KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(QUIT_KEY),
        KeyCode::Char(c) => Some(c),
        KeyCode::Esc => Some(QUIT_KEY),
        _ => None,
    }
}

/// Stderr for log output that stays line-aligned while raw mode is on.
///
/// Raw mode disables output post-processing, so a bare `\n` no longer
/// returns the cursor. Each writer checks the mode when created, which is
/// once per log event for `tracing_subscriber`.
pub struct LogWriter {
    inner: io::Stderr,
    raw: bool,
}

impl LogWriter {
    pub fn new() -> Self {
        Self {
            inner: io::stderr(),
            raw: terminal::is_raw_mode_enabled().unwrap_or(false),
        }
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.raw {
            write_crlf(&mut self.inner, buf)?;
            Ok(buf.len())
        } else {
            self.inner.write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn write_crlf<W: Write>(out: &mut W, buf: &[u8]) -> io::Result<()> {
    for (i, line) in buf.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            out.write_all(b"\r\n")?;
        }
        out.write_all(line)?;
    }
    Ok(())
}

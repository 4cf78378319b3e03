// SPDX-License-Identifier: MIT
//
// ANSI backend — escape sequences out, raw bytes in.
//
// Everything visual is an escape sequence on the output stream. The tty
// seam supplies the window size and the line-discipline toggle for key
// capture. There is no way to read the cursor back, so `position` always
// reports the origin.
//
// Clearing does not use ED. It walks every cell of the reported viewport,
// column by column, moving to each cell and writing a space, then homes the
// cursor. The whole sweep goes into one buffer and one write.

use std::io::{self, Write};
use std::time::Duration;

use crate::ansi;
use crate::backend::{Position, Size, TerminalBackend};
use crate::color::Color;
use crate::options::PauseStrategy;
use crate::tty::{RawModeGuard, Tty};

/// Escape-sequence backend over a tty and an output stream.
pub struct AnsiBackend<T, W> {
    tty: T,
    out: W,
    pause: PauseStrategy,
}

impl<T: Tty, W: Write> AnsiBackend<T, W> {
    /// Create a backend writing to `out`, with the default pause strategy.
    pub fn new(tty: T, out: W) -> Self {
        Self {
            tty,
            out,
            pause: PauseStrategy::default(),
        }
    }

    /// Use `pause` for timed waits.
    #[must_use]
    pub fn with_pause(mut self, pause: PauseStrategy) -> Self {
        self.pause = pause;
        self
    }

    /// The tty primitives.
    pub const fn tty(&self) -> &T {
        &self.tty
    }

    /// The output stream.
    pub const fn output(&self) -> &W {
        &self.out
    }

    /// Mutable access to the output stream.
    pub const fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) -> io::Result<()> {
        f(&mut self.out)?;
        self.out.flush()
    }
}

#[cfg(unix)]
impl AnsiBackend<crate::tty::StdTty, io::Stdout> {
    /// The process's controlling terminal on stdin/stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(crate::tty::StdTty, io::stdout())
    }
}

impl<T: Tty, W: Write> TerminalBackend for AnsiBackend<T, W> {
    fn dimensions(&mut self) -> io::Result<Size> {
        self.tty.window_size()
    }

    fn clear(&mut self) -> io::Result<()> {
        let size = self.tty.window_size()?;
        let mut buf = Vec::with_capacity(size.area() as usize * 8);
        for x in 0..size.cols {
            for y in 0..size.rows {
                ansi::cursor_to(&mut buf, x, y)?;
                buf.push(b' ');
            }
        }
        ansi::cursor_to(&mut buf, 0, 0)?;
        self.emit(|out| out.write_all(&buf))
    }

    fn goto(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.emit(|out| ansi::cursor_to(out, x, y))
    }

    fn position(&mut self) -> io::Result<Position> {
        Ok(Position::ORIGIN)
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        self.emit(|out| ansi::fg(out, color))
    }

    fn set_background(&mut self, color: Color) -> io::Result<()> {
        self.emit(|out| ansi::bg(out, color))
    }

    fn show_cursor(&mut self, visible: bool) -> io::Result<()> {
        self.emit(|out| {
            if visible {
                ansi::cursor_show(out)
            } else {
                ansi::cursor_hide(out)
            }
        })
    }

    fn wait_key(&mut self, prompt: &str) -> io::Result<u32> {
        if !prompt.is_empty() {
            self.emit(|out| out.write_all(prompt.as_bytes()))?;
        }

        let guard = RawModeGuard::enter(&self.tty)?;
        let byte = self.tty.read_byte();
        guard.finish()?;

        byte.map(u32::from)
    }

    fn pause(&mut self, duration: Duration) {
        self.pause.wait(duration);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

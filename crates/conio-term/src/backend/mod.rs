// SPDX-License-Identifier: MIT
//
// Backends — one operation set, two platform families.
//
// `TerminalBackend` is the capability interface. `AnsiBackend` speaks escape
// sequences over a tty; `ConsoleBackend` drives the native console API. The
// pair is chosen by compilation target through `PlatformBackend`, never at
// runtime. Both are generic over the platform primitives they call (`Tty`,
// `ConsoleApi`), so each compiles on every host and is tested with fakes.
//
// Backend methods report platform failures as `io::Error`. Turning those
// into the layer's fail-soft behavior is the `Terminal` facade's job.

pub mod ansi;
pub mod console;

use std::io;
use std::thread;
use std::time::Duration;

use crate::color::Color;

pub use self::ansi::AnsiBackend;
pub use self::console::ConsoleBackend;

// ─── Geometry ────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }
}

/// A zero-based cursor coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    /// The home position, `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

// ─── Capability Interface ────────────────────────────────────────────────────

/// The terminal operation set every backend provides.
pub trait TerminalBackend {
    /// Current viewport size, queried live.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the size query fails.
    fn dimensions(&mut self) -> io::Result<Size>;

    /// Erase every visible cell and home the cursor to `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns the first failing write or console call.
    fn clear(&mut self) -> io::Result<()>;

    /// Move the cursor to column `x`, row `y`. No bounds checking.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the move fails.
    fn goto(&mut self, x: u16, y: u16) -> io::Result<()>;

    /// Current cursor position, where the backend can read it back.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the query fails.
    fn position(&mut self) -> io::Result<Position>;

    /// Set the foreground channel. [`Color::RESET`] restores its default.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the attribute cannot be changed.
    fn set_foreground(&mut self, color: Color) -> io::Result<()>;

    /// Set the background channel. [`Color::RESET`] restores its default.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the attribute cannot be changed.
    fn set_background(&mut self, color: Color) -> io::Result<()>;

    /// Set the foreground, and the background too when `bg` is `Some`.
    ///
    /// # Errors
    ///
    /// Returns the first failing channel update.
    fn set_colors(&mut self, fg: Color, bg: Option<Color>) -> io::Result<()> {
        self.set_foreground(fg)?;
        if let Some(bg) = bg {
            self.set_background(bg)?;
        }
        Ok(())
    }

    /// Show or hide the cursor glyph.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the cursor state cannot be set.
    fn show_cursor(&mut self, visible: bool) -> io::Result<()>;

    /// Print `prompt`, then block until one key is pressed and return its code.
    ///
    /// Any input mode changed to capture the key is restored before this
    /// returns, on success and on failure alike.
    ///
    /// # Errors
    ///
    /// Returns an error if raw input cannot be established, the read fails,
    /// input reaches end of file, or the original mode cannot be restored.
    fn wait_key(&mut self, prompt: &str) -> io::Result<u32>;

    /// Suspend the calling thread for roughly `duration`.
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

// ─── Platform Selection ──────────────────────────────────────────────────────

/// The backend for the compilation target, bound to the process's stdio.
#[cfg(unix)]
pub type PlatformBackend = AnsiBackend<crate::tty::StdTty, io::Stdout>;

/// The backend for the compilation target, bound to the process's stdio.
#[cfg(windows)]
pub type PlatformBackend = ConsoleBackend<crate::wincon::StdConsole>;

// ─── Tests ───────────────────────────────────────────────────────────────────

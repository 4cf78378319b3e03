// SPDX-License-Identifier: MIT
//
// Terminal — the public face of the layer.
//
// `Terminal<B>` wraps one backend and turns its fallible operations into the
// layer's fail-soft contract: queries return a best-effort value, commands
// swallow errors, and the key wait reports "no input" as `None`. Nothing is
// lost silently, though. Every swallowed error goes to `log::debug!`, so
// `RUST_LOG=conio_term=debug` shows exactly which platform call failed.
//
// The backend is an explicit value rather than a global, so tests hand in a
// fake and a program can hold more than one wrapper if it wants to, even
// though they all end up talking to the same process-wide terminal.

use std::io;
use std::time::Duration;

use crate::backend::{Position, Size, TerminalBackend};
use crate::color::Color;

#[cfg(any(unix, windows))]
use crate::backend::PlatformBackend;
#[cfg(any(unix, windows))]
use crate::error::Error;
#[cfg(any(unix, windows))]
use crate::options::Options;

/// Fail-soft terminal control over a backend.
///
/// # Example
///
/// ```no_run
/// use conio_term::{Color, Terminal};
///
/// let mut term = Terminal::stdout()?;
/// term.clear();
/// term.set_colors(Color::BRIGHT_WHITE, Some(Color::BLUE));
/// term.goto(2, 1);
/// print!("hello");
/// term.set_colors(Color::RESET, Some(Color::RESET));
/// let key = term.wait_key("press a key");
/// # let _ = key;
/// # Ok::<(), conio_term::Error>(())
/// ```
pub struct Terminal<B> {
    backend: B,
    /// Last cursor position successfully read back.
    last_position: Position,
}

fn soft(op: &str, result: io::Result<()>) {
    if let Err(err) = result {
        log::debug!("{op} failed: {err}");
    }
}

impl<B: TerminalBackend> Terminal<B> {
    /// Wrap a backend.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            last_position: Position::ORIGIN,
        }
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the wrapped backend, for error-reporting calls.
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Unwrap the backend.
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Current `(cols, rows)` of the viewport, re-queried on every call.
    ///
    /// Returns `0 × 0` if the size cannot be read.
    pub fn dimensions(&mut self) -> Size {
        self.backend.dimensions().unwrap_or_else(|err| {
            log::debug!("dimensions failed: {err}");
            Size::default()
        })
    }

    /// Erase the screen and home the cursor.
    pub fn clear(&mut self) {
        soft("clear", self.backend.clear());
    }

    /// Move the cursor to column `x`, row `y`.
    pub fn goto(&mut self, x: u16, y: u16) {
        soft("goto", self.backend.goto(x, y));
    }

    /// Current cursor position.
    ///
    /// If the backend cannot answer, the last position it did report is
    /// returned unchanged (the origin before any successful read). ANSI
    /// terminals always report the origin.
    pub fn position(&mut self) -> Position {
        match self.backend.position() {
            Ok(p) => self.last_position = p,
            Err(err) => log::debug!("position failed: {err}"),
        }
        self.last_position
    }

    /// Set the text color. [`Color::RESET`] restores the default.
    pub fn set_foreground(&mut self, color: Color) {
        soft("set_foreground", self.backend.set_foreground(color));
    }

    /// Set the highlight color. [`Color::RESET`] restores the default.
    pub fn set_background(&mut self, color: Color) {
        soft("set_background", self.backend.set_background(color));
    }

    /// Set the foreground, and the background when `bg` is `Some`.
    pub fn set_colors(&mut self, fg: Color, bg: Option<Color>) {
        soft("set_colors", self.backend.set_colors(fg, bg));
    }

    /// Show or hide the cursor.
    pub fn show_cursor(&mut self, visible: bool) {
        soft("show_cursor", self.backend.show_cursor(visible));
    }

    /// Print `prompt` (may be empty), block for one key, and return its code.
    ///
    /// Returns `None` when no key could be read: raw input could not be
    /// established, the read failed, or input is at end of file. The
    /// terminal's input mode is restored first in every case.
    pub fn wait_key(&mut self, prompt: &str) -> Option<u32> {
        match self.backend.wait_key(prompt) {
            Ok(key) => Some(key),
            Err(err) => {
                log::debug!("wait_key failed: {err}");
                None
            }
        }
    }

    /// Suspend the calling thread for about `millis` milliseconds.
    pub fn pause(&mut self, millis: u64) {
        self.backend.pause(Duration::from_millis(millis));
    }
}

#[cfg(unix)]
impl Terminal<PlatformBackend> {
    /// The process's terminal with default [`Options`].
    ///
    /// # Errors
    ///
    /// Currently infallible on Unix, but returns `Result` to match the
    /// console build, where attaching to the console can fail.
    pub fn stdout() -> Result<Self, Error> {
        Self::with_options(Options::default())
    }

    /// The process's terminal with the given options.
    ///
    /// # Errors
    ///
    /// See [`stdout`](Self::stdout).
    #[allow(clippy::unnecessary_wraps)]
    pub fn with_options(options: Options) -> Result<Self, Error> {
        Ok(Self::new(PlatformBackend::stdio().with_pause(options.pause)))
    }

    /// The process's terminal with options read from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] for a malformed `CONIO_PAUSE`.
    pub fn from_env() -> Result<Self, Error> {
        Self::with_options(Options::from_env()?)
    }
}

#[cfg(windows)]
impl Terminal<PlatformBackend> {
    /// The process's console with default [`Options`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotATerminal`] if no console is attached to stdout.
    pub fn stdout() -> Result<Self, Error> {
        Self::with_options(Options::default())
    }

    /// The process's console. The native console always sleeps to pause,
    /// so the pause strategy is not consulted.
    ///
    /// # Errors
    ///
    /// See [`stdout`](Self::stdout).
    pub fn with_options(options: Options) -> Result<Self, Error> {
        log::trace!("console backend ignores {options:?}");
        Ok(Self::new(PlatformBackend::stdio()?))
    }

    /// The process's console with options read from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] for a malformed `CONIO_PAUSE`, or
    /// any error from [`stdout`](Self::stdout).
    pub fn from_env() -> Result<Self, Error> {
        Self::with_options(Options::from_env()?)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AnsiBackend, ConsoleBackend};
    use crate::color::{ansi, console};
    use crate::tty::tests::{FakeMode, FakeTty};
    use crate::wincon::tests::FakeConsole;
    use crate::wincon::{Attributes, InputEvent};
    use pretty_assertions::assert_eq;
    use std::time::Instant;

    /// Backend whose every call fails, to pin down the fail-soft contract.
    #[derive(Default)]
    struct Broken {
        calls: usize,
    }

    impl Broken {
        fn fail(&mut self) -> io::Error {
            self.calls += 1;
            io::Error::other("broken")
        }
    }

    impl TerminalBackend for Broken {
        fn dimensions(&mut self) -> io::Result<Size> {
            Err(self.fail())
        }
        fn clear(&mut self) -> io::Result<()> {
            Err(self.fail())
        }
        fn goto(&mut self, _x: u16, _y: u16) -> io::Result<()> {
            Err(self.fail())
        }
        fn position(&mut self) -> io::Result<Position> {
            Err(self.fail())
        }
        fn set_foreground(&mut self, _color: Color) -> io::Result<()> {
            Err(self.fail())
        }
        fn set_background(&mut self, _color: Color) -> io::Result<()> {
            Err(self.fail())
        }
        fn show_cursor(&mut self, _visible: bool) -> io::Result<()> {
            Err(self.fail())
        }
        fn wait_key(&mut self, _prompt: &str) -> io::Result<u32> {
            Err(self.fail())
        }
    }

    fn ansi_term(tty: FakeTty) -> Terminal<AnsiBackend<FakeTty, Vec<u8>>> {
        Terminal::new(AnsiBackend::new(tty, Vec::new()))
    }

    fn console_term(cols: u16, rows: u16) -> Terminal<ConsoleBackend<FakeConsole>> {
        Terminal::new(ConsoleBackend::new(FakeConsole::new(cols, rows)))
    }

    // ── Fail-soft ───────────────────────────────────────────────────────

    #[test]
    fn failed_queries_return_defaults() {
        let mut term = Terminal::new(Broken::default());
        assert_eq!(term.dimensions(), Size::default());
        assert_eq!(term.position(), Position::ORIGIN);
        assert_eq!(term.wait_key("?"), None);
    }

    #[test]
    fn failed_commands_do_nothing_visible() {
        let mut term = Terminal::new(Broken::default());
        term.clear();
        term.goto(1, 1);
        term.set_foreground(Color::RED);
        term.set_background(Color::RED);
        term.set_colors(Color::RED, Some(Color::BLUE));
        term.show_cursor(false);
        term.pause(0);
        // set_colors stops at the failing foreground.
        assert_eq!(term.backend().calls, 6);
    }

    #[test]
    fn failed_position_keeps_last_known_value() {
        let mut term = console_term(80, 24);
        term.goto(7, 9);
        assert_eq!(term.position(), Position::new(7, 9));
        term.backend().api().fail_info.set(true);
        term.goto(1, 1);
        assert_eq!(term.position(), Position::new(7, 9));
    }

    // ── Dimensions ──────────────────────────────────────────────────────

    #[test]
    fn both_backends_report_80_by_24() {
        let mut ansi = ansi_term(FakeTty::new(80, 24));
        let mut native = console_term(80, 24);
        assert_eq!(ansi.dimensions(), Size { cols: 80, rows: 24 });
        assert_eq!(native.dimensions(), Size { cols: 80, rows: 24 });
    }

    #[test]
    fn dimensions_are_read_live() {
        let mut term = console_term(80, 24);
        assert_eq!(term.dimensions(), Size { cols: 80, rows: 24 });
        let mut info = term.backend().api().info.get();
        info.window.right = 99;
        term.backend().api().info.set(info);
        assert_eq!(term.dimensions(), Size { cols: 100, rows: 24 });
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn native_goto_then_position_round_trips_within_dimensions() {
        let mut term = console_term(20, 10);
        let size = term.dimensions();
        for y in 0..size.rows {
            for x in 0..size.cols {
                term.goto(x, y);
                assert_eq!(term.position(), Position::new(x, y));
            }
        }
    }

    #[test]
    fn ansi_position_is_origin() {
        let mut term = ansi_term(FakeTty::new(80, 24));
        term.goto(3, 4);
        assert_eq!(term.position(), Position::ORIGIN);
    }

    #[test]
    fn hiding_then_showing_matches_never_hidden() {
        let mut shown = console_term(80, 24);
        shown.show_cursor(true);

        let mut toggled = console_term(80, 24);
        toggled.show_cursor(false);
        toggled.show_cursor(true);

        assert_eq!(
            toggled.backend().api().cursor_info.get(),
            shown.backend().api().cursor_info.get()
        );
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn ansi_set_colors_without_background_never_emits_background() {
        for raw in 0..16 {
            let mut term = ansi_term(FakeTty::new(80, 24));
            term.set_colors(Color::from_raw(raw), None);
            let out = String::from_utf8(term.backend().output().clone()).unwrap();
            assert!(!out.contains(";4") && !out.contains("49m"), "{out:?}");
        }
    }

    #[test]
    fn ansi_palette_names_render_expected_codes() {
        let mut term = ansi_term(FakeTty::new(80, 24));
        term.set_foreground(ansi::RED);
        term.set_background(ansi::BLUE);
        let out = String::from_utf8(term.backend().output().clone()).unwrap();
        assert_eq!(out, "\x1b[2;31m\x1b[1;44m");
    }

    #[test]
    fn native_red_then_reset_keeps_background() {
        let mut term = console_term(80, 24);
        term.set_background(console::CYAN);
        let before = term.backend().api().attributes() & Attributes::BACKGROUND;
        term.set_foreground(console::RED);
        term.set_foreground(Color::RESET);
        let after = term.backend().api().attributes() & Attributes::BACKGROUND;
        assert_eq!(after, before);
    }

    // ── Key wait ────────────────────────────────────────────────────────

    #[test]
    fn ansi_wait_key_returns_byte() {
        let mut term = ansi_term(FakeTty::new(80, 24).with_input(b"\x1b"));
        assert_eq!(term.wait_key(""), Some(0x1B));
    }

    #[test]
    fn ansi_wait_key_failure_is_none_and_restores_mode() {
        let mut term = ansi_term(FakeTty::new(80, 24).with_read_error(io::ErrorKind::Other));
        assert_eq!(term.wait_key(""), None);
        assert_eq!(term.backend().tty().mode.get(), FakeMode::COOKED);
    }

    #[test]
    fn ansi_wait_key_without_tty_is_none() {
        let mut tty = FakeTty::new(80, 24).with_input(b"a");
        tty.fail_get = true;
        let mut term = ansi_term(tty);
        assert_eq!(term.wait_key(""), None);
    }

    #[test]
    fn native_wait_key_returns_virtual_key() {
        let mut term = console_term(80, 24);
        term.backend().api().push_event(InputEvent::Key {
            key_down: false,
            virtual_key: 0x1B,
        });
        assert_eq!(term.wait_key("Esc?"), Some(0x1B));
    }

    // ── Pause ───────────────────────────────────────────────────────────

    #[test]
    fn pause_zero_returns_promptly_on_both_backends() {
        let start = Instant::now();
        ansi_term(FakeTty::new(80, 24)).pause(0);
        console_term(80, 24).pause(0);
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn pause_waits_roughly_the_requested_time() {
        let mut term = ansi_term(FakeTty::new(80, 24));
        let start = Instant::now();
        term.pause(10);
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}

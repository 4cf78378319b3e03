// SPDX-License-Identifier: MIT
//
// Native console primitives — buffer info, attributes, fills, cursor info,
// input mode, and input events.
//
// `ConsoleApi` is the seam between the console backend and the host console
// subsystem. The types here are plain Rust mirrors of the pieces of console
// state the backend reads; `StdConsole` (Windows only) fills them from the
// real API through `winapi`.
//
// `ConsoleModeGuard` plays the same role as the tty raw-mode guard: the
// original input mode comes back on `finish()` or on drop.
//
// Safety: `StdConsole` calls the Win32 console functions, which are `unsafe`
// FFI. Each call passes a handle obtained from `GetStdHandle` and pointers to
// locals that live for the duration of the call.
#![cfg_attr(windows, allow(unsafe_code))]

use std::io;

use crate::backend::{Position, Size};

// ─── Attributes ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// A console character attribute word.
    ///
    /// The low byte holds two nibbles, foreground in bits 0-3 and background
    /// in bits 4-7, each laid out as blue, green, red, intensity. Higher bits
    /// (grid lines, reverse video) are carried through untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attributes: u16 {
        const FOREGROUND_BLUE      = 0x0001;
        const FOREGROUND_GREEN     = 0x0002;
        const FOREGROUND_RED       = 0x0004;
        const FOREGROUND_INTENSITY = 0x0008;
        const BACKGROUND_BLUE      = 0x0010;
        const BACKGROUND_GREEN     = 0x0020;
        const BACKGROUND_RED       = 0x0040;
        const BACKGROUND_INTENSITY = 0x0080;

        const _ = !0;
    }
}

impl Attributes {
    /// All foreground bits.
    pub const FOREGROUND: Self = Self::from_bits_retain(0x000F);

    /// All background bits.
    pub const BACKGROUND: Self = Self::from_bits_retain(0x00F0);

    /// The attribute a channel reset falls back to: bright white on black.
    pub const DEFAULT: Self = Self::from_bits_retain(
        Self::FOREGROUND_RED.bits()
            | Self::FOREGROUND_GREEN.bits()
            | Self::FOREGROUND_BLUE.bits()
            | Self::FOREGROUND_INTENSITY.bits(),
    );

    /// The foreground nibble, 0-15.
    #[must_use]
    pub const fn foreground(self) -> u8 {
        (self.bits() & 0x000F) as u8
    }

    /// The background nibble, 0-15.
    #[must_use]
    pub const fn background(self) -> u8 {
        ((self.bits() & 0x00F0) >> 4) as u8
    }

    /// Replace the foreground nibble, keeping every other bit.
    #[must_use]
    pub const fn with_foreground(self, nibble: u8) -> Self {
        Self::from_bits_retain((self.bits() & !0x000F) | (nibble as u16 & 0x000F))
    }

    /// Replace the background nibble, keeping every other bit.
    #[must_use]
    pub const fn with_background(self, nibble: u8) -> Self {
        Self::from_bits_retain((self.bits() & !0x00F0) | ((nibble as u16 & 0x000F) << 4))
    }
}

// ─── Input Mode ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Console input mode flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct InputMode: u32 {
        const PROCESSED_INPUT = 0x0001;
        const LINE_INPUT      = 0x0002;
        const ECHO_INPUT      = 0x0004;
        const WINDOW_INPUT    = 0x0008;
        const MOUSE_INPUT     = 0x0010;

        const _ = !0;
    }
}

impl InputMode {
    /// Key capture: no echo, no line buffering, no window or mouse events.
    pub const KEY_CAPTURE: Self = Self::empty();
}

// ─── Buffer Info ─────────────────────────────────────────────────────────────

/// The visible window within the screen buffer, as inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl Window {
    /// Cell count spanned by the inclusive edges. Inverted edges give zero.
    #[must_use]
    pub fn size(self) -> Size {
        let span = |lo: i16, hi: i16| -> u16 {
            u16::try_from(i32::from(hi) - i32::from(lo) + 1).unwrap_or(0)
        };
        Size {
            cols: span(self.left, self.right),
            rows: span(self.top, self.bottom),
        }
    }
}

/// A snapshot of screen-buffer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenBufferInfo {
    /// Full buffer size, including scrollback.
    pub size: Size,
    pub cursor: Position,
    pub attributes: Attributes,
    pub window: Window,
}

// ─── Input Events ────────────────────────────────────────────────────────────

/// One record from the console input queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key transition.
    Key { key_down: bool, virtual_key: u16 },
    /// Mouse, focus, resize, or menu events.
    Other,
}

// ─── ConsoleApi ──────────────────────────────────────────────────────────────

/// The console primitives the native backend needs.
///
/// All methods report a failed platform call as an `io::Error`.
#[allow(clippy::missing_errors_doc)]
pub trait ConsoleApi {
    fn screen_buffer_info(&self) -> io::Result<ScreenBufferInfo>;

    fn set_text_attribute(&self, attributes: Attributes) -> io::Result<()>;

    /// Write `ch` into `len` consecutive cells starting at `origin`.
    fn fill_character(&self, ch: u8, len: u32, origin: Position) -> io::Result<()>;

    /// Write `attributes` into `len` consecutive cells starting at `origin`.
    fn fill_attribute(&self, attributes: Attributes, len: u32, origin: Position)
    -> io::Result<()>;

    fn set_cursor_position(&self, position: Position) -> io::Result<()>;

    /// Set the cursor size (percent of the cell, 1-100) and visibility.
    fn set_cursor_info(&self, size: u32, visible: bool) -> io::Result<()>;

    fn input_mode(&self) -> io::Result<InputMode>;

    fn set_input_mode(&self, mode: InputMode) -> io::Result<()>;

    /// Write text straight to the console output.
    fn write_text(&self, text: &str) -> io::Result<()>;

    /// Discard any input events already queued.
    fn flush_input(&self) -> io::Result<()>;

    /// Block until one input event is available and return it.
    fn read_input(&self) -> io::Result<InputEvent>;
}

// ─── Console Mode Guard ──────────────────────────────────────────────────────

/// Saved console input mode, restored when the guard finishes or drops.
pub struct ConsoleModeGuard<'a, C: ConsoleApi> {
    api: &'a C,
    saved: Option<InputMode>,
}

impl<'a, C: ConsoleApi> ConsoleModeGuard<'a, C> {
    /// Save the input mode and switch to [`InputMode::KEY_CAPTURE`].
    ///
    /// # Errors
    ///
    /// Returns the error from reading or setting the mode; nothing is
    /// changed in that case.
    pub fn enter(api: &'a C) -> io::Result<Self> {
        let saved = api.input_mode()?;
        api.set_input_mode(InputMode::KEY_CAPTURE)?;
        log::trace!("console: input mode {saved:?} -> key capture");
        Ok(Self {
            api,
            saved: Some(saved),
        })
    }

    /// Restore the saved mode, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns the error from re-applying the saved mode.
    pub fn finish(mut self) -> io::Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> io::Result<()> {
        match self.saved.take() {
            Some(saved) => self.api.set_input_mode(saved),
            None => Ok(()),
        }
    }
}

impl<C: ConsoleApi> Drop for ConsoleModeGuard<'_, C> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::debug!("console: failed to restore input mode: {err}");
        }
    }
}

// ─── StdConsole ──────────────────────────────────────────────────────────────

#[cfg(windows)]
pub use self::std_console::StdConsole;

#[cfg(windows)]
mod std_console {
    use std::io;
    use std::ptr;

    use winapi::shared::minwindef::{DWORD, FALSE, TRUE};
    use winapi::um::consoleapi::{GetConsoleMode, ReadConsoleInputW, SetConsoleMode, WriteConsoleW};
    use winapi::um::handleapi::INVALID_HANDLE_VALUE;
    use winapi::um::processenv::GetStdHandle;
    use winapi::um::winbase::{STD_INPUT_HANDLE, STD_OUTPUT_HANDLE};
    use winapi::um::wincon::{
        CONSOLE_CURSOR_INFO, CONSOLE_SCREEN_BUFFER_INFO, FillConsoleOutputAttribute,
        FillConsoleOutputCharacterA, FlushConsoleInputBuffer, GetConsoleScreenBufferInfo,
        SetConsoleCursorInfo, SetConsoleCursorPosition, SetConsoleTextAttribute,
    };
    use winapi::um::wincontypes::{COORD, INPUT_RECORD, KEY_EVENT};
    use winapi::um::winnt::HANDLE;

    use super::{Attributes, ConsoleApi, InputEvent, InputMode, ScreenBufferInfo, Window};
    use crate::backend::{Position, Size};
    use crate::error::Error;

    /// The process's console: output on stdout, input on stdin.
    #[derive(Debug)]
    pub struct StdConsole {
        output: HANDLE,
        input: HANDLE,
    }

    fn check(ok: i32) -> io::Result<()> {
        if ok == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    #[allow(clippy::cast_possible_wrap)] // Console coordinates fit in i16.
    const fn coord(p: Position) -> COORD {
        COORD {
            X: p.x as i16,
            Y: p.y as i16,
        }
    }

    impl StdConsole {
        /// Acquire the standard handles.
        ///
        /// # Errors
        ///
        /// Returns [`Error::NotATerminal`] if no console is attached to
        /// stdout, or [`Error::Io`] if the handle lookup itself fails.
        pub fn new() -> Result<Self, Error> {
            let output = unsafe { GetStdHandle(STD_OUTPUT_HANDLE) };
            if output == INVALID_HANDLE_VALUE {
                return Err(io::Error::last_os_error().into());
            }
            if output.is_null() {
                return Err(Error::NotATerminal);
            }
            let input = unsafe { GetStdHandle(STD_INPUT_HANDLE) };
            Ok(Self { output, input })
        }

        fn input_handle(&self) -> io::Result<HANDLE> {
            if self.input == INVALID_HANDLE_VALUE || self.input.is_null() {
                Err(io::Error::new(io::ErrorKind::NotFound, "no console input handle"))
            } else {
                Ok(self.input)
            }
        }
    }

    impl ConsoleApi for StdConsole {
        #[allow(clippy::cast_sign_loss)]
        fn screen_buffer_info(&self) -> io::Result<ScreenBufferInfo> {
            let mut csbi: CONSOLE_SCREEN_BUFFER_INFO = unsafe { std::mem::zeroed() };
            check(unsafe { GetConsoleScreenBufferInfo(self.output, &mut csbi) })?;
            Ok(ScreenBufferInfo {
                size: Size {
                    cols: csbi.dwSize.X.max(0) as u16,
                    rows: csbi.dwSize.Y.max(0) as u16,
                },
                cursor: Position {
                    x: csbi.dwCursorPosition.X.max(0) as u16,
                    y: csbi.dwCursorPosition.Y.max(0) as u16,
                },
                attributes: Attributes::from_bits_retain(csbi.wAttributes),
                window: Window {
                    left: csbi.srWindow.Left,
                    top: csbi.srWindow.Top,
                    right: csbi.srWindow.Right,
                    bottom: csbi.srWindow.Bottom,
                },
            })
        }

        fn set_text_attribute(&self, attributes: Attributes) -> io::Result<()> {
            check(unsafe { SetConsoleTextAttribute(self.output, attributes.bits()) })
        }

        fn fill_character(&self, ch: u8, len: u32, origin: Position) -> io::Result<()> {
            let mut written: DWORD = 0;
            check(unsafe {
                FillConsoleOutputCharacterA(
                    self.output,
                    ch as i8,
                    len,
                    coord(origin),
                    &mut written,
                )
            })
        }

        fn fill_attribute(
            &self,
            attributes: Attributes,
            len: u32,
            origin: Position,
        ) -> io::Result<()> {
            let mut written: DWORD = 0;
            check(unsafe {
                FillConsoleOutputAttribute(
                    self.output,
                    attributes.bits(),
                    len,
                    coord(origin),
                    &mut written,
                )
            })
        }

        fn set_cursor_position(&self, position: Position) -> io::Result<()> {
            check(unsafe { SetConsoleCursorPosition(self.output, coord(position)) })
        }

        fn set_cursor_info(&self, size: u32, visible: bool) -> io::Result<()> {
            let info = CONSOLE_CURSOR_INFO {
                dwSize: size,
                bVisible: if visible { TRUE } else { FALSE },
            };
            check(unsafe { SetConsoleCursorInfo(self.output, &info) })
        }

        fn input_mode(&self) -> io::Result<InputMode> {
            let input = self.input_handle()?;
            let mut mode: DWORD = 0;
            check(unsafe { GetConsoleMode(input, &mut mode) })?;
            Ok(InputMode::from_bits_retain(mode))
        }

        fn set_input_mode(&self, mode: InputMode) -> io::Result<()> {
            let input = self.input_handle()?;
            check(unsafe { SetConsoleMode(input, mode.bits()) })
        }

        fn write_text(&self, text: &str) -> io::Result<()> {
            let wide: Vec<u16> = text.encode_utf16().collect();
            let mut written: DWORD = 0;
            let len = DWORD::try_from(wide.len())
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "prompt too long"))?;
            check(unsafe {
                WriteConsoleW(
                    self.output,
                    wide.as_ptr().cast(),
                    len,
                    &mut written,
                    ptr::null_mut(),
                )
            })
        }

        fn flush_input(&self) -> io::Result<()> {
            let input = self.input_handle()?;
            check(unsafe { FlushConsoleInputBuffer(input) })
        }

        fn read_input(&self) -> io::Result<InputEvent> {
            let input = self.input_handle()?;
            let mut record: INPUT_RECORD = unsafe { std::mem::zeroed() };
            let mut count: DWORD = 0;
            check(unsafe { ReadConsoleInputW(input, &mut record, 1, &mut count) })?;
            if record.EventType != KEY_EVENT {
                return Ok(InputEvent::Other);
            }
            let key = unsafe { record.Event.KeyEvent() };
            Ok(InputEvent::Key {
                key_down: key.bKeyDown != 0,
                virtual_key: key.wVirtualKeyCode,
            })
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

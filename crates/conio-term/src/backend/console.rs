// SPDX-License-Identifier: MIT
//
// Native console backend — attribute words and buffer queries.
//
// Color lives in one attribute word shared by both channels, so every color
// change reads the current word and rewrites one nibble. Dimensions and the
// cursor come from the screen-buffer snapshot. Key capture reads input
// records until a key *release* arrives and returns its virtual-key code.

use std::io;

use crate::backend::{Position, Size, TerminalBackend};
use crate::color::Color;
use crate::wincon::{Attributes, ConsoleApi, ConsoleModeGuard, InputEvent};

/// Cursor size reported with every visibility change, in percent of a cell.
pub const CURSOR_SIZE: u32 = 100;

/// Console attribute nibble for a color: hue in bits 0-2, intensity in bit 3.
const fn nibble(color: Color) -> u8 {
    if color.is_bright() {
        color.hue() + 8
    } else {
        color.hue()
    }
}

/// Console API backend.
pub struct ConsoleBackend<C> {
    api: C,
}

impl<C: ConsoleApi> ConsoleBackend<C> {
    pub const fn new(api: C) -> Self {
        Self { api }
    }

    /// The console primitives.
    pub const fn api(&self) -> &C {
        &self.api
    }

    fn attributes(&self) -> io::Result<Attributes> {
        Ok(self.api.screen_buffer_info()?.attributes)
    }
}

#[cfg(windows)]
impl ConsoleBackend<crate::wincon::StdConsole> {
    /// The console attached to the process's standard handles.
    ///
    /// # Errors
    ///
    /// Returns an error if no console is attached to standard output.
    pub fn stdio() -> Result<Self, crate::error::Error> {
        Ok(Self::new(crate::wincon::StdConsole::new()?))
    }
}

impl<C: ConsoleApi> TerminalBackend for ConsoleBackend<C> {
    fn dimensions(&mut self) -> io::Result<Size> {
        Ok(self.api.screen_buffer_info()?.window.size())
    }

    fn clear(&mut self) -> io::Result<()> {
        let cells = self.api.screen_buffer_info()?.size.area();
        self.api.fill_character(b' ', cells, Position::ORIGIN)?;
        let attributes = self.attributes()?;
        self.api.fill_attribute(attributes, cells, Position::ORIGIN)?;
        self.api.set_cursor_position(Position::ORIGIN)
    }

    fn goto(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.api.set_cursor_position(Position::new(x, y))
    }

    fn position(&mut self) -> io::Result<Position> {
        Ok(self.api.screen_buffer_info()?.cursor)
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        let current = self.attributes()?;
        let next = if color.is_reset() {
            current.with_foreground(Attributes::DEFAULT.foreground())
        } else {
            current.with_foreground(nibble(color))
        };
        self.api.set_text_attribute(next)
    }

    fn set_background(&mut self, color: Color) -> io::Result<()> {
        let current = self.attributes()?;
        let next = if color.is_reset() {
            current.with_background(Attributes::DEFAULT.background())
        } else {
            current.with_background(nibble(color))
        };
        self.api.set_text_attribute(next)
    }

    fn show_cursor(&mut self, visible: bool) -> io::Result<()> {
        self.api.set_cursor_info(CURSOR_SIZE, visible)
    }

    fn wait_key(&mut self, prompt: &str) -> io::Result<u32> {
        let guard = ConsoleModeGuard::enter(&self.api)?;

        if !prompt.is_empty() {
            self.api.write_text(prompt)?;
        }
        self.api.flush_input()?;

        let key = loop {
            match self.api.read_input() {
                Ok(InputEvent::Key {
                    key_down: false,
                    virtual_key,
                }) => break Ok(virtual_key),
                Ok(_) => {}
                Err(e) => break Err(e),
            }
        };

        guard.finish()?;
        key.map(u32::from)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

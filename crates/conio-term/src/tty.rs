// SPDX-License-Identifier: MIT
//
// Tty primitives for the ANSI backend — window size, line discipline, and a
// single-byte read.
//
// `Tty` is the seam between the ANSI backend and the kernel. `StdTty` is the
// real thing over stdin/stdout; tests substitute a fake that records mode
// changes and scripts read results.
//
// `RawModeGuard` owns the saved line discipline for the duration of one key
// read. It restores on `finish()` or, failing that, on drop, so no exit path
// leaves the terminal without echo.
//
// Safety: `StdTty` uses `unsafe` for tcgetattr, tcsetattr and ioctl
// (TIOCGWINSZ). These are the standard POSIX interfaces for terminal
// control; each unsafe block is a single call on a zeroed or owned struct.
#![cfg_attr(unix, allow(unsafe_code))]

use std::io;

use crate::backend::Size;

// ─── Tty ─────────────────────────────────────────────────────────────────────

/// The platform primitives the ANSI backend needs.
pub trait Tty {
    /// A complete snapshot of the line discipline, restorable as-is.
    type Mode: Clone;

    /// Query the window size of the controlling terminal.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the query fails.
    fn window_size(&self) -> io::Result<Size>;

    /// Read the current line discipline.
    ///
    /// # Errors
    ///
    /// Returns the OS error, e.g. when stdin is not a terminal.
    fn get_mode(&self) -> io::Result<Self::Mode>;

    /// Apply a line discipline immediately.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the terminal rejects the settings.
    fn set_mode(&self, mode: &Self::Mode) -> io::Result<()>;

    /// Derive the key-capture mode from `saved`: non-canonical, no echo,
    /// reads return after one byte.
    fn key_mode(&self, saved: &Self::Mode) -> Self::Mode;

    /// Block until one byte of input is available and return it.
    ///
    /// # Errors
    ///
    /// Returns the OS error, or [`io::ErrorKind::UnexpectedEof`] at end of
    /// input.
    fn read_byte(&self) -> io::Result<u8>;
}

// ─── Raw Mode Guard ──────────────────────────────────────────────────────────

/// Saved line discipline, restored when the guard finishes or drops.
pub struct RawModeGuard<'a, T: Tty> {
    tty: &'a T,
    saved: Option<T::Mode>,
}

impl<'a, T: Tty> RawModeGuard<'a, T> {
    /// Save the current mode and switch to key-capture mode.
    ///
    /// Nothing is changed if either step fails.
    ///
    /// # Errors
    ///
    /// Returns the error from reading or applying the mode.
    pub fn enter(tty: &'a T) -> io::Result<Self> {
        let saved = tty.get_mode()?;
        tty.set_mode(&tty.key_mode(&saved))?;
        log::trace!("tty: entered key-capture mode");
        Ok(Self {
            tty,
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
            Some(saved) => {
                self.tty.set_mode(&saved)?;
                log::trace!("tty: restored line discipline");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<T: Tty> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::debug!("tty: failed to restore line discipline: {err}");
        }
    }
}

// ─── StdTty ──────────────────────────────────────────────────────────────────

/// The process's controlling terminal: modes on stdin, size on stdout.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdTty;

#[cfg(unix)]
impl Tty for StdTty {
    type Mode = libc::termios;

    fn window_size(&self) -> io::Result<Size> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

        if result == 0 {
            Ok(Size {
                cols: ws.ws_col,
                rows: ws.ws_row,
            })
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn get_mode(&self) -> io::Result<libc::termios> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(termios)
    }

    fn set_mode(&self, mode: &libc::termios) -> io::Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, mode) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn key_mode(&self, saved: &libc::termios) -> libc::termios {
        let mut termios = *saved;
        termios.c_lflag &= !(libc::ECHO | libc::ICANON);
        // VMIN=1: read() blocks until exactly one byte is available.
        termios.c_cc[libc::VMIN] = 1;
        termios
    }

    fn read_byte(&self) -> io::Result<u8> {
        use std::io::Read;

        let mut buf = [0u8; 1];
        loop {
            match io::stdin().lock().read(&mut buf) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(_) => return Ok(buf[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

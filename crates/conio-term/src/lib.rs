// SPDX-License-Identifier: MIT
//
// conio-term — a small terminal control layer.
//
// One interface for the handful of things a console program needs: the
// viewport size, cursor moves, 16-color foreground and background, clearing,
// cursor visibility, a blocking single-key read, and a timed pause. Two
// backends sit underneath, picked by build target: escape sequences over a
// tty on Unix, the native console API on Windows.
//
// The layer is fail-soft. `Terminal` never returns an error once built; a
// platform call that fails is logged and otherwise does nothing.

pub mod ansi;
pub mod backend;
pub mod color;
pub mod error;
pub mod options;
pub mod terminal;
pub mod tty;
pub mod wincon;

pub use backend::{Position, Size, TerminalBackend};
pub use color::Color;
pub use error::Error;
pub use options::{Options, PauseStrategy};
pub use terminal::Terminal;

#[cfg(any(unix, windows))]
pub use backend::PlatformBackend;

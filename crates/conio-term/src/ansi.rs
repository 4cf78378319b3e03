// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the backend's job. This module
// just knows the byte-level encoding of every command the ANSI backend sends.
//
// Cursor positions are 0-indexed in our API and converted to 1-indexed for
// the terminal (CUP is 1-based). CUP takes row first, column second, the
// opposite of our `(x, y)` parameter order.
//
// Color sequences carry two parameters, `style;code`. The style selects
// intensity and differs per channel: foreground uses 0 (bright) or 2
// (normal); background uses 0 (bright) or 1 (normal). These are emitted
// exactly as listed, whatever a given emulator makes of them.
use std::io::{self, Write};

use crate::color::Color;

/// SGR base for foreground hues (30-37).
pub const FG_BASE: u8 = 30;

/// SGR base for background hues (40-47).
pub const BG_BASE: u8 = 40;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Foreground Color ────────────────────────────────────────────────────────

/// Set the foreground (text) color.
///
/// [`Color::RESET`] emits SGR 39 (default foreground) and nothing else.
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    if color.is_reset() {
        return w.write_all(b"\x1b[39m");
    }
    let style = if color.is_bright() { 0 } else { 2 };
    write!(w, "\x1b[{style};{}m", FG_BASE + color.hue())
}

// ─── Background Color ────────────────────────────────────────────────────────

/// Set the background color.
///
/// Same shape as [`fg`] with BG codes (40-47, SGR 49 for reset).
pub fn bg(w: &mut impl Write, color: Color) -> io::Result<()> {
    if color.is_reset() {
        return w.write_all(b"\x1b[49m");
    }
    let style = if color.is_bright() { 0 } else { 1 };
    write!(w, "\x1b[{style};{}m", BG_BASE + color.hue())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ansi as palette;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_is_row_then_column() {
        // x = 10 (column), y = 20 (row) → row 21, column 11.
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn fg_normal_hues() {
        assert_eq!(emit(|w| fg(w, palette::BLACK)), "\x1b[2;30m");
        assert_eq!(emit(|w| fg(w, palette::RED)), "\x1b[2;31m");
        assert_eq!(emit(|w| fg(w, palette::WHITE)), "\x1b[2;37m");
    }

    #[test]
    fn fg_bright_hues() {
        assert_eq!(emit(|w| fg(w, palette::BRIGHT_BLUE)), "\x1b[0;34m");
        assert_eq!(emit(|w| fg(w, palette::GRAY)), "\x1b[0;30m");
    }

    #[test]
    fn fg_reset() {
        assert_eq!(emit(|w| fg(w, Color::RESET)), "\x1b[39m");
    }

    #[test]
    fn bg_normal_hues() {
        assert_eq!(emit(|w| bg(w, palette::GREEN)), "\x1b[1;42m");
        assert_eq!(emit(|w| bg(w, palette::CYAN)), "\x1b[1;46m");
    }

    #[test]
    fn bg_bright_hues() {
        assert_eq!(emit(|w| bg(w, palette::BRIGHT_YELLOW)), "\x1b[0;43m");
    }

    #[test]
    fn bg_reset() {
        assert_eq!(emit(|w| bg(w, Color::RESET)), "\x1b[49m");
    }

    #[test]
    fn every_hue_maps_into_its_sgr_range() {
        for raw in 0..16 {
            let c = Color::from_raw(raw);
            let f = emit(|w| fg(w, c));
            let b = emit(|w| bg(w, c));
            let code = |s: &str| -> u8 {
                s.trim_end_matches('m').rsplit(';').next().unwrap().parse().unwrap()
            };
            assert!((30..=37).contains(&code(&f)), "{f:?}");
            assert!((40..=47).contains(&code(&b)), "{b:?}");
        }
    }
}

// SPDX-License-Identifier: MIT
//
// Color encoding — the 16-color model shared by both backends.
//
// A color is a small integer: bits 0-2 name one of eight base hues, bit 3
// selects the bright variant. One reserved negative value means "reset this
// channel to the terminal default". Nothing here knows about a terminal
// handle; a Color is plain data.
//
// The hue *numbering* is not portable. ANSI terminals number hues in RGB
// bit order (red = 1, blue = 4); the native console numbers them in BGR
// order (blue = 1, red = 4). Each backend family gets its own base table
// below, and the table matching the build target is exposed as associated
// constants on `Color`. Program against the names, never the numbers.

use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────────

/// A 16-color palette entry, or the reset sentinel.
///
/// ```
/// use conio_term::color::Color;
///
/// let c = Color::RED.bright();
/// assert!(c.is_bright());
/// assert_eq!(c.hue(), Color::RED.hue());
/// assert!(Color::RESET.is_reset());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(i8);

/// Mask selecting the base hue (bits 0-2).
pub const HUE_MASK: i8 = 0b0111;

/// The bright modifier (bit 3).
pub const BRIGHT: i8 = 0b1000;

impl Color {
    /// Restore the terminal's default for the channel being set.
    pub const RESET: Self = Self(-1);

    /// Build a color from its raw encoding.
    ///
    /// Only the low four bits are kept; any negative value becomes
    /// [`RESET`](Self::RESET).
    #[must_use]
    pub const fn from_raw(raw: i8) -> Self {
        if raw < 0 {
            Self::RESET
        } else {
            Self(raw & (HUE_MASK | BRIGHT))
        }
    }

    /// The raw encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i8 {
        self.0
    }

    /// Base hue index, 0-7.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)] // Masked to 0..=7.
    pub const fn hue(self) -> u8 {
        (self.0 & HUE_MASK) as u8
    }

    /// Whether the bright flag is set. Always `false` for the sentinel.
    #[inline]
    #[must_use]
    pub const fn is_bright(self) -> bool {
        !self.is_reset() && self.0 & BRIGHT == BRIGHT
    }

    /// Whether this is the reset sentinel.
    #[inline]
    #[must_use]
    pub const fn is_reset(self) -> bool {
        self.0 < 0
    }

    /// The bright variant of this hue. The sentinel is returned unchanged.
    #[inline]
    #[must_use]
    pub const fn bright(self) -> Self {
        if self.is_reset() {
            self
        } else {
            Self(self.0 | BRIGHT)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reset() {
            f.write_str("Color::RESET")
        } else if self.is_bright() {
            write!(f, "Color(bright {})", self.hue())
        } else {
            write!(f, "Color({})", self.hue())
        }
    }
}

// ─── Base Tables ─────────────────────────────────────────────────────────────

/// Declares a backend palette: base hues, aliases, and bright variants.
macro_rules! palette {
    (
        $(#[$meta:meta])*
        $name:ident { red: $red:expr, yellow: $yellow:expr, blue: $blue:expr, cyan: $cyan:expr }
    ) => {
        $(#[$meta])*
        pub mod $name {
            use super::{Color, BRIGHT};

            pub const BLACK: Color = Color(0);
            pub const RED: Color = Color($red);
            pub const GREEN: Color = Color(2);
            pub const YELLOW: Color = Color($yellow);
            pub const BLUE: Color = Color($blue);
            pub const MAGENTA: Color = Color(5);
            pub const PURPLE: Color = MAGENTA;
            pub const FUCHSIA: Color = MAGENTA;
            pub const CYAN: Color = Color($cyan);
            pub const AQUA: Color = CYAN;
            pub const WHITE: Color = Color(7);

            pub const GRAY: Color = Color(BRIGHT);
            pub const BRIGHT_BLACK: Color = GRAY;
            pub const BRIGHT_RED: Color = RED.bright();
            pub const BRIGHT_GREEN: Color = GREEN.bright();
            pub const BRIGHT_YELLOW: Color = YELLOW.bright();
            pub const BRIGHT_BLUE: Color = BLUE.bright();
            pub const BRIGHT_MAGENTA: Color = MAGENTA.bright();
            pub const BRIGHT_PURPLE: Color = BRIGHT_MAGENTA;
            pub const BRIGHT_FUCHSIA: Color = BRIGHT_MAGENTA;
            pub const BRIGHT_CYAN: Color = CYAN.bright();
            pub const BRIGHT_AQUA: Color = BRIGHT_CYAN;
            pub const BRIGHT_WHITE: Color = WHITE.bright();

            /// The eight base hues in index order, with display names.
            pub const NAMED: [(&str, Color); 8] = [
                ("black", BLACK),
                ("red", RED),
                ("green", GREEN),
                ("yellow", YELLOW),
                ("blue", BLUE),
                ("magenta", MAGENTA),
                ("cyan", CYAN),
                ("white", WHITE),
            ];
        }
    };
}

palette! {
    /// Hue numbering of ANSI/VT100 terminals (SGR 30-37 order).
    ansi { red: 1, yellow: 3, blue: 4, cyan: 6 }
}

palette! {
    /// Hue numbering of the native console attribute nibble (B=1, G=2, R=4).
    console { red: 4, yellow: 6, blue: 1, cyan: 3 }
}

#[cfg(not(windows))]
use self::ansi as platform;
#[cfg(windows)]
use self::console as platform;

/// The build target's palette under symbolic names.
impl Color {
    pub const BLACK: Self = platform::BLACK;
    pub const RED: Self = platform::RED;
    pub const GREEN: Self = platform::GREEN;
    pub const YELLOW: Self = platform::YELLOW;
    pub const BLUE: Self = platform::BLUE;
    pub const MAGENTA: Self = platform::MAGENTA;
    pub const PURPLE: Self = platform::PURPLE;
    pub const FUCHSIA: Self = platform::FUCHSIA;
    pub const CYAN: Self = platform::CYAN;
    pub const AQUA: Self = platform::AQUA;
    pub const WHITE: Self = platform::WHITE;

    pub const GRAY: Self = platform::GRAY;
    pub const BRIGHT_BLACK: Self = platform::BRIGHT_BLACK;
    pub const BRIGHT_RED: Self = platform::BRIGHT_RED;
    pub const BRIGHT_GREEN: Self = platform::BRIGHT_GREEN;
    pub const BRIGHT_YELLOW: Self = platform::BRIGHT_YELLOW;
    pub const BRIGHT_BLUE: Self = platform::BRIGHT_BLUE;
    pub const BRIGHT_MAGENTA: Self = platform::BRIGHT_MAGENTA;
    pub const BRIGHT_PURPLE: Self = platform::BRIGHT_PURPLE;
    pub const BRIGHT_FUCHSIA: Self = platform::BRIGHT_FUCHSIA;
    pub const BRIGHT_CYAN: Self = platform::BRIGHT_CYAN;
    pub const BRIGHT_AQUA: Self = platform::BRIGHT_AQUA;
    pub const BRIGHT_WHITE: Self = platform::BRIGHT_WHITE;

    /// The eight base hues in index order, with display names.
    pub const NAMED: [(&'static str, Self); 8] = platform::NAMED;
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hue_and_bright_split() {
        let c = Color::from_raw(BRIGHT | 5);
        assert_eq!(c.hue(), 5);
        assert!(c.is_bright());
        assert!(!c.is_reset());
    }

    #[test]
    fn from_raw_masks_high_bits() {
        assert_eq!(Color::from_raw(0x7F).raw(), 0x0F);
    }

    #[test]
    fn any_negative_is_reset() {
        assert_eq!(Color::from_raw(-1), Color::RESET);
        assert_eq!(Color::from_raw(-100), Color::RESET);
    }

    #[test]
    fn reset_is_not_bright() {
        assert!(!Color::RESET.is_bright());
        assert_eq!(Color::RESET.bright(), Color::RESET);
    }

    #[test]
    fn bright_is_idempotent() {
        assert_eq!(Color::GREEN.bright().bright(), Color::BRIGHT_GREEN);
    }

    #[test]
    fn gray_is_bright_black() {
        assert_eq!(Color::GRAY, Color::BLACK.bright());
        assert_eq!(Color::GRAY, Color::BRIGHT_BLACK);
    }

    #[test]
    fn aliases_share_encoding() {
        assert_eq!(Color::PURPLE, Color::MAGENTA);
        assert_eq!(Color::FUCHSIA, Color::MAGENTA);
        assert_eq!(Color::AQUA, Color::CYAN);
        assert_eq!(Color::BRIGHT_AQUA, Color::BRIGHT_CYAN);
    }

    #[test]
    fn ansi_table_is_rgb_ordered() {
        assert_eq!(ansi::RED.hue(), 1);
        assert_eq!(ansi::YELLOW.hue(), 3);
        assert_eq!(ansi::BLUE.hue(), 4);
        assert_eq!(ansi::CYAN.hue(), 6);
    }

    #[test]
    fn console_table_is_bgr_ordered() {
        assert_eq!(console::RED.hue(), 4);
        assert_eq!(console::YELLOW.hue(), 6);
        assert_eq!(console::BLUE.hue(), 1);
        assert_eq!(console::CYAN.hue(), 3);
    }

    #[test]
    fn tables_agree_on_shared_hues() {
        assert_eq!(ansi::BLACK, console::BLACK);
        assert_eq!(ansi::GREEN, console::GREEN);
        assert_eq!(ansi::MAGENTA, console::MAGENTA);
        assert_eq!(ansi::WHITE, console::WHITE);
    }

    #[test]
    fn named_covers_every_hue_once() {
        let mut seen = [false; 8];
        for (_, c) in Color::NAMED {
            seen[usize::from(c.hue())] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Color::RESET), "Color::RESET");
        assert_eq!(format!("{:?}", Color::from_raw(2)), "Color(2)");
        assert_eq!(format!("{:?}", Color::from_raw(10)), "Color(bright 2)");
    }
}

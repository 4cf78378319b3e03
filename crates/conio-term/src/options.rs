// SPDX-License-Identifier: MIT
//
// Layer options — how `pause` waits.
//
// The only tunable is the pause strategy. `Sleep` yields to the scheduler;
// `Spin` burns CPU checking the clock until the deadline passes, for callers
// that need the old non-yielding timing. Options come from code or from the
// `CONIO_PAUSE` environment variable.

use std::env;
use std::hint;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::Error;

/// Environment variable read by [`Options::from_env`].
pub const PAUSE_VAR: &str = "CONIO_PAUSE";

// ─── Pause Strategy ──────────────────────────────────────────────────────────

/// How a timed pause waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseStrategy {
    /// Yield the thread to the OS scheduler.
    #[default]
    Sleep,
    /// Busy-wait on the monotonic clock.
    Spin,
}

impl PauseStrategy {
    /// Parse `sleep` or `spin`, case-insensitively, ignoring surrounding
    /// whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("sleep") {
            Some(Self::Sleep)
        } else if s.eq_ignore_ascii_case("spin") {
            Some(Self::Spin)
        } else {
            None
        }
    }

    /// Wait for `duration` using this strategy. Zero returns immediately.
    pub fn wait(self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        match self {
            Self::Sleep => thread::sleep(duration),
            Self::Spin => {
                let deadline = Instant::now() + duration;
                while Instant::now() < deadline {
                    hint::spin_loop();
                }
            }
        }
    }
}

// ─── Options ─────────────────────────────────────────────────────────────────

/// Construction-time options for the platform terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Strategy used by `pause` on backends that honor it.
    pub pause: PauseStrategy,
}

impl Options {
    /// Read options from the environment. Unset variables keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if `CONIO_PAUSE` is set to anything
    /// other than `sleep` or `spin`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build options from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut options = Self::default();
        if let Some(value) = lookup(PAUSE_VAR) {
            options.pause = PauseStrategy::parse(&value).ok_or(Error::InvalidOption {
                name: PAUSE_VAR,
                value,
            })?;
        }
        Ok(options)
    }

    /// Use the given pause strategy.
    #[must_use]
    pub const fn with_pause(mut self, pause: PauseStrategy) -> Self {
        self.pause = pause;
        self
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Construction errors. Once a `Terminal` exists its operations are
// fail-soft and never return these.

use std::io;

/// Why the platform terminal could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The process has no console attached to standard output.
    #[error("standard output is not attached to a console")]
    NotATerminal,

    /// An option carried a value outside its accepted set.
    #[error("invalid value {value:?} for {name}: expected `sleep` or `spin`")]
    InvalidOption {
        /// The option or environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A platform call failed while acquiring a handle.
    #[error("console handle: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let err: Error = io::Error::other("boom").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "console handle: boom");
    }

    #[test]
    fn invalid_option_message_names_the_variable() {
        let err = Error::InvalidOption {
            name: "CONIO_PAUSE",
            value: "x".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"x\" for CONIO_PAUSE: expected `sleep` or `spin`"
        );
    }
}

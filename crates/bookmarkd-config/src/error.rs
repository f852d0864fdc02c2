//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration resolution.
///
/// All variants are fatal to the resolution call that produced them, with
/// one exception: [`ConfigError::HelpRequested`] is a control signal.
/// Callers are expected to branch on it (via [`ConfigError::is_help`] or a
/// `matches!`) and print the usage table instead of treating it as a
/// failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A schema field declares parameter pairs but neither `cmd` nor `env`.
    #[error("field `{field}` defines neither `cmd` nor `env`: no command defined")]
    NoCommandDefined {
        /// Name of the offending schema field.
        field: &'static str,
    },

    /// A command-line token does not start with the `-` marker.
    #[error("malformed command line parameter: `{token}`")]
    MalformedParameter {
        /// The offending token.
        token: String,
    },

    /// A command-line token cannot be split into a name and a value.
    #[error("unknown parameter or no value provided: `{token}` (expected -name=value)")]
    UnknownOrNoValue {
        /// The offending token.
        token: String,
    },

    /// `-h` or `--help` was supplied; print usage and exit cleanly.
    #[error("help requested")]
    HelpRequested,

    /// A resolved value for an integer-typed parameter is not numeric.
    #[error("invalid value for parameter `{param}`: `{value}` is not a numeric value")]
    InvalidNumericValue {
        /// The parameter whose value failed to parse.
        param: String,
        /// The offending resolved value.
        value: String,
    },
}

impl ConfigError {
    /// Returns `true` for the help control signal.
    #[must_use]
    pub fn is_help(&self) -> bool {
        matches!(self, Self::HelpRequested)
    }
}

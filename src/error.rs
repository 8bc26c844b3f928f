//! Unified error type.

use std::fmt;

/// The error type returned by weft's fallible operations.
///
/// Application-level failures (404, 400, …) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// startup failures: reading the configuration file and binding the
/// listening socket. Both are fatal to the process in practice — there is
/// nothing to serve without a port.
#[derive(Debug)]
pub enum Error {
    /// Reading the configuration file or binding the listener failed.
    Io(std::io::Error),
    /// The configuration file lacks a required key.
    MissingKey(&'static str),
    /// A configuration value failed to parse.
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::MissingKey(key) => write!(f, "config: missing required key `{key}`"),
            Self::InvalidValue { key, value } => {
                write!(f, "config: invalid value `{value}` for key `{key}`")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::MissingKey(_) | Self::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

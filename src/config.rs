//! Startup configuration from a dotenv-style file.
//!
//! Configuration is read exactly once, in `main`, into an immutable
//! [`Config`] that is passed by reference to
//! [`Server::from_config`](crate::Server::from_config). A missing or
//! malformed file is an error the caller is expected to treat as fatal —
//! nothing here retries or falls back.

use std::path::Path;

use crate::error::Error;

/// Immutable startup configuration.
#[derive(Clone, Debug)]
pub struct Config {
    port: u16,
}

impl Config {
    /// Reads `path` and parses it as dotenv-format `KEY=value` lines.
    ///
    /// Blank lines and `#` comments are skipped, values may be wrapped in
    /// single or double quotes, and keys other than the ones weft knows
    /// about are ignored. Required keys: `PORT`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use weft::Config;
    ///
    /// let config = Config::from_file(".env").expect("config");
    /// assert!(config.port() > 0);
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    fn parse(source: &str) -> Result<Self, Error> {
        let mut port = None;

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');

            if key.trim() == "PORT" {
                let parsed = value.parse::<u16>().map_err(|_| Error::InvalidValue {
                    key: "PORT",
                    value: value.to_owned(),
                })?;
                port = Some(parsed);
            }
        }

        let port = port.ok_or(Error::MissingKey("PORT"))?;
        Ok(Self { port })
    }

    /// The TCP port the server listens on.
    pub fn port(&self) -> u16 {
        self.port
    }
}

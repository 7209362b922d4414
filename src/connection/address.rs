//! Module `address`
//!
//! Parses `host[:port]` server addresses as typed into a front end.

use std::fmt;
use std::str::FromStr;

use crate::error::{DictError, Result};

/// Well-known DICT port.
pub const DEFAULT_PORT: u16 = 2628;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host` alone uses the default port; `host:port` splits on the first `:`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (host, port) = match input.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .trim()
                    .parse()
                    .map_err(|_| DictError::InvalidArgument(input.to_string()))?;
                (host.trim(), port)
            }
            None => (input, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(DictError::InvalidArgument(input.to_string()));
        }

        Ok(Self::new(host, port))
    }
}

impl FromStr for ServerAddress {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

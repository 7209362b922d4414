//! Error types
//!
//! Every fallible operation of the client returns one of these kinds. "Not found"
//! replies from the server are never errors; they surface as empty results.

use std::io;
use thiserror::Error;

/// Errors raised by the DICT protocol engine.
#[derive(Debug, Error)]
pub enum DictError {
    /// Socket or DNS failure while opening the connection.
    #[error("Unable to connect to dictionary server {address}: {source}")]
    ConnectionFailed {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The greeting was not `220`.
    #[error("Server rejected connection. Status: {code} {detail}")]
    ConnectionRejected { code: u16, detail: String },

    #[error("Connection is not active")]
    NotConnected,

    /// The reply did not start with `<3-digit code> <text>`.
    #[error("Malformed status line: {0:?}")]
    MalformedStatus(String),

    #[error("Expected status {} but got {actual} {detail}", format_codes(.expected))]
    UnexpectedStatus {
        expected: Vec<u16>,
        actual: u16,
        detail: String,
    },

    /// `SHOW INFO` named a database the server does not know.
    #[error("Invalid database: {0}")]
    InvalidDatabase(String),

    /// A command argument cannot be framed on a single protocol line.
    #[error("Invalid command argument: {0:?}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, DictError>;

impl DictError {
    pub(crate) fn unexpected(expected: &[u16], actual: u16, detail: &str) -> Self {
        DictError::UnexpectedStatus {
            expected: expected.to_vec(),
            actual,
            detail: detail.to_string(),
        }
    }
}

fn format_codes(codes: &[u16]) -> String {
    codes
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

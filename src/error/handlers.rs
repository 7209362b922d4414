//! Error handlers
//!
//! Maps client errors onto process exit codes for the command-line front end.

use crate::error::types::DictError;
use log::error;

/// Log a DICT client error
pub fn handle_error(err: &DictError) {
    error!("DICT client error: {}", err);
}

/// Convert error to a process exit code
pub fn error_to_exit_code(err: &DictError) -> u8 {
    match err {
        DictError::ConnectionFailed { .. } => 2,
        DictError::ConnectionRejected { .. } => 3,
        DictError::NotConnected => 4,
        DictError::MalformedStatus(_) => 5,
        DictError::UnexpectedStatus { .. } => 5,
        DictError::InvalidDatabase(_) => 6,
        DictError::InvalidArgument(_) => 64,
        DictError::Io(_) => 74,
    }
}

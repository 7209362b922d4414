//! DICT server connection
//!
//! Owns the socket, frames commands, and dispatches each reply to the parser
//! for its status code.

pub mod address;
pub mod core;
pub mod events;

pub use address::{DEFAULT_PORT, ServerAddress};
pub use self::core::Connection;
pub use events::DictEvent;

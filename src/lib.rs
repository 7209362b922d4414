//! RAX DICT Client
//!
//! An async client for the DICT protocol (RFC 2229): list databases and
//! strategies, define words, match words, and show database information.

pub mod config;
pub mod connection;
pub mod error;
pub mod model;
pub mod protocol;

pub use config::ClientConfig;
pub use connection::{Connection, DictEvent, ServerAddress};
pub use error::{DictError, Result};
pub use model::{Catalog, Database, Definition, MatchingStrategy};

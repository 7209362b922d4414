//! DICT protocol implementation (RFC 2229)
//!
//! Handles command framing, status line parsing, and the multi-line reply
//! grammars returned by the server.

pub mod commands;
pub mod parser;
pub mod reader;
pub mod responses;
pub mod status;
pub mod tokenizer;

pub use commands::Command;
pub use reader::LineReader;
pub use status::StatusLine;
pub use tokenizer::split_atoms;

//! Connection events
//!
//! Structured outcomes published by a `Connection`, so an embedding
//! application can surface them without scraping log output.

/// Something notable that happened on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictEvent {
    /// Greeting accepted; carries the `220` banner text.
    Connected { banner: String },
    /// The server does not know this database (`550`).
    InvalidDatabase(String),
    /// The server does not know this strategy (`551`).
    InvalidStrategy(String),
    /// Nothing matched the word (`552`).
    NoMatch(String),
    /// `SHOW DB` reported no databases (`554`).
    NoDatabases,
    /// `SHOW STRAT` reported no strategies (`555`).
    NoStrategies,
    /// A command finished with its terminal `250`.
    Completed { command: &'static str },
    Closed,
}

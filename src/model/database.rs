//! Module `database`
//!
//! A dictionary database advertised by the server, plus the two sentinel
//! pseudo-databases understood by `DEFINE` and `MATCH`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::model::Keyed;

/// Searches every database on the server.
pub const ALL_DATABASES: &str = "*";
/// Stops at the first database that has a match.
pub const FIRST_MATCH: &str = "!";

/// A server database. Equality, ordering and hashing use the identifier only.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    description: String,
}

impl Database {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The `*` sentinel.
    pub fn all() -> Self {
        Self::new(ALL_DATABASES, "All databases")
    }

    /// The `!` sentinel.
    pub fn first_match() -> Self {
        Self::new(FIRST_MATCH, "Any database")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_sentinel(&self) -> bool {
        self.name == ALL_DATABASES || self.name == FIRST_MATCH
    }
}

impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Database {}

impl Hash for Database {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Database {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Database {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Keyed for Database {
    fn key(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

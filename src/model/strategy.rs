//! Module `strategy`
//!
//! A word-matching algorithm offered by the server for `MATCH`.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::model::Keyed;

#[derive(Debug, Clone)]
pub struct MatchingStrategy {
    name: String,
    description: String,
}

impl MatchingStrategy {
    /// Strategy preselected when none is configured.
    pub const DEFAULT: &'static str = "prefix";

    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for MatchingStrategy {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for MatchingStrategy {}

impl Hash for MatchingStrategy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Keyed for MatchingStrategy {
    fn key(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

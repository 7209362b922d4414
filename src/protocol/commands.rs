//! Module `commands`
//!
//! The client-to-server commands, validated on construction and rendered to
//! their wire form by `Display`.

use std::fmt;

use crate::error::{DictError, Result};

/// A DICT command the client sends.
///
/// Arguments are validated by the constructors so that the `Display` output is
/// always exactly one protocol line (without the line ending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowDb,
    ShowStrat,
    ShowInfo(String),
    Define { database: String, word: String },
    Match { database: String, strategy: String, word: String },
    Quit,
}

impl Command {
    pub fn show_info(database: &str) -> Result<Self> {
        Ok(Command::ShowInfo(checked(database)?))
    }

    pub fn define(database: &str, word: &str) -> Result<Self> {
        Ok(Command::Define {
            database: checked(database)?,
            word: checked(word)?,
        })
    }

    pub fn match_word(database: &str, strategy: &str, word: &str) -> Result<Self> {
        Ok(Command::Match {
            database: checked(database)?,
            strategy: checked(strategy)?,
            word: checked(word)?,
        })
    }

    /// The command keyword(s), for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::ShowDb => "SHOW DB",
            Command::ShowStrat => "SHOW STRAT",
            Command::ShowInfo(_) => "SHOW INFO",
            Command::Define { .. } => "DEFINE",
            Command::Match { .. } => "MATCH",
            Command::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ShowDb | Command::ShowStrat | Command::Quit => f.write_str(self.verb()),
            Command::ShowInfo(database) => write!(f, "SHOW INFO {}", Atom(database)),
            Command::Define { database, word } => {
                write!(f, "DEFINE {} {}", Atom(database), Atom(word))
            }
            Command::Match {
                database,
                strategy,
                word,
            } => write!(
                f,
                "MATCH {} {} {}",
                Atom(database),
                Atom(strategy),
                Atom(word)
            ),
        }
    }
}

/// Rejects arguments that would break line framing or quoting.
fn checked(arg: &str) -> Result<String> {
    if arg.contains(['\r', '\n', '"']) {
        return Err(DictError::InvalidArgument(arg.to_string()));
    }
    Ok(arg.to_string())
}

/// Renders one argument, quoting it when it is empty or holds whitespace.
struct Atom<'a>(&'a str);

impl fmt::Display for Atom<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() || self.0.contains(char::is_whitespace) {
            write!(f, "\"{}\"", self.0)
        } else {
            f.write_str(self.0)
        }
    }
}

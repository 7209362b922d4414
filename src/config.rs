//! Configuration management for the RAX DICT client
//!
//! Settings come from built-in defaults, an optional TOML file, and
//! `RAX_DICT_*` environment variables, in increasing order of precedence.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::connection::{DEFAULT_PORT, ServerAddress};
use crate::model::database::{ALL_DATABASES, FIRST_MATCH};
use crate::model::{Database, MatchingStrategy};

/// Default config file name, looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "dict-client";

/// Complete client configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    /// DICT server host name
    /// Environment: RAX_DICT_HOST
    pub host: String,

    /// DICT server port
    /// Environment: RAX_DICT_PORT
    pub port: u16,

    /// Database used for lookups when none is given (`*`, `!` or a name)
    pub database: String,

    /// Strategy used for MATCH when none is given
    pub strategy: String,
}

impl ClientConfig {
    /// Load configuration, reading `path` if given (it must exist), otherwise
    /// an optional `dict-client.toml` in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("host", "dict.org")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("database", ALL_DATABASES)?
            .set_default("strategy", MatchingStrategy::DEFAULT)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("RAX_DICT")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.host.trim().is_empty() {
            return Err(config::ConfigError::Message("host cannot be empty".into()));
        }

        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.database.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "database cannot be empty".into(),
            ));
        }

        if self.strategy.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "strategy cannot be empty".into(),
            ));
        }

        Ok(())
    }

    pub fn server_address(&self) -> ServerAddress {
        ServerAddress::new(self.host.clone(), self.port)
    }

    /// The configured default database, mapping `*` and `!` to their sentinels
    pub fn default_database(&self) -> Database {
        database_named(&self.database)
    }

    pub fn default_strategy(&self) -> MatchingStrategy {
        MatchingStrategy::new(self.strategy.clone(), self.strategy.clone())
    }
}

/// A database referenced by name only; the description is unknown until `SHOW DB`.
pub fn database_named(name: &str) -> Database {
    match name {
        ALL_DATABASES => Database::all(),
        FIRST_MATCH => Database::first_match(),
        _ => Database::new(name, name),
    }
}

//! Dictionary domain model
//!
//! Value objects produced fresh from each reply: databases, matching
//! strategies, definitions, and the ordered collections that hold them.

pub mod catalog;
pub mod database;
pub mod definition;
pub mod strategy;

pub use catalog::{Catalog, Keyed};
pub use database::Database;
pub use definition::Definition;
pub use strategy::MatchingStrategy;

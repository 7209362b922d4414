//! Module `catalog`
//!
//! Order-preserving, duplicate-free collection keyed by identifier. Backs the
//! database list, the strategy list, and the set of matched words.

use std::collections::HashMap;

/// Anything identified by a short protocol identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

/// Entries in server-reported order, at most one per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set semantics: the first entry with a given key wins.
    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.index.contains_key(item.key()) {
            return false;
        }
        self.index.insert(item.key().to_string(), self.entries.len());
        self.entries.push(item);
        true
    }

    /// Map semantics: a repeated key replaces the value but keeps its position.
    pub fn upsert(&mut self, item: T) {
        match self.index.get(item.key()) {
            Some(&pos) => self.entries[pos] = item,
            None => {
                self.index.insert(item.key().to_string(), self.entries.len());
                self.entries.push(item);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Keyed::key)
    }
}

impl<T> Catalog<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> IntoIterator for Catalog<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

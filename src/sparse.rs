//! Sparse maps of solved values.
//!
//! The solver only creates variables for index combinations which are valid in the model (e.g. a
//! project is not dispatched in periods after it retires), so most of the combinations a report
//! asks about will have no entry. Missing entries are not errors: they read as zero.
use crate::input::try_insert;
use anyhow::Result;
use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A partial map from an index tuple to a solved value.
///
/// Entries are kept in insertion order (see [`IndexMap`]).
#[derive(PartialEq, Debug, Clone)]
pub struct SparseMap<K: Hash + Eq>(IndexMap<K, f64>);

impl<K: Hash + Eq> Default for SparseMap<K> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<K: Hash + Eq> SparseMap<K> {
    /// Create a new, empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for this key, if any
    pub fn insert(&mut self, key: K, value: f64) -> Option<f64> {
        self.0.insert(key, value)
    }

    /// Insert a value, returning an error if `key` already has one
    pub fn try_insert(&mut self, key: K, value: f64) -> Result<()>
    where
        K: Debug,
    {
        try_insert(&mut self.0, key, value)
    }

    /// Get the value for `key`, or zero if it is undefined
    pub fn get(&self, key: &K) -> f64 {
        self.get_or(key, 0.0)
    }

    /// Get the value for `key`, or `default` if it is undefined
    pub fn get_or(&self, key: &K, default: f64) -> f64 {
        self.0.get(key).copied().unwrap_or(default)
    }

    /// Whether a value is defined for `key`
    pub fn contains(&self, key: &K) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over the defined entries
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.0.iter().map(|(key, value)| (key, *value))
    }

    /// Iterate over the keys for which a value is defined
    pub fn keys(&self) -> indexmap::map::Keys<'_, K, f64> {
        self.0.keys()
    }

    /// The number of defined entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no entries are defined
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Hash + Eq> FromIterator<(K, f64)> for SparseMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

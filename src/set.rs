//! Minimal set used to track checklist selections

use hashbrown::HashSet;
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Set<T: Eq + Hash> {
    values: HashSet<T>,
}

impl<T: Eq + Hash> Set<T> {
    pub fn new() -> Self {
        Self {
            values: HashSet::new(),
        }
    }

    pub fn add(&mut self, value: T) {
        self.values.insert(value);
    }

    pub fn remove(&mut self, value: &T) {
        self.values.remove(value);
    }

    /// Add `value` if absent, remove it if present
    pub fn toggle(&mut self, value: T) {
        if !self.values.remove(&value) {
            self.values.insert(value);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl<T: Eq + Hash + Ord + Clone> Set<T> {
    /// Values in ascending order
    pub fn to_vec(&self) -> Vec<T> {
        let mut values: Vec<T> = self.values.iter().cloned().collect();
        values.sort();
        values
    }
}

impl<T: Eq + Hash> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T: Eq + Hash + Ord + Clone + fmt::Debug> fmt::Display for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_vec())
    }
}

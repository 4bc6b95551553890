//! Insertion-ordered, de-duplicated, capped candidate collection.

use std::collections::HashSet;

/// Ordered set of candidate strings with a fixed capacity.
///
/// Order matters: every consumer walks candidates front to back and the first
/// acceptable one wins. Once `cap` entries are held, further pushes are dropped.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    items: Vec<String>,
    seen: HashSet<String>,
    cap: usize,
}

impl CandidateSet {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Appends `value` unless it is empty, already present, or the set is full.
    /// Returns true if the value was added.
    pub fn push(&mut self, value: String) -> bool {
        if self.is_full() || value.is_empty() || self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

//! Package base membership sets

use std::collections::HashSet;

/// A set of package bases with constant-time membership tests.
///
/// Bases are compared by exact string match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSet {
    bases: HashSet<String>,
}

impl MembershipSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base; returns false if it was already present
    pub fn insert(&mut self, base: impl Into<String>) -> bool {
        self.bases.insert(base.into())
    }

    /// Whether `base` is a member
    pub fn contains(&self, base: &str) -> bool {
        self.bases.contains(base)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for MembershipSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            bases: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for MembershipSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.bases.extend(iter.into_iter().map(Into::into));
    }
}

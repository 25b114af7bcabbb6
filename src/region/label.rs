//! Whitespace-insensitive region labels.
//!
//! Labels coming from different tools for the same region often differ only
//! in spacing (`"M 1"` in the region manager, `"M1"` in the results table).
//! A [`Label`] stores the label with every whitespace character removed, and
//! all label comparisons in this crate go through it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized region label.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Normalizes a raw label by removing all whitespace.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.split_whitespace().collect())
    }

    /// Returns the normalized label text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the label is empty after normalization.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Label {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<String> for Label {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({:?})", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! The result of overlap matching.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::region::Label;

/// A lookup from normalized label to the derived value written by a merge.
///
/// `Some(value)` is written as is. `None` marks a label that is known but has
/// no partner and is written as an empty value. Labels absent from the view
/// are reported by the merge as missing correspondences.
pub type CorrespondenceView = BTreeMap<Label, Option<String>>;

/// Overlap correspondence between a primary and a secondary collection.
///
/// Only the primary direction is stored; the secondary-to-primary direction
/// is always derived from it, so the two can never disagree.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Correspondence {
    /// Primary labels in collection order with the secondary labels they claimed.
    primary: Vec<(Label, Vec<Label>)>,
    /// Secondary labels in collection order.
    secondary: Vec<Label>,
}

impl Correspondence {
    pub(crate) fn new(primary: Vec<(Label, Vec<Label>)>, secondary: Vec<Label>) -> Self {
        Self { primary, secondary }
    }

    /// Iterates over primary labels and their claimed secondary labels.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &[Label])> {
        self.primary.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Iterates over the secondary labels in collection order.
    pub fn secondary_labels(&self) -> impl Iterator<Item = &Label> {
        self.secondary.iter()
    }

    /// Returns the secondary labels claimed by a primary label.
    pub fn claimed_by(&self, primary: &Label) -> Option<&[Label]> {
        self.primary
            .iter()
            .find(|(k, _)| k == primary)
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the primary label that claimed a secondary label, if any.
    pub fn owner_of(&self, secondary: &Label) -> Option<&Label> {
        self.primary
            .iter()
            .find(|(_, claimed)| claimed.contains(secondary))
            .map(|(k, _)| k)
    }

    /// Returns the secondary-to-primary mapping for every secondary label.
    pub fn inverse(&self) -> BTreeMap<Label, Option<Label>> {
        let mut inverse: BTreeMap<Label, Option<Label>> =
            self.secondary.iter().map(|s| (s.clone(), None)).collect();
        for (owner, claimed) in &self.primary {
            for s in claimed {
                inverse.insert(s.clone(), Some(owner.clone()));
            }
        }
        inverse
    }

    /// Total number of claimed secondary regions.
    pub fn claimed_count(&self) -> usize {
        self.primary.iter().map(|(_, v)| v.len()).sum()
    }

    /// View mapping each primary label to the number of regions it claimed.
    pub fn overlap_count_view(&self) -> CorrespondenceView {
        self.primary
            .iter()
            .map(|(k, v)| (k.clone(), Some(v.len().to_string())))
            .collect()
    }

    /// View mapping each secondary label to the primary label that claimed it.
    pub fn owner_view(&self) -> CorrespondenceView {
        self.inverse()
            .into_iter()
            .map(|(k, owner)| (k, owner.map(String::from)))
            .collect()
    }
}

//! Per-person expand state.
//!
//! Expand flags are keyed by [`PersonId`], not by position, so they survive
//! new searches, facet changes and pagination. Only a collection replacement
//! prunes them.

use crate::domain::{Collection, Person, PersonId};
use std::collections::{BTreeSet, HashSet};

/// A revealed person paired with its expand flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedItem<'a> {
    pub person: &'a Person,
    pub expanded: bool,
}

/// Set of expanded person ids. Absent ids are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    expanded: BTreeSet<PersonId>,
}

impl ViewState {
    /// Flips the flag for `id`, leaving every other id untouched. Returns the
    /// new flag.
    pub fn toggle(&mut self, id: &PersonId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    #[must_use]
    pub fn is_expanded(&self, id: &PersonId) -> bool {
        self.expanded.contains(id)
    }

    /// Drops flags for ids absent from `collection`. Returns how many were dropped.
    pub fn prune(&mut self, collection: &Collection) -> usize {
        let present: HashSet<&PersonId> = collection.people().iter().map(|p| &p.id).collect();
        let before = self.expanded.len();
        self.expanded.retain(|id| present.contains(id));
        before - self.expanded.len()
    }

    /// Pairs the first `revealed` visible people with their flags.
    ///
    /// Pure: the same inputs always give the same list.
    #[must_use]
    pub fn project<'a>(
        &self,
        collection: &'a Collection,
        visible: &[usize],
        revealed: usize,
    ) -> Vec<ProjectedItem<'a>> {
        visible
            .iter()
            .take(revealed)
            .filter_map(|&index| collection.get(index))
            .map(|person| ProjectedItem {
                person,
                expanded: self.is_expanded(&person.id),
            })
            .collect()
    }
}

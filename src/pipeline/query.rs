//! Query state and evaluation.
//!
//! A query is the conjunction of a free-text predicate and one exact-match
//! predicate per restricted facet. A facet with no entry in
//! [`QueryState::selections`] is unrestricted. Evaluation is a stable filter
//! over the collection and is recomputed from scratch on every change.

use super::facets::FacetSet;
use crate::domain::{Collection, Field, Person};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Which fields the search text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchMode {
    /// Name and username.
    #[default]
    Name,
    City,
    Company,
    /// Name, username, email, city and company.
    Any,
}

impl SearchMode {
    const CYCLE: [Self; 4] = [Self::Name, Self::City, Self::Company, Self::Any];

    #[must_use]
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::Name => &[Field::Name, Field::Username],
            Self::City => &[Field::City],
            Self::Company => &[Field::Company],
            Self::Any => &[
                Field::Name,
                Field::Username,
                Field::Email,
                Field::City,
                Field::Company,
            ],
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::City => "city",
            Self::Company => "company",
            Self::Any => "any",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::CYCLE.into_iter().find(|mode| mode.label() == key)
    }

    /// The mode after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::CYCLE.iter().position(|m| *m == self).unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }
}

/// Current search text, facet selections and search mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    selections: BTreeMap<Field, String>,
    mode: SearchMode,
}

impl QueryState {
    #[must_use]
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub const fn mode(&self) -> SearchMode {
        self.mode
    }

    #[must_use]
    pub const fn selections(&self) -> &BTreeMap<Field, String> {
        &self.selections
    }

    #[must_use]
    pub fn selection(&self, field: Field) -> Option<&str> {
        self.selections.get(&field).map(String::as_str)
    }

    /// Replaces the search text. Returns whether it changed.
    pub fn set_search_text(&mut self, text: &str) -> bool {
        if self.search_text == text {
            return false;
        }
        self.search_text = text.to_string();
        true
    }

    pub fn push_char(&mut self, c: char) {
        self.search_text.push(c);
    }

    /// Removes the last character. Returns whether there was one.
    pub fn pop_char(&mut self) -> bool {
        self.search_text.pop().is_some()
    }

    pub fn set_mode(&mut self, mode: SearchMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Restricts `field` to `value`, or lifts the restriction for `None`.
    ///
    /// An empty value is treated as no restriction. Returns whether the
    /// selection changed.
    pub fn select(&mut self, field: Field, value: Option<&str>) -> bool {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self
                .selections
                .insert(field, value.to_string())
                .map_or(true, |previous| previous != value),
            None => self.selections.remove(&field).is_some(),
        }
    }

    /// Drops search text and every facet restriction. Keeps the mode.
    pub fn clear(&mut self) -> bool {
        let changed = !self.search_text.is_empty() || !self.selections.is_empty();
        self.search_text.clear();
        self.selections.clear();
        changed
    }

    /// Drops selections that reference a value absent from `facets`.
    ///
    /// Returns the fields whose selection was dropped.
    pub fn revalidate(&mut self, facets: &FacetSet) -> Vec<Field> {
        let stale: Vec<Field> = self
            .selections
            .iter()
            .filter(|(field, value)| !facets.contains(**field, value))
            .map(|(field, _)| *field)
            .collect();

        for field in &stale {
            self.selections.remove(field);
        }
        if !stale.is_empty() {
            tracing::debug!(dropped = ?stale, "dropped stale facet selections");
        }
        stale
    }

    /// The search text as matched: trimmed and lowercased.
    #[must_use]
    pub fn needle(&self) -> String {
        self.search_text.trim().to_lowercase()
    }

    /// Range of `text` to highlight when `field` is searched by the active mode.
    #[must_use]
    pub fn highlight(&self, field: Field, text: &str) -> Option<Range<usize>> {
        if !self.mode.fields().contains(&field) {
            return None;
        }
        match_range(text, &self.needle())
    }

    fn matches_needle(&self, person: &Person, needle: &str) -> bool {
        let text_ok = needle.is_empty()
            || self
                .mode
                .fields()
                .iter()
                .any(|&field| person.field(field).to_lowercase().contains(needle));

        text_ok
            && self
                .selections
                .iter()
                .all(|(&field, value)| person.field(field) == value.as_str())
    }
}

/// Indices of the people in `collection` that match `query`, in collection order.
#[must_use]
pub fn evaluate(collection: &Collection, query: &QueryState) -> Vec<usize> {
    let _span = tracing::debug_span!(
        "evaluate_query",
        people = collection.len(),
        mode = query.mode.label(),
        selections = query.selections.len()
    )
    .entered();

    let needle = query.needle();
    let visible: Vec<usize> = collection
        .people()
        .iter()
        .enumerate()
        .filter(|(_, person)| query.matches_needle(person, &needle))
        .map(|(index, _)| index)
        .collect();

    tracing::debug!(visible = visible.len(), "query evaluated");
    visible
}

/// Character range of the first case-insensitive occurrence of `needle` in `text`.
///
/// Used for highlighting. Returns `None` when there is no match or when
/// lowercasing changes the character count of `text`, since char positions in
/// the lowercased copy would no longer line up with the original.
#[must_use]
pub fn match_range(text: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    if lowered.chars().count() != text.chars().count() {
        return None;
    }

    let byte_start = lowered.find(needle)?;
    let start = lowered[..byte_start].chars().count();
    Some(start..start + needle.chars().count())
}

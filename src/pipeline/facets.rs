//! Facet extraction.
//!
//! A facet is a field (city, company, gender) whose distinct observed values
//! become filter options. Values keep the order in which they first appear in
//! the collection, so the filter bar is stable across renders and reloads of
//! the same data.

use crate::domain::{Collection, Field};
use std::collections::HashSet;

/// Distinct values per configured facet field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSet {
    facets: Vec<(Field, Vec<String>)>,
}

impl FacetSet {
    /// Configured facet fields, in configuration order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.facets.iter().map(|(field, _)| *field)
    }

    /// Values observed for `field`; empty if the field is not a facet.
    #[must_use]
    pub fn values(&self, field: Field) -> &[String] {
        self.facets
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(&[], |(_, values)| values.as_slice())
    }

    #[must_use]
    pub fn contains(&self, field: Field, value: &str) -> bool {
        self.values(field).iter().any(|v| v == value)
    }

    #[must_use]
    pub fn is_facet(&self, field: Field) -> bool {
        self.facets.iter().any(|(f, _)| *f == field)
    }

    /// The selection that follows `current` when cycling through `field`.
    ///
    /// Cycles no restriction → first value → ... → last value → no restriction.
    /// A `current` value that is no longer present restarts at the first value.
    #[must_use]
    pub fn next_value(&self, field: Field, current: Option<&str>) -> Option<&str> {
        let values = self.values(field);
        let next = match current {
            None => 0,
            Some(current) => values
                .iter()
                .position(|v| v == current)
                .map_or(0, |index| index + 1),
        };
        values.get(next).map(String::as_str)
    }
}

/// Collects the distinct non-empty values of each field in `fields`.
///
/// Deduplication is exact and case-sensitive, because facet values double as
/// exact-match filter keys.
#[must_use]
pub fn extract_facets(collection: &Collection, fields: &[Field]) -> FacetSet {
    let _span = tracing::debug_span!("extract_facets", people = collection.len(), fields = fields.len()).entered();

    let facets = fields
        .iter()
        .map(|&field| {
            let mut seen = HashSet::new();
            let values: Vec<String> = collection
                .people()
                .iter()
                .map(|person| person.field(field))
                .filter(|value| !value.is_empty() && seen.insert(*value))
                .map(String::from)
                .collect();

            tracing::trace!(field = field.key(), distinct = values.len(), "facet extracted");
            (field, values)
        })
        .collect();

    FacetSet { facets }
}

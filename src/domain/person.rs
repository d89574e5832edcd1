//! Person records and the loaded collection.
//!
//! A [`Person`] is the immutable item the whole pipeline works on. Records are
//! decoded once per successful load (see [`super::decode`]) and then shared
//! read-only through [`Collection`], which wraps them in an `Arc<[Person]>` so
//! the filter and render stages can hold onto them without copying.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Stable identifier of a person within a collection.
///
/// Numeric ids from the source are stored in their decimal form, string ids
/// (randomuser's `login.uuid`) verbatim, and records without a usable id get a
/// positional `#<n>` id. Decoding suffixes repeats, so ids never clash within
/// one collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Positional fallback id for records whose source id is missing.
    #[must_use]
    pub fn positional(index: usize) -> Self {
        Self(format!("#{}", index + 1))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for PersonId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Fields of a person that can be searched or used as a facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Username,
    Email,
    Phone,
    Website,
    City,
    Company,
    Gender,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::Username,
        Self::Email,
        Self::Phone,
        Self::Website,
        Self::City,
        Self::Company,
        Self::Gender,
    ];

    /// Configuration key for this field (`"city"`, `"company"`, ...).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Username => "username",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Website => "website",
            Self::City => "city",
            Self::Company => "company",
            Self::Gender => "gender",
        }
    }

    /// Human-readable label used in the filter bar and detail rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Website => "Website",
            Self::City => "City",
            Self::Company => "Company",
            Self::Gender => "Gender",
        }
    }

    /// Parses a configuration key, case-insensitively. `department` is
    /// accepted as an alias for `company`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        if key == "department" {
            return Some(Self::Company);
        }
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// A single person record.
///
/// Every display field is a plain `String`; absent or unusable source values
/// are stored as `""`. `gender` and `picture_url` are optional because only
/// some sources provide them at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub city: String,
    pub company: String,
    pub gender: Option<String>,
    pub picture_url: Option<String>,
}

impl Person {
    /// Creates a person with the given id and name and every other field empty.
    #[must_use]
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            city: String::new(),
            company: String::new(),
            gender: None,
            picture_url: None,
        }
    }

    /// Returns the value of `field`, or `""` if the record has none.
    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Website => &self.website,
            Field::City => &self.city,
            Field::Company => &self.company,
            Field::Gender => self.gender.as_deref().unwrap_or_default(),
        }
    }
}

/// Wire shape a collection was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// A bare JSON array of users with nested `address.city` and `company.name`.
    Placeholder,
    /// A `{"results": [...]}` envelope with nested `name`, `login`, `location`.
    RandomUser,
}

/// An ordered set of people produced by one successful load.
///
/// Replaced wholesale on reload and never mutated in place; cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    people: Arc<[Person]>,
    /// Unix timestamp (seconds) of the load that produced this collection.
    pub loaded_at: i64,
    pub format: SourceFormat,
}

impl Collection {
    #[must_use]
    pub fn new(people: Vec<Person>, loaded_at: i64, format: SourceFormat) -> Self {
        Self {
            people: people.into(),
            loaded_at,
            format,
        }
    }

    /// An empty collection, used before the first successful load.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, SourceFormat::Placeholder)
    }

    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Person> {
        self.people.get(index)
    }

    /// The person with `id`, if present.
    #[must_use]
    pub fn find(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|person| &person.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Returns a human-readable string describing how long ago the
    /// collection was loaded, relative to `now` (unix seconds).
    ///
    /// - under a minute: "just now"
    /// - under an hour: "Xm ago"
    /// - under a day: "Xh ago"
    /// - otherwise: "Xd ago"
    #[must_use]
    pub fn loaded_ago(&self, now: i64) -> String {
        let diff = now - self.loaded_at;

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key(" City "), Some(Field::City));
        assert_eq!(Field::from_key("department"), Some(Field::Company));
        assert_eq!(Field::from_key("zip"), None);
    }

    #[test]
    fn missing_gender_reads_as_empty() {
        let person = Person::new(1, "Leanne Graham");
        assert_eq!(person.field(Field::Gender), "");
        assert_eq!(person.field(Field::Name), "Leanne Graham");
    }

    #[test]
    fn loaded_ago_buckets() {
        let collection = Collection::new(vec![], 1_000_000, SourceFormat::Placeholder);
        assert_eq!(collection.loaded_ago(1_000_030), "just now");
        assert_eq!(collection.loaded_ago(1_000_000 + 5 * 60), "5m ago");
        assert_eq!(collection.loaded_ago(1_000_000 + 3 * 3600), "3h ago");
        assert_eq!(collection.loaded_ago(1_000_000 + 7 * 86400), "7d ago");
    }

    #[test]
    fn positional_ids_are_one_based() {
        assert_eq!(PersonId::positional(0).as_str(), "#1");
        assert_eq!(PersonId::positional(9).to_string(), "#10");
    }

    #[test]
    fn find_looks_up_by_id() {
        let collection = Collection::new(
            vec![Person::new(1, "Leanne Graham"), Person::new(2, "Ervin Howell")],
            0,
            SourceFormat::Placeholder,
        );
        assert_eq!(collection.find(&PersonId::from(2)).map(|p| p.name.as_str()), Some("Ervin Howell"));
        assert!(collection.find(&PersonId::from(3)).is_none());
    }
}

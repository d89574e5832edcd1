//! Response body decoding.
//!
//! Turns the raw bytes of a collection response into a [`Collection`]. Two wire
//! shapes are understood and told apart by the top-level JSON value:
//!
//! - a bare array of jsonplaceholder-style users
//!   (`{"id": 1, "name": .., "address": {"city": ..}, "company": {"name": ..}}`)
//! - a randomuser-style envelope
//!   (`{"results": [{"name": {"first": .., "last": ..}, "login": {..}, ..}]}`)
//!
//! Records are read by walking `serde_json::Value` rather than deserializing
//! into strict structs, so a missing or mistyped field only blanks that field.
//! Array entries that are not JSON objects are skipped.
//!
//! Ids are unique within the decoded collection: a repeated id gets a `~<n>`
//! suffix (`1`, `1~2`, ..), whether it came from the source or the positional
//! fallback.

use super::error::{Result, RosterError};
use super::person::{Collection, Person, PersonId, SourceFormat};
use serde_json::Value;
use std::collections::HashSet;

/// Decodes a response body into a collection stamped with `loaded_at`.
///
/// # Errors
///
/// Returns [`RosterError::MalformedData`] if the body is not JSON or is
/// neither an array nor an object with a `results` array.
pub fn decode_collection(body: &[u8], loaded_at: i64) -> Result<Collection> {
    let _span = tracing::debug_span!("decode_collection", body_len = body.len()).entered();

    let root: Value = serde_json::from_slice(body)
        .map_err(|e| RosterError::MalformedData(format!("response is not valid JSON: {e}")))?;

    let (records, format) = match &root {
        Value::Array(records) => (records, SourceFormat::Placeholder),
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(records)) => (records, SourceFormat::RandomUser),
            _ => {
                return Err(RosterError::MalformedData(
                    "expected a list of people or a `results` list".to_string(),
                ))
            }
        },
        _ => {
            return Err(RosterError::MalformedData(
                "expected a list of people or a `results` list".to_string(),
            ))
        }
    };

    let mut skipped = 0_usize;
    let mut people: Vec<Person> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if !record.is_object() {
                skipped += 1;
                return None;
            }
            Some(match format {
                SourceFormat::Placeholder => placeholder_person(record, index),
                SourceFormat::RandomUser => random_user_person(record, index),
            })
        })
        .collect();

    if skipped > 0 {
        tracing::warn!(skipped, "skipped non-object records in response");
    }
    let renamed = make_ids_unique(&mut people);
    if renamed > 0 {
        tracing::warn!(renamed, "renamed duplicate person ids");
    }
    tracing::debug!(count = people.len(), format = ?format, "collection decoded");

    Ok(Collection::new(people, loaded_at, format))
}

fn placeholder_person(record: &Value, index: usize) -> Person {
    Person {
        id: id_at(record, &["id"], index),
        name: text_at(record, &["name"]),
        username: text_at(record, &["username"]),
        email: text_at(record, &["email"]),
        phone: text_at(record, &["phone"]),
        website: text_at(record, &["website"]),
        city: text_at(record, &["address", "city"]),
        company: text_at(record, &["company", "name"]),
        gender: optional_text_at(record, &["gender"]),
        picture_url: optional_text_at(record, &["picture"]),
    }
}

fn random_user_person(record: &Value, index: usize) -> Person {
    let first = text_at(record, &["name", "first"]);
    let last = text_at(record, &["name", "last"]);
    let name = match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first,
        (true, false) => last,
        (true, true) => String::new(),
    };

    Person {
        id: id_at(record, &["login", "uuid"], index),
        name,
        username: text_at(record, &["login", "username"]),
        email: text_at(record, &["email"]),
        phone: text_at(record, &["phone"]),
        website: String::new(),
        city: text_at(record, &["location", "city"]),
        company: String::new(),
        gender: optional_text_at(record, &["gender"]),
        picture_url: optional_text_at(record, &["picture", "large"]),
    }
}

fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |value, key| value.get(key))
}

/// Reads a scalar at `path` as text. Strings are taken verbatim, numbers and
/// booleans are rendered, anything else reads as `""`.
fn text_at(record: &Value, path: &[&str]) -> String {
    match lookup(record, path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn optional_text_at(record: &Value, path: &[&str]) -> Option<String> {
    Some(text_at(record, path)).filter(|s| !s.is_empty())
}

fn id_at(record: &Value, path: &[&str], index: usize) -> PersonId {
    let id = text_at(record, path);
    if id.is_empty() {
        PersonId::positional(index)
    } else {
        PersonId::new(id)
    }
}

/// Suffixes repeated ids so every person keeps a distinct one. Returns how
/// many ids were changed.
fn make_ids_unique(people: &mut [Person]) -> usize {
    let mut seen: HashSet<PersonId> = HashSet::with_capacity(people.len());
    let mut renamed = 0;

    for person in people.iter_mut() {
        if seen.contains(&person.id) {
            let base = person.id.as_str().to_string();
            let unique = (2_usize..)
                .map(|n| PersonId::new(format!("{base}~{n}")))
                .find(|candidate| !seen.contains(candidate))
                .unwrap_or_else(|| PersonId::new(base));
            person.id = unique;
            renamed += 1;
        }
        seen.insert(person.id.clone());
    }
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = r#"[
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": { "street": "Kulas Light", "city": "Gwenborough" },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": { "name": "Romaguera-Crona" }
        },
        {
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv",
            "address": { "city": "Wisokyburgh" },
            "phone": "010-692-6593 x09125",
            "website": "anastasia.net",
            "company": { "name": "Deckow-Crist" }
        }
    ]"#;

    #[test]
    fn decodes_placeholder_array() {
        let collection = decode_collection(PLACEHOLDER.as_bytes(), 42).unwrap();

        assert_eq!(collection.format, SourceFormat::Placeholder);
        assert_eq!(collection.loaded_at, 42);
        assert_eq!(collection.len(), 2);

        let first = &collection.people()[0];
        assert_eq!(first.id.as_str(), "1");
        assert_eq!(first.city, "Gwenborough");
        assert_eq!(first.company, "Romaguera-Crona");
        assert_eq!(first.gender, None);
    }

    #[test]
    fn decodes_random_user_envelope() {
        let body = r#"{
            "results": [{
                "gender": "female",
                "name": { "title": "Ms", "first": "Ava", "last": "Moore" },
                "location": { "city": "Dunedin" },
                "email": "ava.moore@example.com",
                "login": { "uuid": "4f2c", "username": "bluefish" },
                "phone": "(123)-456-7890",
                "picture": { "large": "https://randomuser.me/api/portraits/women/1.jpg" }
            }],
            "info": { "results": 1 }
        }"#;

        let collection = decode_collection(body.as_bytes(), 0).unwrap();
        assert_eq!(collection.format, SourceFormat::RandomUser);

        let ava = &collection.people()[0];
        assert_eq!(ava.id.as_str(), "4f2c");
        assert_eq!(ava.name, "Ava Moore");
        assert_eq!(ava.username, "bluefish");
        assert_eq!(ava.city, "Dunedin");
        assert_eq!(ava.gender.as_deref(), Some("female"));
        assert!(ava.picture_url.as_deref().unwrap().ends_with("1.jpg"));
    }

    #[test]
    fn bad_fields_degrade_per_field() {
        let body = r#"[
            { "id": 7, "name": null, "email": ["not", "a", "string"], "address": "nowhere" },
            "garbage",
            { "name": "No Id" }
        ]"#;

        let collection = decode_collection(body.as_bytes(), 0).unwrap();
        assert_eq!(collection.len(), 2);

        let broken = &collection.people()[0];
        assert_eq!(broken.id.as_str(), "7");
        assert_eq!(broken.name, "");
        assert_eq!(broken.email, "");
        assert_eq!(broken.city, "");

        let anonymous = &collection.people()[1];
        assert_eq!(anonymous.id.as_str(), "#3");
        assert_eq!(anonymous.name, "No Id");
    }

    #[test]
    fn positional_ids_never_collide_with_source_ids() {
        let body = r##"[{"id": "#2", "name": "Alpha"}, {"name": "Beta"}]"##;
        let collection = decode_collection(body.as_bytes(), 0).unwrap();

        let ids: Vec<&str> = collection.people().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["#2", "#2~2"]);
    }

    #[test]
    fn duplicate_source_ids_are_suffixed() {
        let body = r#"[
            {"id": 1, "name": "Alpha"},
            {"id": 1, "name": "Beta"},
            {"id": "1~2", "name": "Gamma"},
            {"id": 1, "name": "Delta"}
        ]"#;
        let collection = decode_collection(body.as_bytes(), 0).unwrap();

        let ids: Vec<&str> = collection.people().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "1~2", "1~2~2", "1~3"]);
    }

    #[test]
    fn rejects_non_collection_bodies() {
        assert!(matches!(
            decode_collection(b"<html>oops</html>", 0),
            Err(RosterError::MalformedData(_))
        ));
        assert!(matches!(
            decode_collection(br#"{"error": "rate limited"}"#, 0),
            Err(RosterError::MalformedData(_))
        ));
        assert!(matches!(
            decode_collection(b"17", 0),
            Err(RosterError::MalformedData(_))
        ));
    }
}

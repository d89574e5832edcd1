//! Domain layer for the rosterview plugin.
//!
//! Core types for the people directory, independent of Zellij APIs and of how
//! the list is drawn.
//!
//! # Organization
//!
//! - [`appearance`]: The persisted light/dark preference
//! - [`error`]: Error types and result aliases
//! - [`person`]: Person records, field names and the loaded collection
//! - [`decode`]: Response body decoding for the supported wire shapes
//!
//! # Examples
//!
//! ```
//! use rosterview::domain::{decode_collection, Field, Result};
//!
//! fn first_city(body: &[u8]) -> Result<String> {
//!     let collection = decode_collection(body, 0)?;
//!     Ok(collection
//!         .get(0)
//!         .map(|person| person.field(Field::City).to_string())
//!         .unwrap_or_default())
//! }
//!
//! let body = br#"[{"id": 1, "name": "Leanne", "address": {"city": "Gwenborough"}}]"#;
//! assert_eq!(first_city(body).unwrap(), "Gwenborough");
//! ```

pub mod appearance;
pub mod decode;
pub mod error;
pub mod person;

pub use appearance::{Appearance, THEME_PREFERENCE_KEY};
pub use decode::decode_collection;
pub use error::{Result, RosterError};
pub use person::{Collection, Field, Person, PersonId, SourceFormat};

// Author domain models

//! # Author Models
//!
//! - `Author`: a stored author record
//! - `NewAuthor`: the fields needed to create one
//! - `AuthorSummary`: an author plus the number of books attributed to it
//!
//! `born` is optional; `None` means the birth year is unknown. The book count
//! is never stored on the author, it is derived from the book collection every
//! time a summary is built.

use serde::{Deserialize, Serialize};

/// A stored author
///
/// The `id` is assigned by the storage backend and never changes afterwards.
/// Only `born` may be amended once the author exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Opaque identifier generated by the store
    pub id: String,

    /// Display name, also the key books use to reference their author
    pub name: String,

    /// Birth year, if known
    pub born: Option<i32>,
}

impl Author {
    /// Return a copy of this author with a new birth year
    ///
    /// Every other field is carried over untouched.
    pub fn with_born(&self, year: i32) -> Self {
        Self {
            born: Some(year),
            ..self.clone()
        }
    }
}

/// An author that has not been stored yet
///
/// ## Rust Learning Notes:
///
/// ### Builder-style Methods
/// `NewAuthor::new("name").born(1821)` consumes `self` and returns the updated
/// value, which lets optional fields be chained onto the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub born: Option<i32>,
}

impl NewAuthor {
    /// Create an author with an unknown birth year
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            born: None,
        }
    }

    /// Set the birth year
    pub fn born(mut self, year: i32) -> Self {
        self.born = Some(year);
        self
    }

    /// Attach a generated id, producing the stored form
    pub fn into_author(self, id: impl Into<String>) -> Author {
        Author {
            id: id.into(),
            name: self.name,
            born: self.born,
        }
    }
}

/// An author annotated with its derived book count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub author: Author,
    pub book_count: u64,
}

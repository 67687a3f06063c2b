// Book domain models

use serde::{Deserialize, Serialize};

/// A stored book
///
/// `author` holds the author's name. `author_id` is the author record the
/// store linked the book to when it was inserted; names are not unique in
/// every store, so the id is the reliable way back to the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Opaque identifier generated by the store
    pub id: String,
    pub title: String,
    /// Publication year
    pub published: i32,
    /// Name of the author
    pub author: String,
    /// Genres in the order they were given
    pub genres: Vec<String>,
    /// Id of the linked author, when the store recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

impl Book {
    /// Whether `genre` appears in this book's genre list (exact match)
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Whether this book was written by the author called `name` (case-sensitive)
    pub fn is_by(&self, name: &str) -> bool {
        self.author == name
    }

    /// Record the author this book is linked to
    pub fn linked_to(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }
}

/// A book that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub published: i32,
    pub author: String,
    pub genres: Vec<String>,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        published: i32,
        author: impl Into<String>,
        genres: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            published,
            author: author.into(),
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a generated id, producing the stored form
    pub fn into_book(self, id: impl Into<String>) -> Book {
        Book {
            id: id.into(),
            title: self.title,
            published: self.published,
            author: self.author,
            genres: self.genres,
            author_id: None,
        }
    }
}

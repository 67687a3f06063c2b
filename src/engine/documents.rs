// MongoDB document mapping for authors and books

//! # Document Mapper
//!
//! Typed documents stored in the `authors` and `books` collections. Field
//! constraints are declared with `validator` derives, and every conversion
//! from a domain record into a document checks them, so a record that breaks
//! a constraint never reaches the database.
//!
//! ## Document Shapes
//!
//! ```text
//! authors: { _id: ObjectId, name: String, born?: Int32 }
//! books:   { _id: ObjectId, title: String, published: Int32,
//!            author: { id: ObjectId, name: String }, genres: [String] }
//! ```
//!
//! Books embed a link to their author (id plus name). Filtering by author name
//! and counting an author's books both query `author.name`; resolving a book's
//! author follows `author.id`.

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::engine::filter::BookFilter;
use crate::models::{Author, Book, NewAuthor, NewBook};
use crate::{LibraryError, Result};

/// Author as stored in the `authors` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AuthorDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub born: Option<i32>,
}

/// Link from a book to its author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AuthorLink {
    pub id: ObjectId,
    #[validate(length(min = 1))]
    pub name: String,
}

/// Book as stored in the `books` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[validate(length(min = 1))]
    pub title: String,
    pub published: i32,
    #[validate]
    pub author: AuthorLink,
    #[serde(default)]
    #[validate(custom = "no_blank_genres")]
    pub genres: Vec<String>,
}

fn no_blank_genres(genres: &[String]) -> std::result::Result<(), ValidationError> {
    if genres.iter().any(|g| g.trim().is_empty()) {
        return Err(ValidationError::new("blank_genre"));
    }
    Ok(())
}

/// Run the derived constraints, naming the offending fields on failure
fn check_fields(entity: &str, document: &impl Validate) -> Result<()> {
    document
        .validate()
        .map_err(|errors| invalid_fields(entity, &errors))
}

fn invalid_fields(entity: &str, errors: &ValidationErrors) -> LibraryError {
    let mut fields: Vec<&str> = errors.errors().keys().copied().collect();
    fields.sort_unstable();
    LibraryError::Validation(format!(
        "{} validation failed: invalid {}",
        entity,
        fields.join(", ")
    ))
}

fn parse_object_id(entity: &str, id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| {
        LibraryError::Validation(format!("{} validation failed: invalid id '{}'", entity, id))
    })
}

impl AuthorDocument {
    /// Build a document with a fresh id for an author being created
    pub fn from_new(author: NewAuthor) -> Result<Self> {
        let document = Self {
            id: ObjectId::new(),
            name: author.name,
            born: author.born,
        };
        document.check()?;
        Ok(document)
    }

    /// Build the document for an existing author
    pub fn from_author(author: &Author) -> Result<Self> {
        let document = Self {
            id: parse_object_id("author", &author.id)?,
            name: author.name.clone(),
            born: author.born,
        };
        document.check()?;
        Ok(document)
    }

    pub fn check(&self) -> Result<()> {
        check_fields("author", self)
    }

    pub fn link(&self) -> AuthorLink {
        AuthorLink {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl From<AuthorDocument> for Author {
    fn from(document: AuthorDocument) -> Self {
        Author {
            id: document.id.to_hex(),
            name: document.name,
            born: document.born,
        }
    }
}

impl BookDocument {
    /// Build a document with a fresh id for a book written by `author`
    ///
    /// ## Errors
    /// - `Validation` when `author` is `None` (the name resolved to nothing) or
    ///   a required field is empty
    pub fn from_new(book: NewBook, author: Option<&AuthorDocument>) -> Result<Self> {
        let author = author.ok_or_else(|| {
            LibraryError::Validation(format!(
                "book validation failed: author '{}' does not exist",
                book.author
            ))
        })?;

        let document = Self {
            id: ObjectId::new(),
            title: book.title,
            published: book.published,
            author: author.link(),
            genres: book.genres,
        };
        document.check()?;
        Ok(document)
    }

    pub fn check(&self) -> Result<()> {
        check_fields("book", self)
    }
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Book {
            id: document.id.to_hex(),
            title: document.title,
            published: document.published,
            author: document.author.name,
            genres: document.genres,
            author_id: Some(document.author.id.to_hex()),
        }
    }
}

/// Translate a book filter into a `books` collection query
pub fn book_query(filter: &BookFilter) -> Document {
    let mut query = Document::new();
    if let Some(author) = &filter.author {
        query.insert("author.name", author.as_str());
    }
    if let Some(genre) = &filter.genre {
        // Matching a scalar against an array field checks membership
        query.insert("genres", genre.as_str());
    }
    query
}

/// Query for the books written by the author called `name`
pub fn books_by_author_query(name: &str) -> Document {
    doc! { "author.name": name }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dostoevsky() -> AuthorDocument {
        AuthorDocument::from_new(NewAuthor::new("Fyodor Dostoevsky").born(1821)).unwrap()
    }

    #[test]
    fn test_author_document_requires_a_name() {
        let result = AuthorDocument::from_new(NewAuthor::new(""));

        match result {
            Err(LibraryError::Validation(message)) => assert!(message.contains("name")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_author_round_trips_through_domain_id() {
        let document = dostoevsky();
        let author = Author::from(document.clone());

        assert_eq!(author.id, document.id.to_hex());
        let back = AuthorDocument::from_author(&author).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn test_author_with_foreign_id_is_rejected() {
        let author = NewAuthor::new("Sandi Metz").into_author("not-an-object-id");

        assert!(matches!(
            AuthorDocument::from_author(&author),
            Err(LibraryError::Validation(_))
        ));
    }

    #[test]
    fn test_book_document_links_author() {
        let author = dostoevsky();
        let book = BookDocument::from_new(
            NewBook::new("Crime and punishment", 1866, "Fyodor Dostoevsky", ["classic", "crime"]),
            Some(&author),
        )
        .unwrap();

        assert_eq!(book.author.id, author.id);
        assert_eq!(book.author.name, "Fyodor Dostoevsky");

        let domain = Book::from(book);
        assert_eq!(domain.author, "Fyodor Dostoevsky");
        assert_eq!(domain.author_id, Some(author.id.to_hex()));
        assert_eq!(domain.genres, vec!["classic", "crime"]);
    }

    #[test]
    fn test_book_without_author_is_rejected() {
        let result = BookDocument::from_new(
            NewBook::new("The Demon", 1872, "Nobody", ["classic"]),
            None,
        );

        match result {
            Err(LibraryError::Validation(message)) => assert!(message.contains("Nobody")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_book_field_constraints() {
        let author = dostoevsky();

        let untitled = BookDocument::from_new(
            NewBook::new("", 1866, "Fyodor Dostoevsky", ["classic"]),
            Some(&author),
        );
        assert!(matches!(untitled, Err(LibraryError::Validation(_))));

        let blank_genre = BookDocument::from_new(
            NewBook::new("The Idiot", 1869, "Fyodor Dostoevsky", ["classic", "  "]),
            Some(&author),
        );
        match blank_genre {
            Err(LibraryError::Validation(message)) => assert!(message.contains("genres")),
            other => panic!("expected validation error, got {:?}", other),
        }

        let idiot = tokio_test::assert_ok!(BookDocument::from_new(
            NewBook::new("The Idiot", 1869, "Fyodor Dostoevsky", ["classic"]),
            Some(&author),
        ));
        tokio_test::assert_ok!(idiot.check());
    }

    #[test]
    fn test_author_link_survives_duplicate_names() {
        // Two authors share a name; the book keeps the one it was linked to
        let elder = dostoevsky();
        let namesake = AuthorDocument::from_new(NewAuthor::new("Fyodor Dostoevsky")).unwrap();

        let book = BookDocument::from_new(
            NewBook::new("Poor Folk", 1846, "Fyodor Dostoevsky", ["epistolary"]),
            Some(&namesake),
        )
        .unwrap();

        let domain = Book::from(book);
        assert_eq!(domain.author_id, Some(namesake.id.to_hex()));
        assert_ne!(domain.author_id, Some(elder.id.to_hex()));
    }

    #[test]
    fn test_nested_author_link_is_checked() {
        let mut book = BookDocument::from_new(
            NewBook::new("Crime and punishment", 1866, "Fyodor Dostoevsky", ["classic"]),
            Some(&dostoevsky()),
        )
        .unwrap();
        book.author.name.clear();

        tokio_test::assert_err!(book.check());
    }

    #[test]
    fn test_book_query_translation() {
        assert_eq!(book_query(&BookFilter::all()), doc! {});
        assert_eq!(book_query(&BookFilter::by_genre("crime")), doc! { "genres": "crime" });
        assert_eq!(
            book_query(&BookFilter::by_author("Robert Martin")),
            doc! { "author.name": "Robert Martin" }
        );
        assert_eq!(
            book_query(&BookFilter::by_author("Robert Martin").with_genre("agile")),
            doc! { "author.name": "Robert Martin", "genres": "agile" }
        );
        assert_eq!(
            books_by_author_query("Sandi Metz"),
            doc! { "author.name": "Sandi Metz" }
        );
    }
}

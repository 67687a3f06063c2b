// Storage abstraction for the library catalogue
// This defines the interface for persisting authors and books

//! # Storage Abstraction Layer
//!
//! The catalogue persists authors and books through the [`LibraryStorage`]
//! trait. Two implementations exist:
//! - [`InMemoryStorage`]: ordered vectors held in the process (this file)
//! - [`MongoStorage`](crate::engine::mongo_storage::MongoStorage): MongoDB
//!   collections accessed through validated documents
//!
//! ## Identifiers
//!
//! Callers hand the store a `NewAuthor` / `NewBook` and get back the stored
//! record. The store is the only place ids are generated, and no operation
//! ever rewrites an id.
//!
//! ## Author Policy
//!
//! Books reference their author by name. What happens when that name is
//! unknown depends on the backend, see [`AuthorPolicy`].
//!
//! ## Rust Learning Notes:
//!
//! ### Async Traits
//! The `async-trait` crate lets trait methods be `async`. The storage is shared
//! as `Arc<dyn LibraryStorage>`, which requires the `Send + Sync` bounds.
//!
//! ### Interior Mutability
//! `InMemoryStorage` takes `&self` in every method and mutates its vectors
//! through `RwLock` guards. Guards are dropped before any `.await`.

use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::engine::filter::BookFilter;
use crate::models::{Author, Book, NewAuthor, NewBook};
use crate::{LibraryError, Result};

/// How a book's author name is resolved when the book is added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorPolicy {
    /// Create the author (no birth year) when no author has the name
    AutoCreate,
    /// Reject the book when no author has the name
    RequireExisting,
}

/// Storage trait for author and book persistence
///
/// ## Return Values
/// - `Ok(Some(x))` / `Ok(None)`: lookup succeeded, record found or absent
/// - `Err(LibraryError::Validation(_))`: the record broke a field constraint
/// - `Err(LibraryError::Storage(_))`: the backend failed
#[async_trait::async_trait]
pub trait LibraryStorage: Send + Sync {
    /// Short backend name used in logs and the health check
    fn backend_name(&self) -> &'static str;

    /// How unknown author names are handled when adding a book
    fn author_policy(&self) -> AuthorPolicy;

    /// Total number of books
    async fn count_books(&self) -> Result<u64>;

    /// Total number of authors
    async fn count_authors(&self) -> Result<u64>;

    /// Books matching `filter`
    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>>;

    /// Every author
    async fn find_authors(&self) -> Result<Vec<Author>>;

    /// First author whose name is exactly `name`
    async fn find_author_by_name(&self, name: &str) -> Result<Option<Author>>;

    /// Author with id `id`; `None` for unknown or malformed ids
    async fn find_author_by_id(&self, id: &str) -> Result<Option<Author>>;

    /// Number of books whose author is exactly `name`
    async fn count_books_by_author(&self, name: &str) -> Result<u64>;

    /// Store a new author and return it with its generated id
    async fn insert_author(&self, author: NewAuthor) -> Result<Author>;

    /// Store a new book, linked to its author when one exists, and return it
    /// with its generated id
    async fn insert_book(&self, book: NewBook) -> Result<Book>;

    /// Replace the stored author that has `author.id`
    ///
    /// ## Errors
    /// - `NotFound` when no author has that id
    async fn update_author(&self, author: Author) -> Result<Author>;

    /// Return the author called `name`, creating it when absent
    ///
    /// The boolean is `true` when a new author was created. Backends that can
    /// do the lookup and the insert atomically should override this.
    async fn find_or_insert_author(&self, name: &str) -> Result<(Author, bool)> {
        if let Some(author) = self.find_author_by_name(name).await? {
            return Ok((author, false));
        }
        let author = self.insert_author(NewAuthor::new(name)).await?;
        Ok((author, true))
    }
}

/// In-memory storage implementation for development and testing
///
/// Authors and books live in two ordered vectors. Reads are linear scans that
/// return records in insertion order; `update_author` rebuilds the author
/// vector with the replaced element.
///
/// ## Limitations
///
/// - **Not persistent**: data is lost when the process exits
/// - **Not distributed**: each process has its own catalogue
pub struct InMemoryStorage {
    authors: RwLock<Vec<Author>>,
    books: RwLock<Vec<Book>>,
    policy: AuthorPolicy,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::with_policy(AuthorPolicy::AutoCreate)
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a specific author policy
    pub fn with_policy(policy: AuthorPolicy) -> Self {
        Self {
            authors: RwLock::new(Vec::new()),
            books: RwLock::new(Vec::new()),
            policy,
        }
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> LibraryError {
    LibraryError::Internal("in-memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl LibraryStorage for InMemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn author_policy(&self) -> AuthorPolicy {
        self.policy
    }

    async fn count_books(&self) -> Result<u64> {
        let books = self.books.read().map_err(poisoned)?;
        Ok(books.len() as u64)
    }

    async fn count_authors(&self) -> Result<u64> {
        let authors = self.authors.read().map_err(poisoned)?;
        Ok(authors.len() as u64)
    }

    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let books = self.books.read().map_err(poisoned)?;
        if filter.is_unfiltered() {
            return Ok(books.clone());
        }
        Ok(filter.apply(books.iter()))
    }

    async fn find_authors(&self) -> Result<Vec<Author>> {
        let authors = self.authors.read().map_err(poisoned)?;
        Ok(authors.clone())
    }

    async fn find_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        let authors = self.authors.read().map_err(poisoned)?;
        Ok(authors.iter().find(|a| a.name == name).cloned())
    }

    async fn find_author_by_id(&self, id: &str) -> Result<Option<Author>> {
        let authors = self.authors.read().map_err(poisoned)?;
        Ok(authors.iter().find(|a| a.id == id).cloned())
    }

    async fn count_books_by_author(&self, name: &str) -> Result<u64> {
        let books = self.books.read().map_err(poisoned)?;
        Ok(books.iter().filter(|b| b.is_by(name)).count() as u64)
    }

    async fn insert_author(&self, author: NewAuthor) -> Result<Author> {
        let author = author.into_author(Self::next_id());
        let mut authors = self.authors.write().map_err(poisoned)?;
        authors.push(author.clone());
        Ok(author)
    }

    async fn insert_book(&self, book: NewBook) -> Result<Book> {
        let author_id = {
            let authors = self.authors.read().map_err(poisoned)?;
            authors
                .iter()
                .find(|a| a.name == book.author)
                .map(|a| a.id.clone())
        };

        let mut book = book.into_book(Self::next_id());
        if let Some(author_id) = author_id {
            book = book.linked_to(author_id);
        }
        let mut books = self.books.write().map_err(poisoned)?;
        books.push(book.clone());
        Ok(book)
    }

    async fn update_author(&self, author: Author) -> Result<Author> {
        let mut authors = self.authors.write().map_err(poisoned)?;
        if !authors.iter().any(|a| a.id == author.id) {
            return Err(LibraryError::NotFound(format!("author {}", author.id)));
        }

        // Rebuild the sequence with the replaced element
        let rebuilt: Vec<Author> = authors
            .iter()
            .map(|a| if a.id == author.id { author.clone() } else { a.clone() })
            .collect();
        *authors = rebuilt;

        Ok(author)
    }

    async fn find_or_insert_author(&self, name: &str) -> Result<(Author, bool)> {
        // One write guard for the lookup and the push, so two concurrent
        // books for the same new author create it only once
        let mut authors = self.authors.write().map_err(poisoned)?;
        if let Some(existing) = authors.iter().find(|a| a.name == name) {
            return Ok((existing.clone(), false));
        }
        let author = NewAuthor::new(name).into_author(Self::next_id());
        authors.push(author.clone());
        Ok((author, true))
    }
}

// Library service - the operations behind every resolver

//! # Library Service
//!
//! [`Library`] wraps a shared [`LibraryStorage`] and implements the catalogue's
//! operations independently of GraphQL:
//!
//! - counts and filtered listings
//! - author summaries with a derived book count
//! - [`Library::resolve_author`]: the "resolve-or-create" step run before a
//!   book is stored, governed by the store's [`AuthorPolicy`]
//! - adding authors and books, and amending an author's birth year
//!
//! The resolvers in [`graphql`](crate::engine::graphql) only translate
//! arguments and results; every rule lives here.

use std::sync::Arc;

use tracing::{debug, info};

use crate::engine::filter::BookFilter;
use crate::engine::storage::{AuthorPolicy, LibraryStorage};
use crate::models::{Author, AuthorSummary, Book, NewAuthor, NewBook};
use crate::{LibraryError, Result};

/// Outcome of resolving a book's author name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorResolution {
    /// An author with that name already existed
    Existing(Author),
    /// No author matched and one was created
    Created(Author),
}

impl AuthorResolution {
    pub fn author(&self) -> &Author {
        match self {
            AuthorResolution::Existing(author) | AuthorResolution::Created(author) => author,
        }
    }

    pub fn into_author(self) -> Author {
        match self {
            AuthorResolution::Existing(author) | AuthorResolution::Created(author) => author,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, AuthorResolution::Created(_))
    }
}

/// Catalogue operations over an injected store
#[derive(Clone)]
pub struct Library {
    storage: Arc<dyn LibraryStorage>,
}

impl Library {
    pub fn new(storage: Arc<dyn LibraryStorage>) -> Self {
        Self { storage }
    }

    pub async fn book_count(&self) -> Result<u64> {
        self.storage.count_books().await
    }

    pub async fn author_count(&self) -> Result<u64> {
        self.storage.count_authors().await
    }

    /// Books matching `filter`
    pub async fn all_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        debug!(author = ?filter.author, genre = ?filter.genre, "listing books");
        self.storage.find_books(filter).await
    }

    /// Every author with the number of books attributed to it
    ///
    /// The count is recomputed from the current book collection on every call.
    pub async fn all_authors(&self) -> Result<Vec<AuthorSummary>> {
        let authors = self.storage.find_authors().await?;
        let mut summaries = Vec::with_capacity(authors.len());
        for author in authors {
            let book_count = self.storage.count_books_by_author(&author.name).await?;
            summaries.push(AuthorSummary { author, book_count });
        }
        Ok(summaries)
    }

    /// The author a book refers to
    ///
    /// Follows the book's author link when it has one and falls back to the
    /// first author with the book's author name.
    pub async fn book_author(
        &self,
        author_id: Option<&str>,
        name: &str,
    ) -> Result<Option<Author>> {
        if let Some(id) = author_id {
            if let Some(author) = self.storage.find_author_by_id(id).await? {
                return Ok(Some(author));
            }
            debug!("dangling author link {} for '{}'", id, name);
        }
        self.storage.find_author_by_name(name).await
    }

    pub async fn book_count_for(&self, author_name: &str) -> Result<u64> {
        self.storage.count_books_by_author(author_name).await
    }

    /// Resolve the author a new book refers to
    ///
    /// ## Behaviour by policy
    /// - `AutoCreate`: return the existing author, or create exactly one with
    ///   the given name and no birth year
    /// - `RequireExisting`: return the existing author, or fail with
    ///   `Validation`
    pub async fn resolve_author(&self, name: &str) -> Result<AuthorResolution> {
        match self.storage.author_policy() {
            AuthorPolicy::AutoCreate => {
                let (author, created) = self.storage.find_or_insert_author(name).await?;
                if created {
                    info!("📚 Created author '{}' while adding a book", author.name);
                    Ok(AuthorResolution::Created(author))
                } else {
                    Ok(AuthorResolution::Existing(author))
                }
            }
            AuthorPolicy::RequireExisting => match self.storage.find_author_by_name(name).await? {
                Some(author) => Ok(AuthorResolution::Existing(author)),
                None => Err(LibraryError::Validation(format!(
                    "author '{}' does not exist",
                    name
                ))),
            },
        }
    }

    pub async fn add_author(&self, author: NewAuthor) -> Result<Author> {
        let author = self.storage.insert_author(author).await?;
        info!("✅ Added author '{}' ({})", author.name, author.id);
        Ok(author)
    }

    /// Resolve the author, then store the book
    pub async fn add_book(&self, book: NewBook) -> Result<Book> {
        let resolution = self.resolve_author(&book.author).await?;
        debug!(
            author = %resolution.author().name,
            created = resolution.was_created(),
            "resolved book author"
        );

        let book = self.storage.insert_book(book).await?;
        info!("✅ Added book '{}' ({})", book.title, book.id);
        Ok(book)
    }

    /// Set the birth year of the author called `name`
    ///
    /// Returns `Ok(None)` when no author has that name. Only `born` changes.
    pub async fn edit_author(&self, name: &str, born: i32) -> Result<Option<Author>> {
        let Some(author) = self.storage.find_author_by_name(name).await? else {
            debug!("editAuthor: no author named '{}'", name);
            return Ok(None);
        };

        let updated = self.storage.update_author(author.with_born(born)).await?;
        info!("✏️ Set birth year of '{}' to {}", updated.name, born);
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::InMemoryStorage;

    fn library() -> Library {
        Library::new(Arc::new(InMemoryStorage::default()))
    }

    fn strict_library() -> Library {
        Library::new(Arc::new(InMemoryStorage::with_policy(
            AuthorPolicy::RequireExisting,
        )))
    }

    fn crime_and_punishment() -> NewBook {
        NewBook::new(
            "Crime and punishment",
            1866,
            "Fyodor Dostoevsky",
            ["classic", "crime"],
        )
    }

    #[tokio::test]
    async fn test_resolve_author_creates_unknown_author_once() {
        let library = library();

        let first = library.resolve_author("Martin Fowler").await.unwrap();
        assert!(first.was_created());
        assert_eq!(first.author().born, None);

        let second = library.resolve_author("Martin Fowler").await.unwrap();
        assert!(!second.was_created());
        assert_eq!(second.into_author(), first.into_author());
        assert_eq!(library.author_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resolve_author_requires_existing_author() {
        let library = strict_library();

        let result = library.resolve_author("Martin Fowler").await;
        assert!(matches!(result, Err(LibraryError::Validation(_))));

        library
            .add_author(NewAuthor::new("Martin Fowler").born(1963))
            .await
            .unwrap();
        let resolved = library.resolve_author("Martin Fowler").await.unwrap();
        assert!(!resolved.was_created());
        assert_eq!(resolved.author().born, Some(1963));
    }

    #[tokio::test]
    async fn test_add_book_with_new_author_creates_exactly_one_author() {
        let library = library();

        library.add_book(crime_and_punishment()).await.unwrap();
        library
            .add_book(NewBook::new("The Demon", 1872, "Fyodor Dostoevsky", ["classic"]))
            .await
            .unwrap();

        let authors = library.all_authors().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].author.name, "Fyodor Dostoevsky");
        assert_eq!(authors[0].author.born, None);
        assert_eq!(authors[0].book_count, 2);
    }

    #[tokio::test]
    async fn test_add_book_rejected_without_author_under_strict_policy() {
        let library = strict_library();

        let result = library.add_book(crime_and_punishment()).await;
        assert!(matches!(result, Err(LibraryError::Validation(_))));
        assert_eq!(library.book_count().await.unwrap(), 0);
        assert_eq!(library.author_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_book_count_tracks_successful_additions() {
        let library = library();

        for year in 0..5 {
            library
                .add_book(NewBook::new(format!("Volume {}", year), 2000 + year, "Anon", ["serial"]))
                .await
                .unwrap();
            assert_eq!(library.book_count().await.unwrap(), year as u64 + 1);
        }
    }

    #[tokio::test]
    async fn test_author_book_count_is_recomputed() {
        let library = library();
        library
            .add_author(NewAuthor::new("Fyodor Dostoevsky").born(1821))
            .await
            .unwrap();

        let before = library.all_authors().await.unwrap();
        assert_eq!(before[0].book_count, 0);

        library.add_book(crime_and_punishment()).await.unwrap();

        let after = library.all_authors().await.unwrap();
        assert_eq!(after[0].book_count, 1);
        assert_eq!(after[0].author.born, Some(1821));
    }

    #[tokio::test]
    async fn test_edit_author_only_changes_birth_year() {
        let library = library();
        let original = library
            .add_author(NewAuthor::new("Robert Martin"))
            .await
            .unwrap();

        let edited = library.edit_author("Robert Martin", 1952).await.unwrap().unwrap();
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.name, original.name);
        assert_eq!(edited.born, Some(1952));

        let stored = library.book_author(None, "Robert Martin").await.unwrap().unwrap();
        assert_eq!(stored, edited);
    }

    #[tokio::test]
    async fn test_book_author_prefers_the_linked_id() {
        let library = library();
        let elder = library
            .add_author(NewAuthor::new("Alexandre Dumas").born(1802))
            .await
            .unwrap();
        let younger = library
            .add_author(NewAuthor::new("Alexandre Dumas").born(1824))
            .await
            .unwrap();

        let linked = library
            .book_author(Some(&younger.id), "Alexandre Dumas")
            .await
            .unwrap();
        assert_eq!(linked, Some(younger));

        let by_name = library.book_author(None, "Alexandre Dumas").await.unwrap();
        assert_eq!(by_name, Some(elder.clone()));

        let dangling = library
            .book_author(Some("missing-id"), "Alexandre Dumas")
            .await
            .unwrap();
        assert_eq!(dangling, Some(elder));
    }

    #[tokio::test]
    async fn test_edit_unknown_author_is_not_found() {
        let library = library();

        let result = library.edit_author("Nobody", 1900).await.unwrap();
        assert!(result.is_none());
        assert_eq!(library.author_count().await.unwrap(), 0);
    }
}

// MongoDB storage implementation for the library catalogue
// This provides persistent storage through typed, validated documents

//! # MongoDB Storage Implementation
//!
//! [`MongoStorage`] implements [`LibraryStorage`] on top of two collections in
//! one database:
//! - `authors` holding [`AuthorDocument`]s
//! - `books` holding [`BookDocument`]s
//!
//! Records are converted through the document mapper in
//! [`documents`](crate::engine::documents), which validates every field before
//! a write. Counting happens server-side with `count_documents`, and listings
//! are sorted by `_id` so they come back in creation order.
//!
//! Books must name an author that already exists
//! ([`AuthorPolicy::RequireExisting`]). Author names are not unique here; a
//! lookup by name returns the oldest match, while a book's embedded author
//! link is followed by id.

use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use crate::engine::documents::{book_query, books_by_author_query, AuthorDocument, BookDocument};
use crate::engine::filter::BookFilter;
use crate::engine::storage::{AuthorPolicy, LibraryStorage};
use crate::models::{Author, Book, NewAuthor, NewBook};
use crate::{LibraryError, Result};

const AUTHORS_COLLECTION: &str = "authors";
const BOOKS_COLLECTION: &str = "books";

/// Configuration for MongoDB storage
#[derive(Debug, Clone)]
pub struct MongoStorageConfig {
    /// Full connection string, credential included
    pub uri: String,

    /// Database holding the `authors` and `books` collections
    pub database: String,
}

impl Default for MongoStorageConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "library".to_string(),
        }
    }
}

/// MongoDB storage implementation
pub struct MongoStorage {
    database: Database,
    authors: Collection<AuthorDocument>,
    books: Collection<BookDocument>,
}

impl MongoStorage {
    /// Connect to MongoDB and verify the server answers a ping
    ///
    /// ## Errors
    /// - `Storage` when the connection string is invalid or the server is
    ///   unreachable
    pub async fn connect(config: MongoStorageConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create MongoDB client: {}", e))?;

        let storage = Self::from_client(&client, &config.database);
        storage.ping().await?;

        info!("✅ Connected to MongoDB database '{}'", config.database);
        Ok(storage)
    }

    /// Build the storage on an existing client without contacting the server
    pub fn from_client(client: &Client, database: &str) -> Self {
        let database = client.database(database);
        Self {
            authors: database.collection(AUTHORS_COLLECTION),
            books: database.collection(BOOKS_COLLECTION),
            database,
        }
    }

    /// Round-trip a `ping` command to the server
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reach MongoDB: {}", e))?;
        Ok(())
    }

    async fn find_author_document(&self, name: &str) -> Result<Option<AuthorDocument>> {
        let options = FindOneOptions::builder().sort(doc! { "_id": 1 }).build();
        let document = self
            .authors
            .find_one(doc! { "name": name }, options)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to look up author '{}': {}", name, e))?;
        Ok(document)
    }
}

fn creation_order() -> FindOptions {
    FindOptions::builder().sort(doc! { "_id": 1 }).build()
}

#[async_trait::async_trait]
impl LibraryStorage for MongoStorage {
    fn backend_name(&self) -> &'static str {
        "mongo"
    }

    fn author_policy(&self) -> AuthorPolicy {
        AuthorPolicy::RequireExisting
    }

    async fn count_books(&self) -> Result<u64> {
        let count = self
            .books
            .count_documents(doc! {}, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to count books: {}", e))?;
        Ok(count)
    }

    async fn count_authors(&self) -> Result<u64> {
        let count = self
            .authors
            .count_documents(doc! {}, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to count authors: {}", e))?;
        Ok(count)
    }

    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let query = book_query(filter);
        debug!("🔍 Finding books with query {}", query);

        let documents: Vec<BookDocument> = self
            .books
            .find(query, creation_order())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to query books: {}", e))?
            .try_collect()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read book documents: {}", e))?;

        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn find_authors(&self) -> Result<Vec<Author>> {
        let documents: Vec<AuthorDocument> = self
            .authors
            .find(doc! {}, creation_order())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to query authors: {}", e))?
            .try_collect()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read author documents: {}", e))?;

        Ok(documents.into_iter().map(Author::from).collect())
    }

    async fn find_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        Ok(self.find_author_document(name).await?.map(Author::from))
    }

    async fn find_author_by_id(&self, id: &str) -> Result<Option<Author>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let document = self
            .authors
            .find_one(doc! { "_id": object_id }, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to look up author {}: {}", id, e))?;
        Ok(document.map(Author::from))
    }

    async fn count_books_by_author(&self, name: &str) -> Result<u64> {
        let count = self
            .books
            .count_documents(books_by_author_query(name), None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to count books for '{}': {}", name, e))?;
        Ok(count)
    }

    async fn insert_author(&self, author: NewAuthor) -> Result<Author> {
        let document = AuthorDocument::from_new(author)?;
        self.authors
            .insert_one(&document, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to insert author: {}", e))?;
        Ok(Author::from(document))
    }

    async fn insert_book(&self, book: NewBook) -> Result<Book> {
        let author = self.find_author_document(&book.author).await?;
        let document = BookDocument::from_new(book, author.as_ref())?;
        self.books
            .insert_one(&document, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to insert book: {}", e))?;
        Ok(Book::from(document))
    }

    async fn update_author(&self, author: Author) -> Result<Author> {
        let document = AuthorDocument::from_author(&author)?;
        let result = self
            .authors
            .replace_one(doc! { "_id": document.id }, &document, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to update author: {}", e))?;

        if result.matched_count == 0 {
            return Err(LibraryError::NotFound(format!("author {}", author.id)));
        }
        Ok(Author::from(document))
    }
}

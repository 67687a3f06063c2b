// GraphQL API for the library catalogue
// This provides the schema contract and the Query / Mutation resolvers

//! # GraphQL Engine
//!
//! The schema exposed by this module is:
//!
//! ```graphql
//! type Author { name: String!, id: ID!, born: Int, nbBooks: Int }
//! type Book   { title: String!, published: Int!, author: Author!, genres: [String!]!, id: ID! }
//!
//! type Query {
//!   bookCount: Int!
//!   authorCount: Int!
//!   allBooks(author: String, genre: String): [Book]
//!   allAuthors: [Author!]!
//! }
//!
//! type Mutation {
//!   addBook(title: String!, author: String!, published: Int!, genres: [String!]!): Book
//!   addAuthor(name: String!, born: Int): Author
//!   editAuthor(name: String!, setBornTo: String!): Author
//! }
//! ```
//!
//! Resolvers fetch the [`Library`] from the schema data and convert between
//! domain models and the `*GQL` output types.
//!
//! ## Errors
//!
//! A mutation rejected by the storage layer's field constraints is reported
//! with `extensions.code = "BAD_USER_INPUT"` and `extensions.invalidArgs`
//! holding the arguments the client sent. Other failures carry
//! `extensions.code = "INTERNAL_SERVER_ERROR"`.

use std::sync::Arc;

use async_graphql::{
    ComplexObject, Context, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject, ID,
};
use serde_json::json;
use tracing::warn;

use crate::engine::filter::BookFilter;
use crate::engine::library::Library;
use crate::engine::storage::LibraryStorage;
use crate::models::{Author, AuthorSummary, Book, NewAuthor, NewBook};
use crate::LibraryError;

// GraphQL types - these are the API representations of our domain models

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Author", complex)]
pub struct AuthorGQL {
    pub name: String,
    pub id: ID,
    pub born: Option<i32>,
    /// Precomputed book count, filled in by `allAuthors`
    #[graphql(skip)]
    pub book_count: Option<u64>,
}

#[ComplexObject]
impl AuthorGQL {
    /// Number of books attributed to this author
    async fn nb_books(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<i32>> {
        let count = match self.book_count {
            Some(count) => count,
            None => library(ctx)?
                .book_count_for(&self.name)
                .await
                .map_err(|e| e.extend())?,
        };
        Ok(Some(to_int(count)?))
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Book", complex)]
pub struct BookGQL {
    pub title: String,
    pub published: i32,
    #[graphql(skip)]
    pub author_name: String,
    pub genres: Vec<String>,
    pub id: ID,
    #[graphql(skip)]
    pub author_id: Option<String>,
}

#[ComplexObject]
impl BookGQL {
    /// The author record this book refers to
    async fn author(&self, ctx: &Context<'_>) -> async_graphql::Result<AuthorGQL> {
        let author = library(ctx)?
            .book_author(self.author_id.as_deref(), &self.author_name)
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| {
                LibraryError::NotFound(format!("author '{}'", self.author_name)).extend()
            })?;
        Ok(AuthorGQL::from(author))
    }
}

impl From<Author> for AuthorGQL {
    fn from(author: Author) -> Self {
        Self {
            name: author.name,
            id: ID::from(author.id),
            born: author.born,
            book_count: None,
        }
    }
}

impl From<AuthorSummary> for AuthorGQL {
    fn from(summary: AuthorSummary) -> Self {
        Self {
            book_count: Some(summary.book_count),
            ..AuthorGQL::from(summary.author)
        }
    }
}

impl From<Book> for BookGQL {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            published: book.published,
            author_name: book.author,
            genres: book.genres,
            id: ID::from(book.id),
            author_id: book.author_id,
        }
    }
}

impl ErrorExtensions for LibraryError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Convert a failed mutation, attaching the arguments to input errors
fn rejected(err: LibraryError, args: serde_json::Value) -> async_graphql::Error {
    if !err.is_validation() {
        return err.extend();
    }
    warn!("⚠️ Rejected input {}: {}", args, err);
    let invalid_args = async_graphql::Value::from_json(args).unwrap_or(async_graphql::Value::Null);
    err.extend_with(|_, e| e.set("invalidArgs", invalid_args))
}

fn library<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Library> {
    ctx.data::<Library>()
}

fn to_int(count: u64) -> async_graphql::Result<i32> {
    i32::try_from(count).map_err(|_| {
        LibraryError::Internal(format!("Count {} exceeds the Int range", count)).extend()
    })
}

/// Parse the `setBornTo` argument of `editAuthor` as a year
fn parse_year(value: &str) -> Result<i32, LibraryError> {
    value.trim().parse::<i32>().map_err(|_| {
        LibraryError::Validation(format!("setBornTo must be an integer year, got '{}'", value))
    })
}

// GraphQL Query root
pub struct Query;

#[Object]
impl Query {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> async_graphql::Result<i32> {
        let count = library(ctx)?.book_count().await.map_err(|e| e.extend())?;
        to_int(count)
    }

    /// Total number of authors
    async fn author_count(&self, ctx: &Context<'_>) -> async_graphql::Result<i32> {
        let count = library(ctx)?.author_count().await.map_err(|e| e.extend())?;
        to_int(count)
    }

    /// Books, optionally restricted to an author and/or a genre
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> async_graphql::Result<Option<Vec<Option<BookGQL>>>> {
        let filter = BookFilter::new(author, genre);
        let books = library(ctx)?
            .all_books(&filter)
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(
            books.into_iter().map(|b| Some(BookGQL::from(b))).collect(),
        ))
    }

    /// Every author, with `nbBooks` computed from the current books
    async fn all_authors(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AuthorGQL>> {
        let summaries = library(ctx)?.all_authors().await.map_err(|e| e.extend())?;
        Ok(summaries.into_iter().map(AuthorGQL::from).collect())
    }
}

// GraphQL Mutation root
pub struct Mutation;

#[Object]
impl Mutation {
    /// Add a book; an unknown author is created or rejected depending on the store
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: i32,
        genres: Vec<String>,
    ) -> async_graphql::Result<Option<BookGQL>> {
        let args = json!({
            "title": title,
            "author": author,
            "published": published,
            "genres": genres,
        });
        let book = NewBook {
            title,
            published,
            author,
            genres,
        };

        let created = library(ctx)?
            .add_book(book)
            .await
            .map_err(|e| rejected(e, args))?;
        Ok(Some(BookGQL::from(created)))
    }

    /// Add an author
    async fn add_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        born: Option<i32>,
    ) -> async_graphql::Result<Option<AuthorGQL>> {
        let args = json!({ "name": name, "born": born });
        let author = NewAuthor { name, born };

        let created = library(ctx)?
            .add_author(author)
            .await
            .map_err(|e| rejected(e, args))?;
        Ok(Some(AuthorGQL::from(created)))
    }

    /// Set an author's birth year; returns null when no author has that name
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: String,
    ) -> async_graphql::Result<Option<AuthorGQL>> {
        let args = json!({ "name": name, "setBornTo": set_born_to });
        let born = parse_year(&set_born_to).map_err(|e| rejected(e, args.clone()))?;

        let edited = library(ctx)?
            .edit_author(&name, born)
            .await
            .map_err(|e| rejected(e, args))?;
        Ok(edited.map(AuthorGQL::from))
    }
}

// Schema type alias
pub type LibrarySchema = Schema<Query, Mutation, EmptySubscription>;

/// Create the schema over a storage backend
pub fn create_schema(storage: Arc<dyn LibraryStorage>) -> LibrarySchema {
    create_schema_with_library(Library::new(storage))
}

/// Create the schema over an existing library service
pub fn create_schema_with_library(library: Library) -> LibrarySchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(library)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_overflow_carries_error_code() {
        assert_eq!(to_int(42).unwrap(), 42);

        let err = to_int(u64::MAX).unwrap_err();
        let code = err.extensions.as_ref().and_then(|e| e.get("code")).cloned();
        assert_eq!(
            code,
            Some(async_graphql::Value::from("INTERNAL_SERVER_ERROR"))
        );
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(" 1821 ").unwrap(), 1821);
        assert!(parse_year("long ago").unwrap_err().is_validation());
    }
}

// Library GraphQL - Rust Edition
// A small GraphQL catalogue of authors and books with pluggable storage

//! # Library GraphQL
//!
//! This is the library crate behind the `server` binary. It exposes a GraphQL
//! API over two entities, [`Author`] and [`Book`], backed by one of two
//! interchangeable stores:
//!
//! - [`InMemoryStorage`]: ordered in-process sequences, handy for development
//!   and tests
//! - [`MongoStorage`]: a MongoDB database accessed through typed documents that
//!   validate records before they are written
//!
//! ## Layers
//!
//! ```text
//! Client
//!   ↓ HTTP (axum)
//! server::graphql   ← router, GraphiQL page, health check
//!   ↓
//! engine::graphql   ← schema contract, Query / Mutation resolvers
//!   ↓
//! engine::library   ← resolve-or-create author, derived book counts
//!   ↓
//! engine::storage   ← LibraryStorage trait (in-memory, MongoDB)
//!   ↓
//! models            ← Author, Book
//! ```
//!
//! ## Usage Example
//! ```rust
//! use library_graphql::{create_schema, InMemoryStorage};
//! use std::sync::Arc;
//!
//! let schema = create_schema(Arc::new(InMemoryStorage::default()));
//! // schema.execute("{ bookCount }").await
//! # let _ = schema;
//! ```
//!
//! ## Rust Learning Notes:
//!
//! ### Re-exports
//! `pub use` statements create shortcuts so users don't need to know the
//! internal module structure. Instead of
//! `use library_graphql::engine::storage::InMemoryStorage`, users can write
//! `use library_graphql::InMemoryStorage`.

// Core domain models (storage-agnostic)
pub mod models;

// Storage backends, the library service and the GraphQL schema
pub mod engine;

// HTTP server exposing the schema
pub mod server;

// Layered settings for the server binary
pub mod settings;

// Re-export core domain types for easy access
pub use models::{Author, AuthorSummary, Book, NewAuthor, NewBook};

// Re-export engine types for convenience
pub use engine::{
    filter::BookFilter,
    graphql::{create_schema, AuthorGQL, BookGQL, LibrarySchema, Mutation, Query},
    library::{AuthorResolution, Library},
    mongo_storage::{MongoStorage, MongoStorageConfig},
    storage::{AuthorPolicy, InMemoryStorage, LibraryStorage},
};

// Re-export server types for convenience
pub use server::graphql::{GraphQLServer, GraphQLServerBuilder, GraphQLServerConfig};

pub use settings::{Settings, StorageBackend};

// Core error types
use thiserror::Error;

/// Errors produced by the catalogue
///
/// ## Rust Learning Notes:
///
/// ### The `thiserror` Crate
/// - `#[derive(Error)]` implements the `std::error::Error` trait
/// - `#[error("...")]` provides the `Display` message
/// - `#[from]` enables automatic conversion with the `?` operator
#[derive(Error, Debug)]
pub enum LibraryError {
    /// A record was rejected by the storage layer's field constraints
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A record that must exist could not be found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend failures (driver errors, unreachable server, ...)
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    /// Invalid or unreadable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LibraryError {
    /// Error code reported to GraphQL clients in the `code` extension
    pub fn code(&self) -> &'static str {
        match self {
            LibraryError::Validation(_) => "BAD_USER_INPUT",
            LibraryError::NotFound(_) => "NOT_FOUND",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Whether this error was caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, LibraryError::Validation(_))
    }
}

impl From<config::ConfigError> for LibraryError {
    fn from(err: config::ConfigError) -> Self {
        LibraryError::Config(err.to_string())
    }
}

/// Type alias for Results that use our custom error type
pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LibraryError::Validation("x".into()).code(), "BAD_USER_INPUT");
        assert_eq!(LibraryError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(
            LibraryError::Storage(anyhow::anyhow!("down")).code(),
            "INTERNAL_SERVER_ERROR"
        );
        assert!(!LibraryError::Internal("x".into()).is_validation());
    }

    #[test]
    fn test_config_error_conversion() {
        let err = LibraryError::from(config::ConfigError::Message("bad port".into()));
        assert!(matches!(err, LibraryError::Config(ref message) if message.contains("bad port")));
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
    }
}

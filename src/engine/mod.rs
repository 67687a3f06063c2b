// Library engine
// Storage backends, the library service and the GraphQL interface

//! # Engine Module
//!
//! The engine is the layer between the domain models and the outside world:
//!
//! - **Storage** (`storage`, `mongo_storage`, `documents`): the
//!   `LibraryStorage` trait with an in-memory and a MongoDB implementation
//! - **Filtering** (`filter`): the boolean predicate behind `allBooks`
//! - **Library service** (`library`): the operations every resolver calls
//! - **GraphQL** (`graphql`): schema contract and resolvers
//! - **Seed data** (`seed`): a sample catalogue for development servers

/// GraphQL schema, output types and resolvers
pub mod graphql;

/// Storage trait and in-memory implementation
pub mod storage;

/// MongoDB implementation of the storage trait
pub mod mongo_storage;

/// Typed MongoDB documents with field validation
pub mod documents;

/// Author / genre filter for book listings
pub mod filter;

/// Catalogue operations shared by every resolver
pub mod library;

/// Sample catalogue
pub mod seed;


pub use filter::BookFilter;
pub use graphql::{create_schema, create_schema_with_library, AuthorGQL, BookGQL, LibrarySchema};
pub use library::{AuthorResolution, Library};
pub use mongo_storage::{MongoStorage, MongoStorageConfig};
pub use storage::{AuthorPolicy, InMemoryStorage, LibraryStorage};

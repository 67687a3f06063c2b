// Core domain models for the library catalogue
// These are the storage-agnostic data structures shared by every backend

//! # Domain Models Module
//!
//! This module contains the two entities the API exposes:
//! - [`Author`]: a person who wrote one or more books
//! - [`Book`]: a catalogued title that references its author by name
//!
//! Each entity has a `New*` counterpart describing a record that has not been
//! stored yet. Identifiers are generated by the storage backend on insert, so
//! the `New*` types carry every field except `id`.
//!
//! ## Rust Learning Notes:
//!
//! ### Module Organization
//! This `mod.rs` file is the **module root** for the `models` directory. Each
//! `pub mod` declaration pulls in a sibling `.rs` file, and the `pub use`
//! statements flatten the API so callers can write `models::Author` instead of
//! `models::author::Author`.

// Declares the `author` submodule from `author.rs`
// Contains Author, NewAuthor and the derived AuthorSummary
pub mod author;

// Declares the `book` submodule from `book.rs`
// Contains Book and NewBook
pub mod book;

/// Re-export author types
/// - Author: a stored author with its generated id
/// - NewAuthor: an author waiting to be stored
/// - AuthorSummary: an author annotated with its derived book count
pub use author::{Author, AuthorSummary, NewAuthor};

/// Re-export book types
/// - Book: a stored book with its generated id
/// - NewBook: a book waiting to be stored
pub use book::{Book, NewBook};

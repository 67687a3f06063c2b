// Book filtering for the allBooks query

//! # Book Filters
//!
//! `allBooks(author, genre)` accepts two optional arguments. Which of them is
//! present selects one of four behaviours:
//!
//! | author | genre | keeps                                        |
//! |--------|-------|----------------------------------------------|
//! | -      | -     | every book                                   |
//! | -      | g     | books whose genres contain `g`               |
//! | a      | -     | books whose author is exactly `a`            |
//! | a      | g     | books matching both conditions               |
//!
//! All four collapse into a single boolean predicate: an absent argument
//! matches everything, and the two conditions are joined with `&&`.

use crate::models::Book;

/// Optional author and genre constraints for a book listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Exact, case-sensitive author name
    pub author: Option<String>,

    /// Genre that must appear in the book's genre list
    pub genre: Option<String>,
}

impl BookFilter {
    pub fn new(author: Option<String>, genre: Option<String>) -> Self {
        Self { author, genre }
    }

    /// A filter that keeps every book
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            genre: None,
        }
    }

    pub fn by_genre(genre: impl Into<String>) -> Self {
        Self {
            author: None,
            genre: Some(genre.into()),
        }
    }

    /// Add a genre constraint to this filter
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// True when neither constraint is set
    pub fn is_unfiltered(&self) -> bool {
        self.author.is_none() && self.genre.is_none()
    }

    /// Whether `book` satisfies every constraint that is set
    pub fn matches(&self, book: &Book) -> bool {
        let author_ok = self
            .author
            .as_deref()
            .map_or(true, |author| book.is_by(author));
        let genre_ok = self
            .genre
            .as_deref()
            .map_or(true, |genre| book.has_genre(genre));

        author_ok && genre_ok
    }

    /// Keep the books that match, preserving their order
    pub fn apply<'a, I>(&self, books: I) -> Vec<Book>
    where
        I: IntoIterator<Item = &'a Book>,
    {
        books
            .into_iter()
            .filter(|book| self.matches(book))
            .cloned()
            .collect()
    }
}

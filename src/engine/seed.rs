// Sample catalogue for development servers

use tracing::info;

use crate::engine::library::Library;
use crate::models::{NewAuthor, NewBook};
use crate::Result;

/// Authors of the sample catalogue, some without a known birth year
pub fn sample_authors() -> Vec<NewAuthor> {
    vec![
        NewAuthor::new("Robert Martin").born(1952),
        NewAuthor::new("Martin Fowler").born(1963),
        NewAuthor::new("Fyodor Dostoevsky").born(1821),
        NewAuthor::new("Joshua Kerievsky"),
        NewAuthor::new("Sandi Metz"),
    ]
}

pub fn sample_books() -> Vec<NewBook> {
    vec![
        NewBook::new("Clean Code", 2008, "Robert Martin", ["refactoring"]),
        NewBook::new(
            "Agile software development",
            2002,
            "Robert Martin",
            ["agile", "patterns", "design"],
        ),
        NewBook::new("Refactoring, edition 2", 2018, "Martin Fowler", ["refactoring"]),
        NewBook::new(
            "Refactoring to patterns",
            2008,
            "Joshua Kerievsky",
            ["refactoring", "patterns"],
        ),
        NewBook::new(
            "Practical Object-Oriented Design, An Agile Primer Using Ruby",
            2012,
            "Sandi Metz",
            ["refactoring", "design"],
        ),
        NewBook::new("Crime and punishment", 1866, "Fyodor Dostoevsky", ["classic", "crime"]),
        NewBook::new("The Demon", 1872, "Fyodor Dostoevsky", ["classic", "revolution"]),
    ]
}

/// Store the sample catalogue through the regular library operations
pub async fn seed(library: &Library) -> Result<()> {
    for author in sample_authors() {
        library.add_author(author).await?;
    }
    for book in sample_books() {
        library.add_book(book).await?;
    }

    info!(
        "🌱 Seeded {} authors and {} books",
        library.author_count().await?,
        library.book_count().await?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::filter::BookFilter;
    use crate::engine::storage::InMemoryStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_populates_catalogue() {
        let library = Library::new(Arc::new(InMemoryStorage::default()));
        seed(&library).await.unwrap();

        assert_eq!(library.author_count().await.unwrap(), 5);
        assert_eq!(library.book_count().await.unwrap(), 7);

        let refactoring = library
            .all_books(&BookFilter::by_genre("refactoring"))
            .await
            .unwrap();
        assert_eq!(refactoring.len(), 4);

        let martin = library
            .all_authors()
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.author.name == "Robert Martin")
            .unwrap();
        assert_eq!(martin.book_count, 2);
    }
}

//! In-memory book storage.

use tokio::sync::RwLock;
use validator::{Validate, ValidationErrors};

use super::models::{Book, BookFilter};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RepositoryError {
    #[error("book not found")]
    NotFound,

    #[error("book failed validation: {0}")]
    Invalid(ValidationErrors),
}

/// Ordered collection of books kept in insertion order.
///
/// Lookups scan linearly and act on the first record whose title matches
/// exactly. Mutations hold the write lock for their whole scan-and-modify
/// step; records are validated before the lock is taken.
#[derive(Debug, Default)]
pub struct BookRepository {
    books: RwLock<Vec<Book>>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, book: Book) -> Result<Book, RepositoryError> {
        book.validate().map_err(RepositoryError::Invalid)?;

        self.books.write().await.push(book.clone());
        tracing::debug!(title = %book.title, "book stored");
        Ok(book)
    }

    pub async fn list(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    pub async fn get(&self, title: &str) -> Result<Book, RepositoryError> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.title == title)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    /// Replaces the first record titled `title` with `book` in place.
    pub async fn update(&self, title: &str, book: Book) -> Result<Book, RepositoryError> {
        book.validate().map_err(RepositoryError::Invalid)?;

        let mut books = self.books.write().await;
        let slot = books
            .iter_mut()
            .find(|existing| existing.title == title)
            .ok_or(RepositoryError::NotFound)?;
        *slot = book.clone();

        tracing::debug!(%title, new_title = %book.title, "book replaced");
        Ok(book)
    }

    /// Removes the first record titled `title` and returns it.
    pub async fn delete(&self, title: &str) -> Result<Book, RepositoryError> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.title == title)
            .ok_or(RepositoryError::NotFound)?;

        let removed = books.remove(index);
        tracing::debug!(%title, "book removed");
        Ok(removed)
    }

    /// Up to `filter.limit` books published in or after
    /// `filter.published_after`, in collection order.
    pub async fn list_filtered(&self, filter: &BookFilter) -> Vec<Book> {
        let limit = usize::try_from(filter.limit).unwrap_or(0);
        self.books
            .read()
            .await
            .iter()
            .filter(|book| book.published_year >= filter.published_after)
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::{AppError, ValidJson, ValidQuery};

use super::models::{Book, BookFilter, MessageResponse};
use super::repository::{BookRepository, RepositoryError};

type Repository = Arc<BookRepository>;

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::not_found("Book not found"),
            RepositoryError::Invalid(errors) => AppError::from_validation_errors(errors),
        }
    }
}

/// Routes of the books module, bound to `repository`.
pub fn router(repository: Repository) -> Router {
    Router::new()
        .route("/", get(list_filtered_books))
        .route("/books", get(list_books).post(create_book))
        .route("/books/", get(list_books).post(create_book))
        .route(
            "/books/{title}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

async fn create_book(
    State(repository): State<Repository>,
    ValidJson(book): ValidJson<Book>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = repository.create(book).await?;
    tracing::info!(title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(State(repository): State<Repository>) -> Json<Vec<Book>> {
    Json(repository.list().await)
}

async fn get_book(
    State(repository): State<Repository>,
    Path(title): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(repository.get(&title).await?))
}

async fn update_book(
    State(repository): State<Repository>,
    Path(title): Path<String>,
    ValidJson(book): ValidJson<Book>,
) -> Result<Json<Book>, AppError> {
    let book = repository.update(&title, book).await?;
    tracing::info!(%title, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(repository): State<Repository>,
    Path(title): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    repository.delete(&title).await?;
    tracing::info!(%title, "book deleted");
    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}

async fn list_filtered_books(
    State(repository): State<Repository>,
    ValidQuery(filter): ValidQuery<BookFilter>,
) -> Json<Vec<Book>> {
    Json(repository.list_filtered(&filter).await)
}

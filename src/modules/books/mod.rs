pub mod models;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use repository::BookRepository;

/// Books module: the in-memory catalogue and its CRUD endpoints
pub struct BooksModule {
    repository: Arc<BookRepository>,
}

impl BooksModule {
    pub fn new(repository: Arc<BookRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<BookRepository> {
        &self.repository
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.repository.len().await;
        tracing::info!(
            module = self.name(),
            discarded,
            "books module stopped, in-memory catalogue discarded"
        );
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn book_list_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Book" }
                }
            }
        }
    })
}

fn book_body() -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn title_parameter() -> serde_json::Value {
    json!({
        "name": "title",
        "in": "path",
        "required": true,
        "description": "Exact, case-sensitive book title",
        "schema": { "type": "string" }
    })
}

fn openapi_fragment() -> serde_json::Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books published in or after a year",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "limit",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "integer", "minimum": 1, "maximum": 100, "default": 10 }
                        },
                        {
                            "name": "published_after",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "integer", "minimum": 1900, "maximum": 2025, "default": 2000 }
                        }
                    ],
                    "responses": {
                        "200": book_list_response("Filtered books in collection order"),
                        "422": error_response("Query parameter out of range")
                    }
                }
            },
            "/books": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": book_list_response("All books in insertion order")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": book_body(),
                    "responses": {
                        "201": book_response("Stored book"),
                        "422": error_response("Validation error")
                    }
                }
            },
            "/books/{title}": {
                "get": {
                    "summary": "Get the first book with a title",
                    "tags": ["Books"],
                    "parameters": [title_parameter()],
                    "responses": {
                        "200": book_response("Matching book"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace the first book with a title",
                    "tags": ["Books"],
                    "parameters": [title_parameter()],
                    "requestBody": book_body(),
                    "responses": {
                        "200": book_response("Replacement as stored"),
                        "404": error_response("Book not found"),
                        "422": error_response("Validation error")
                    }
                },
                "delete": {
                    "summary": "Delete the first book with a title",
                    "tags": ["Books"],
                    "parameters": [title_parameter()],
                    "responses": {
                        "200": {
                            "description": "Book deleted",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Message" }
                                }
                            }
                        },
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1, "maxLength": 100 },
                        "author": { "type": "string", "minLength": 1, "maxLength": 100 },
                        "description": { "type": "string", "minLength": 1, "maxLength": 500 },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "published_year": { "type": "integer", "minimum": 1900, "maximum": 2025 }
                    },
                    "required": ["title", "author", "description", "rating", "published_year"]
                },
                "Message": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" }
                    },
                    "required": ["message"]
                }
            }
        }
    })
}

/// Create a new instance of the books module with an empty catalogue
pub fn create_module() -> Arc<BooksModule> {
    Arc::new(BooksModule::new(Arc::new(BookRepository::new())))
}

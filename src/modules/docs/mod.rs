//! Plain endpoint catalogue at `/api/docs`, alongside the OpenAPI document.

use async_trait::async_trait;
use axum::{routing::get, Json, Router};
use libris_kernel::Module;
use serde_json::{json, Value};

pub struct DocsModule;

impl DocsModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for DocsModule {
    fn name(&self) -> &'static str {
        "docs"
    }

    fn routes(&self) -> Router {
        Router::new().route("/", get(catalogue))
    }

    fn openapi(&self) -> Option<Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Endpoint catalogue",
                        "tags": ["Docs"],
                        "responses": {
                            "200": {
                                "description": "Service name, version and endpoints by resource",
                                "content": { "application/json": { "schema": { "type": "object" } } }
                            }
                        }
                    }
                }
            }
        }))
    }
}

async fn catalogue() -> Json<Value> {
    Json(json!({
        "name": "Library Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "RESTful API for managing library inventory, authors, and borrowers",
        "endpoints": {
            "books": {
                "GET /api/books": "Get all books (supports filtering by available, genre, author)",
                "GET /api/books/{id}": "Get specific book",
                "POST /api/books": "Create new book",
                "PUT /api/books/{id}": "Update book",
                "DELETE /api/books/{id}": "Delete book",
                "POST /api/books/{id}/borrow": "Borrow a book",
                "POST /api/books/{id}/return": "Return a book"
            },
            "authors": {
                "GET /api/authors": "Get all authors",
                "GET /api/authors/{id}": "Get specific author with their books",
                "POST /api/authors": "Create new author",
                "PUT /api/authors/{id}": "Update author",
                "DELETE /api/authors/{id}": "Delete author"
            },
            "borrowers": {
                "GET /api/borrowers": "Get all borrowers",
                "GET /api/borrowers/{id}": "Get specific borrower with borrowed books",
                "POST /api/borrowers": "Create new borrower",
                "PUT /api/borrowers/{id}": "Update borrower",
                "DELETE /api/borrowers/{id}": "Delete borrower (if no active loans)"
            },
            "library": {
                "GET /api/library/integrity": "Recount loans and report inconsistencies"
            }
        }
    }))
}

/// Create a new instance of the docs module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(DocsModule::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::send;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn catalogue_lists_every_resource() {
        let (status, body) = send(DocsModule::new().routes(), Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Library Management API");
        for resource in ["books", "authors", "borrowers"] {
            assert!(body["endpoints"][resource].is_object());
        }
    }
}

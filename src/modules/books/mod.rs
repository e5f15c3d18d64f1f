pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Module};
use serde_json::json;

use crate::library::Library;

/// Book catalogue, filtering, and the borrow/return endpoints
pub struct BooksModule {
    library: Library,
}

impl BooksModule {
    pub fn new(library: Library) -> Self {
        Self { library }
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
        routes::router(self.library.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        });
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book_envelope = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "properties": {
                                "success": { "type": "boolean" },
                                "message": { "type": "string" },
                                "data": { "$ref": "#/components/schemas/Book" }
                            }
                        }
                    }
                }
            })
        };
        let payload_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, optionally filtered",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "available", "in": "query", "required": false, "schema": { "type": "string", "enum": ["true", "false"] } },
                            { "name": "genre", "in": "query", "required": false, "description": "Case-insensitive substring", "schema": { "type": "string" } },
                            { "name": "author", "in": "query", "required": false, "description": "Case-insensitive substring", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "success": { "type": "boolean" },
                                                "count": { "type": "integer" },
                                                "data": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/Book" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": payload_body.clone(),
                        "responses": {
                            "201": book_envelope("Book created"),
                            "400": error("Validation errors")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": book_envelope("The book"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": payload_body,
                        "responses": {
                            "200": book_envelope("Book updated"),
                            "400": error("Validation errors"),
                            "404": error("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book, releasing any loan on it",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": { "description": "Book deleted" },
                            "404": error("Book not found")
                        }
                    }
                },
                "/{id}/borrow": {
                    "post": {
                        "summary": "Borrow a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "borrowerId": { "type": "integer" }
                                        }
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Book borrowed",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "success": { "type": "boolean" },
                                                "message": { "type": "string" },
                                                "data": {
                                                    "type": "object",
                                                    "properties": {
                                                        "book": { "$ref": "#/components/schemas/Book" },
                                                        "borrower": { "type": "string" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": error("Book or borrower not found"),
                            "409": error("Book is already borrowed")
                        }
                    }
                },
                "/{id}/return": {
                    "post": {
                        "summary": "Return a borrowed book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": book_envelope("Book returned"),
                            "404": error("Book not found"),
                            "409": error("Book is not currently borrowed")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string", "description": "Author name, matched to authors ignoring case" },
                            "isbn": { "type": "string" },
                            "genre": { "type": "string" },
                            "publishedYear": { "type": ["integer", "null"] },
                            "available": { "type": "boolean" },
                            "borrowedBy": { "type": ["integer", "null"] },
                            "borrowedDate": { "type": ["string", "null"], "format": "date" }
                        },
                        "required": ["id", "title", "author", "isbn", "genre", "available"]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "genre": { "type": "string" },
                            "publishedYear": { "type": "integer" }
                        },
                        "required": ["title", "author", "isbn"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(library: Library) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(library))
}

pub mod routes;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Module};
use serde_json::json;

use crate::library::Library;

/// Author records and their name-matched books
pub struct AuthorsModule {
    library: Library,
}

impl AuthorsModule {
    pub fn new(library: Library) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.library.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let id_param = json!({ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } });
        let payload_body = json!({
            "required": true,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/AuthorPayload" } } }
        });
        let error = json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All authors",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "success": { "type": "boolean" },
                                                "count": { "type": "integer" },
                                                "data": { "type": "array", "items": { "$ref": "#/components/schemas/Author" } }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": payload_body.clone(),
                        "responses": {
                            "201": { "description": "Author created" },
                            "400": error.clone()
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author with the books whose author name matches",
                        "tags": ["Authors"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": {
                                "description": "Author and books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "allOf": [
                                                { "$ref": "#/components/schemas/Author" },
                                                {
                                                    "type": "object",
                                                    "properties": {
                                                        "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                                                    }
                                                }
                                            ]
                                        }
                                    }
                                }
                            },
                            "404": error.clone()
                        }
                    },
                    "put": {
                        "summary": "Update an author",
                        "tags": ["Authors"],
                        "parameters": [id_param.clone()],
                        "requestBody": payload_body,
                        "responses": {
                            "200": { "description": "Author updated" },
                            "400": error.clone(),
                            "404": error.clone()
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "Author deleted" },
                            "404": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "biography": { "type": "string" },
                            "birthYear": { "type": ["integer", "null"] },
                            "nationality": { "type": "string" }
                        },
                        "required": ["id", "name", "biography", "nationality"]
                    },
                    "AuthorPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "biography": { "type": "string" },
                            "birthYear": { "type": "integer" },
                            "nationality": { "type": "string" }
                        },
                        "required": ["name"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(library: Library) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(library))
}

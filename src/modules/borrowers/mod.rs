pub mod routes;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Module};
use serde_json::json;

use crate::library::Library;

/// Library members and the books they currently hold
pub struct BorrowersModule {
    library: Library,
}

impl BorrowersModule {
    pub fn new(library: Library) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Module for BorrowersModule {
    fn name(&self) -> &'static str {
        "borrowers"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "borrowers module initialized"
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
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/BorrowerPayload" } } }
        });
        let error = json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List borrowers",
                        "tags": ["Borrowers"],
                        "responses": { "200": { "description": "All borrowers" } }
                    },
                    "post": {
                        "summary": "Register a borrower",
                        "tags": ["Borrowers"],
                        "requestBody": payload_body.clone(),
                        "responses": {
                            "201": { "description": "Borrower created" },
                            "400": error.clone()
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a borrower with the books on loan to them",
                        "tags": ["Borrowers"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": { "description": "Borrower and borrowed books" },
                            "404": error.clone()
                        }
                    },
                    "put": {
                        "summary": "Update a borrower",
                        "tags": ["Borrowers"],
                        "parameters": [id_param.clone()],
                        "requestBody": payload_body,
                        "responses": {
                            "200": { "description": "Borrower updated" },
                            "400": error.clone(),
                            "404": error.clone()
                        }
                    },
                    "delete": {
                        "summary": "Delete a borrower with no books on loan",
                        "tags": ["Borrowers"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "Borrower deleted" },
                            "404": error.clone(),
                            "409": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Borrower": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "email": { "type": "string" },
                            "membershipDate": { "type": "string", "format": "date" },
                            "activeLoans": { "type": "integer", "minimum": 0 }
                        },
                        "required": ["id", "name", "email", "membershipDate", "activeLoans"]
                    },
                    "BorrowerPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "email": { "type": "string" },
                            "membershipDate": { "type": "string", "format": "date" }
                        },
                        "required": ["name", "email"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "borrowers module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "borrowers module stopped");
        Ok(())
    }
}

/// Create a new instance of the borrowers module
pub fn create_module(library: Library) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BorrowersModule::new(library))
}

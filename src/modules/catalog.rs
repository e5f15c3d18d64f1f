//! Core module owning the shared store lifecycle: seeding at init and an
//! integrity pass at start.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use libris_http::ApiResponse;
use libris_kernel::{InitCtx, Module};

use crate::library::{IntegrityViolation, Library};

pub struct CatalogModule {
    library: Library,
}

impl CatalogModule {
    pub fn new(library: Library) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "library"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.library.seed_demo_data {
            self.library.seed_demo().await;
            tracing::info!(module = self.name(), "demo catalogue seeded");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "library module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/integrity", get(integrity_report))
            .with_state(self.library.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/integrity": {
                    "get": {
                        "summary": "Recount loans and report disagreements between books and borrowers",
                        "tags": ["Library"],
                        "responses": {
                            "200": {
                                "description": "Violations found (empty when consistent)",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "success": { "type": "boolean" },
                                                "count": { "type": "integer" },
                                                "data": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/IntegrityViolation" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "IntegrityViolation": {
                        "type": "object",
                        "properties": {
                            "kind": { "type": "string", "enum": ["loanCountMismatch", "unknownBorrower"] },
                            "borrowerId": { "type": "integer" },
                            "bookId": { "type": "integer" },
                            "recorded": { "type": "integer" },
                            "actual": { "type": "integer" }
                        },
                        "required": ["kind", "borrowerId"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let violations = self.library.integrity_report().await;
        for violation in &violations {
            tracing::warn!(module = self.name(), ?violation, "store integrity violation");
        }

        tracing::info!(
            module = self.name(),
            violations = violations.len(),
            "library module started"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "library module stopped");
        Ok(())
    }
}

async fn integrity_report(State(library): State<Library>) -> ApiResponse<Vec<IntegrityViolation>> {
    let violations = library.integrity_report().await;
    let count = violations.len();
    ApiResponse::ok(violations).with_count(count)
}

/// Create a new instance of the library core module
pub fn create_module(library: Library) -> Arc<dyn Module> {
    Arc::new(CatalogModule::new(library))
}

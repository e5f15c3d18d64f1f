//! Router builder for the Libris HTTP server

use axum::{
    extract::Request,
    handler::HandlerWithoutStateExt,
    http::HeaderValue,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::Uuid;

use libris_kernel::ModuleRegistry;

use crate::error::AppError;

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/{module_name}`
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let api_path = format!("/api/{}", module_name);
        self.router = self.router.nest(&api_path, module_router);
        self
    }

    /// Serve files from `dir` for unmatched paths, falling back to a JSON 404
    pub fn with_static_files(mut self, dir: &str) -> Self {
        let serve_dir = ServeDir::new(dir).fallback(route_not_found.into_service());
        self.router = self.router.fallback_service(serve_dir);
        self
    }

    /// Answer unmatched paths with a JSON 404
    pub fn with_not_found(mut self) -> Self {
        self.router = self.router.fallback(route_not_found);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add request ID middleware; the id is echoed on the response
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Add OpenAPI documentation by collecting specs from all modules
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = merged_openapi(registry);

        // Swagger UI needs a typed document; fall back to a bare one if the
        // merged JSON does not deserialize
        let openapi_obj = swagger_document(&openapi_spec).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "merged OpenAPI document is not valid; serving stub");
            utoipa::openapi::OpenApiBuilder::new()
                .info(
                    utoipa::openapi::InfoBuilder::new()
                        .title("Library Management API")
                        .version("1.0.0")
                        .build(),
                )
                .build()
        });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw merged document for external consumers
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge every module's OpenAPI fragment into one document.
///
/// Module paths are prefixed with `/api/{module_name}`; schemas are merged
/// by name, later modules winning.
pub fn merged_openapi(registry: &ModuleRegistry) -> serde_json::Value {
    let mut openapi_spec = serde_json::json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Library Management API",
            "version": "1.0.0",
            "description": "RESTful API for managing library inventory, authors, and borrowers"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
        "type": "object",
        "properties": {
            "success": { "type": "boolean" },
            "message": { "type": "string" },
            "errors": { "type": "array", "items": { "type": "string" } },
            "code": { "type": "string" },
            "trace_id": { "type": "string" },
            "timestamp": { "type": "string" }
        },
        "required": ["success", "message", "code", "trace_id", "timestamp"]
    });

    openapi_spec["paths"]["/healthz"] = serde_json::json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": {
                                "type": "string"
                            }
                        }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths_obj) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths_obj {
                let prefixed_path = if path == "/" {
                    format!("/api/{}", module.name())
                } else {
                    format!("/api/{}{}", module.name(), path)
                };
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas_obj) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas_obj {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// Typed form of a merged document, as served to Swagger UI.
pub fn swagger_document(
    openapi_spec: &serde_json::Value,
) -> Result<utoipa::openapi::OpenApi, serde_json::Error> {
    utoipa::openapi::OpenApi::deserialize(openapi_spec)
}

/// JSON 404 for paths no route or static file matched
async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

/// Request IDs as time-ordered UUIDv7
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7().to_string().parse::<HeaderValue>().ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use tower::ServiceExt;

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_module_mounting() {
        let module_router = Router::new().route("/", get(|| async { "module" }));

        let router = RouterBuilder::new()
            .mount_module("books", module_router)
            .build();

        let response = router.oneshot(get_request("/api/books")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let router = RouterBuilder::new()
            .route("/healthz", get(|| async { "ok" }))
            .with_not_found()
            .build();

        let response = router.oneshot(get_request("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            HeaderValue::from_static("application/json")
        );
    }

    #[tokio::test]
    async fn test_missing_static_file_falls_back_to_json_404() {
        let router = RouterBuilder::new()
            .with_static_files("/nonexistent/libris/public")
            .build();

        let response = router.oneshot(get_request("/missing.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_middleware_chain_sets_request_id() {
        let router = RouterBuilder::new()
            .route("/healthz", get(|| async { "ok" }))
            .with_timeout(5000)
            .with_cors()
            .with_tracing()
            .with_request_id()
            .build();

        let response = router.oneshot(get_request("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request_id = response.headers()["x-request-id"].to_str().unwrap();
        assert!(Uuid::parse_str(request_id).is_ok());
    }

    #[test]
    fn test_openapi_merge_prefixes_module_paths() {
        struct Shelf;

        #[async_trait::async_trait]
        impl libris_kernel::Module for Shelf {
            fn name(&self) -> &'static str {
                "shelves"
            }

            fn openapi(&self) -> Option<serde_json::Value> {
                Some(serde_json::json!({
                    "paths": { "/": {}, "/{id}": {} },
                    "components": { "schemas": { "Shelf": { "type": "object" } } }
                }))
            }
        }

        let mut registry = ModuleRegistry::new();
        registry.register_custom(std::sync::Arc::new(Shelf));

        let spec = merged_openapi(&registry);
        assert!(spec["paths"].get("/api/shelves").is_some());
        assert!(spec["paths"].get("/api/shelves/{id}").is_some());
        assert!(spec["components"]["schemas"].get("Shelf").is_some());
        assert!(spec["components"]["schemas"].get("ErrorResponse").is_some());
    }

    #[test]
    fn test_merged_document_is_accepted_by_swagger() {
        let registry = ModuleRegistry::new();
        let document = swagger_document(&merged_openapi(&registry)).unwrap();

        assert!(document.paths.paths.contains_key("/healthz"));
        assert!(document.components.is_some());
    }
}

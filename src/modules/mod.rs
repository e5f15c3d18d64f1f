//! HTTP modules mounted under `/api/{module}`, all sharing one [`Library`].

pub mod authors;
pub mod books;
pub mod borrowers;
pub mod docs;
pub mod catalog;

use libris_db::{parse_id, Id};
use libris_http::AppError;
use libris_kernel::ModuleRegistry;
use serde_json::Value;

use crate::library::{EntityKind, Library, LibraryError};

/// Register the library core module and every route module with the registry
pub fn register_all(registry: &mut ModuleRegistry, library: &Library) {
    registry.register_core(catalog::create_module(library.clone()));
    registry.register_custom(books::create_module(library.clone()));
    registry.register_custom(authors::create_module(library.clone()));
    registry.register_custom(borrowers::create_module(library.clone()));
    registry.register_custom(docs::create_module());
}

impl From<LibraryError> for AppError {
    fn from(error: LibraryError) -> Self {
        let message = error.to_string();
        match error {
            LibraryError::NotFound(_) => AppError::not_found(message),
            LibraryError::Validation(errors) => {
                AppError::validation(errors.into_iter().map(Value::String).collect(), message)
            }
            LibraryError::Conflict(_) => AppError::conflict(Vec::new(), message),
        }
    }
}

/// Normalize a path identifier; one that is not an integer matches nothing.
pub(crate) fn resolve_id(raw: &str, kind: EntityKind) -> Result<Id, AppError> {
    parse_id(raw).ok_or_else(|| LibraryError::NotFound(kind).into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    /// Send one request through `router`, returning status and JSON body.
    pub async fn send(
        router: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

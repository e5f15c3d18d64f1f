use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use libris_http::{ApiResponse, AppError};

use crate::library::{Author, AuthorDetails, AuthorPayload, EntityKind, Library};
use crate::modules::resolve_id;

/// Routes mounted under `/api/authors`
pub fn router(library: Library) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .with_state(library)
}

async fn list_authors(State(library): State<Library>) -> ApiResponse<Vec<Author>> {
    let authors = library.list_authors().await;
    let count = authors.len();
    ApiResponse::ok(authors).with_count(count)
}

async fn get_author(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<ApiResponse<AuthorDetails>, AppError> {
    let id = resolve_id(&id, EntityKind::Author)?;
    Ok(ApiResponse::ok(library.get_author(id).await?))
}

async fn create_author(
    State(library): State<Library>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> Result<ApiResponse<Author>, AppError> {
    let Json(payload) = payload?;
    let author = library.create_author(payload).await?;
    Ok(ApiResponse::created(author).with_message("Author created successfully"))
}

async fn update_author(
    State(library): State<Library>,
    Path(id): Path<String>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> Result<ApiResponse<Author>, AppError> {
    let id = resolve_id(&id, EntityKind::Author)?;
    let Json(payload) = payload?;
    let author = library.update_author(id, payload).await?;
    Ok(ApiResponse::ok(author).with_message("Author updated successfully"))
}

async fn delete_author(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = resolve_id(&id, EntityKind::Author)?;
    library.delete_author(id).await?;
    Ok(ApiResponse::message("Author deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::send;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    async fn demo_router() -> Router {
        let library = Library::new();
        library.seed_demo().await;
        router(library)
    }

    #[tokio::test]
    async fn get_author_includes_matching_books() {
        let router = demo_router().await;

        let (status, body) = send(router, Method::GET, "/1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Harper Lee");
        assert_eq!(body["data"]["books"][0]["title"], "To Kill a Mockingbird");
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let router = demo_router().await;

        let (status, body) = send(
            router.clone(),
            Method::POST,
            "/",
            Some(json!({"name": "Frank Herbert"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["data"],
            json!({
                "id": 4,
                "name": "Frank Herbert",
                "biography": "",
                "birthYear": null,
                "nationality": ""
            })
        );

        let (_, body) = send(router, Method::GET, "/", None).await;
        assert_eq!(body["count"], 4);
    }

    #[tokio::test]
    async fn renamed_author_loses_books() {
        let router = demo_router().await;

        let (status, _) = send(
            router.clone(),
            Method::PUT,
            "/2",
            Some(json!({"name": "Eric Blair"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(router, Method::GET, "/2", None).await;
        assert_eq!(body["data"]["nationality"], "British");
        assert_eq!(body["data"]["books"], json!([]));
    }

    #[tokio::test]
    async fn update_without_name_is_rejected() {
        let router = demo_router().await;

        let (status, body) = send(
            router,
            Method::PUT,
            "/1",
            Some(json!({"nationality": "US"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], json!(["Name is required"]));
    }

    #[tokio::test]
    async fn delete_author_keeps_books() {
        let router = demo_router().await;

        let (status, body) = send(router.clone(), Method::DELETE, "/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Author deleted successfully");

        let (status, body) = send(router, Method::GET, "/3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Author not found");
    }
}

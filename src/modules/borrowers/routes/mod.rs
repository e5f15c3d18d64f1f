use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use libris_http::{ApiResponse, AppError};

use crate::library::{Borrower, BorrowerDetails, BorrowerPayload, EntityKind, Library};
use crate::modules::resolve_id;

/// Routes mounted under `/api/borrowers`
pub fn router(library: Library) -> Router {
    Router::new()
        .route("/", get(list_borrowers).post(create_borrower))
        .route(
            "/{id}",
            get(get_borrower).put(update_borrower).delete(delete_borrower),
        )
        .with_state(library)
}

async fn list_borrowers(State(library): State<Library>) -> ApiResponse<Vec<Borrower>> {
    let borrowers = library.list_borrowers().await;
    let count = borrowers.len();
    ApiResponse::ok(borrowers).with_count(count)
}

async fn get_borrower(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<ApiResponse<BorrowerDetails>, AppError> {
    let id = resolve_id(&id, EntityKind::Borrower)?;
    Ok(ApiResponse::ok(library.get_borrower(id).await?))
}

async fn create_borrower(
    State(library): State<Library>,
    payload: Result<Json<BorrowerPayload>, JsonRejection>,
) -> Result<ApiResponse<Borrower>, AppError> {
    let Json(payload) = payload?;
    let borrower = library.create_borrower(payload).await?;
    Ok(ApiResponse::created(borrower).with_message("Borrower created successfully"))
}

async fn update_borrower(
    State(library): State<Library>,
    Path(id): Path<String>,
    payload: Result<Json<BorrowerPayload>, JsonRejection>,
) -> Result<ApiResponse<Borrower>, AppError> {
    let id = resolve_id(&id, EntityKind::Borrower)?;
    let Json(payload) = payload?;
    let borrower = library.update_borrower(id, payload).await?;
    Ok(ApiResponse::ok(borrower).with_message("Borrower updated successfully"))
}

async fn delete_borrower(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = resolve_id(&id, EntityKind::Borrower)?;
    library.delete_borrower(id).await?;
    Ok(ApiResponse::message("Borrower deleted successfully"))
}

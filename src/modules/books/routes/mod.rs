use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use libris_http::{ApiResponse, AppError};

use super::models::{BookQuery, BorrowRequest};
use crate::library::{Book, BookPayload, BorrowReceipt, EntityKind, Library};
use crate::modules::resolve_id;

/// Routes mounted under `/api/books`
pub fn router(library: Library) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .route("/{id}/borrow", post(borrow_book))
        .route("/{id}/return", post(return_book))
        .with_state(library)
}

async fn list_books(
    State(library): State<Library>,
    Query(query): Query<BookQuery>,
) -> ApiResponse<Vec<Book>> {
    let listing = library.list_books(&query.into()).await;
    ApiResponse::ok(listing.books).with_count(listing.count)
}

async fn get_book(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    let id = resolve_id(&id, EntityKind::Book)?;
    Ok(ApiResponse::ok(library.get_book(id).await?))
}

async fn create_book(
    State(library): State<Library>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(payload) = payload?;
    let book = library.create_book(payload).await?;
    Ok(ApiResponse::created(book).with_message("Book created successfully"))
}

async fn update_book(
    State(library): State<Library>,
    Path(id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let id = resolve_id(&id, EntityKind::Book)?;
    let Json(payload) = payload?;
    let book = library.update_book(id, payload).await?;
    Ok(ApiResponse::ok(book).with_message("Book updated successfully"))
}

async fn delete_book(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = resolve_id(&id, EntityKind::Book)?;
    library.delete_book(id).await?;
    Ok(ApiResponse::message("Book deleted successfully"))
}

async fn borrow_book(
    State(library): State<Library>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<ApiResponse<BorrowReceipt>, AppError> {
    let id = resolve_id(&id, EntityKind::Book)?;
    // An absent body reads as an unknown borrower, reported after the book checks
    let request: BorrowRequest = if body.iter().all(u8::is_ascii_whitespace) {
        BorrowRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| AppError::bad_request(format!("Invalid borrow request: {}", err)))?
    };

    let receipt = library.borrow_book(id, request.borrower_id()).await?;
    Ok(ApiResponse::ok(receipt).with_message("Book borrowed successfully"))
}

async fn return_book(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    let id = resolve_id(&id, EntityKind::Book)?;
    let book = library.return_book(id).await?;
    Ok(ApiResponse::ok(book).with_message("Book returned successfully"))
}

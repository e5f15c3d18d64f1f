//! Success envelope shared by every module endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{ success, message?, count?, data? }` with the HTTP status carried alongside.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with a payload
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    /// 201 with the created resource
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message, e.g. after a delete
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn render<T: Serialize>(response: ApiResponse<T>) -> (StatusCode, Value) {
        let response = response.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn list_envelope_carries_count() {
        let (status, body) = render(ApiResponse::ok(vec![1, 2, 3]).with_count(3)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "count": 3, "data": [1, 2, 3]}));
    }

    #[tokio::test]
    async fn created_envelope_uses_201() {
        let (status, body) =
            render(ApiResponse::created(json!({"id": 4})).with_message("Book created successfully"))
                .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Book created successfully");
        assert_eq!(body["data"]["id"], 4);
    }

    #[tokio::test]
    async fn message_only_envelope_has_no_data() {
        let (_, body) = render(ApiResponse::message("Book deleted successfully")).await;
        assert_eq!(
            body,
            json!({"success": true, "message": "Book deleted successfully"})
        );
    }
}

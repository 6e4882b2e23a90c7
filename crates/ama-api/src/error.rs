use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::toggle::ToggleError;

/// Stable, machine-readable error codes. Clients match on these, never on
/// the message text.
pub mod error_code {
    pub const QUESTION_NOT_FOUND: &str = "QUESTION_NOT_FOUND";
    pub const ROOM_NOT_FOUND: &str = "ROOM_NOT_FOUND";
    pub const LIKE_NOT_FOUND: &str = "LIKE_NOT_FOUND";
    pub const ALREADY_LIKED: &str = "ALREADY_LIKED";
    pub const ROOM_EXISTS: &str = "ROOM_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by every handler. Serialized as
/// `{"code": "ALREADY_LIKED", "error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("question not found")]
    QuestionNotFound,

    #[error("room not found")]
    RoomNotFound,

    #[error("like not found")]
    LikeNotFound,

    #[error("question already liked by this participant")]
    AlreadyLiked,

    #[error("a room with this id already exists")]
    RoomExists,

    #[error("{0}")]
    Validation(String),

    #[error("store unavailable, retry later")]
    StoreUnavailable,

    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::QuestionNotFound => error_code::QUESTION_NOT_FOUND,
            ApiError::RoomNotFound => error_code::ROOM_NOT_FOUND,
            ApiError::LikeNotFound => error_code::LIKE_NOT_FOUND,
            ApiError::AlreadyLiked => error_code::ALREADY_LIKED,
            ApiError::RoomExists => error_code::ROOM_EXISTS,
            ApiError::Validation(_) => error_code::VALIDATION_FAILED,
            ApiError::StoreUnavailable => error_code::STORE_UNAVAILABLE,
            ApiError::Internal => error_code::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::QuestionNotFound | ApiError::RoomNotFound | ApiError::LikeNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::AlreadyLiked | ApiError::RoomExists => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "code": self.error_code(),
            "error": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        error!("Store error: {:#}", e);
        ApiError::StoreUnavailable
    }
}

impl From<ToggleError> for ApiError {
    fn from(e: ToggleError) -> Self {
        match e {
            ToggleError::QuestionNotFound => ApiError::QuestionNotFound,
            ToggleError::AlreadyLiked => ApiError::AlreadyLiked,
            ToggleError::NotLiked => ApiError::LikeNotFound,
            ToggleError::StoreUnavailable(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::QuestionNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::LikeNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::AlreadyLiked.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::RoomExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::StoreUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_toggle_errors_keep_their_meaning() {
        assert_eq!(ApiError::from(ToggleError::NotLiked).error_code(), "LIKE_NOT_FOUND");
        assert_eq!(ApiError::from(ToggleError::QuestionNotFound).error_code(), "QUESTION_NOT_FOUND");
        assert_eq!(ApiError::from(ToggleError::AlreadyLiked).error_code(), "ALREADY_LIKED");
        let store = ToggleError::StoreUnavailable(anyhow::anyhow!("disk I/O error"));
        assert_eq!(ApiError::from(store).error_code(), "STORE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_json_body_hides_store_details() {
        let resp = ApiError::from(anyhow::anyhow!("database is locked")).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "STORE_UNAVAILABLE");
        assert!(!body["error"].as_str().unwrap().contains("locked"));
    }
}

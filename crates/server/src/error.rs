use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    audience::AudienceError, comment_feed::CommentFeedError, comment_posting::CommentPostError,
};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    CommentFeed(#[from] CommentFeedError),
    #[error(transparent)]
    Audience(#[from] AudienceError),
    #[error(transparent)]
    CommentPost(#[from] CommentPostError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)
            | ApiError::CommentPost(CommentPostError::ThreadNotFound)
            | ApiError::CommentPost(CommentPostError::ContextNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::CommentPost(CommentPostError::EmptyContent) => StatusCode::BAD_REQUEST,
            ApiError::CommentFeed(_)
            | ApiError::Audience(_)
            | ApiError::CommentPost(CommentPostError::Database(_))
            | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Failed to load data, please try again".to_string()
        } else {
            self.to_string()
        };
        let body = ApiResponse::<()>::error(&message);
        (status, Json(body)).into_response()
    }
}

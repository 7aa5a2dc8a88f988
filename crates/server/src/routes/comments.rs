//! Posting comments and thread replies.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::post,
};
use db::models::{
    comment::{Comment, CommentImage, CreateComment},
    comment_context::CommentContext,
};
use serde::Deserialize;
use services::services::comment_posting::CommentPostingService;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use super::feed::ensure_project;
use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct CreateCommentRequest {
    /// Omitted means a project-level comment.
    #[serde(default)]
    pub context: CommentContext,
    pub content: String,
    pub author_id: Uuid,
    #[serde(default)]
    pub images: Vec<CommentImage>,
}

#[derive(Debug, Deserialize, TS)]
pub struct ReplyRequest {
    pub content: String,
    pub author_id: Uuid,
    #[serde(default)]
    pub images: Vec<CommentImage>,
}

/// POST /api/projects/{project_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<ResponseJson<ApiResponse<Comment>>, ApiError> {
    ensure_project(&state, project_id).await?;
    let comment = CommentPostingService::post(
        state.db(),
        CreateComment {
            project_id,
            context: payload.context,
            content: payload.content,
            created_by: payload.author_id,
            images: payload.images,
        },
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

/// POST /api/projects/{project_id}/threads/{comment_id}/replies
pub async fn reply_to_thread(
    State(state): State<AppState>,
    Path((project_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ReplyRequest>,
) -> Result<ResponseJson<ApiResponse<Comment>>, ApiError> {
    ensure_project(&state, project_id).await?;
    let reply = CommentPostingService::reply(
        state.db(),
        project_id,
        comment_id,
        payload.author_id,
        payload.content,
        payload.images,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(reply)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/{project_id}/comments", post(create_comment))
        .route(
            "/projects/{project_id}/threads/{comment_id}/replies",
            post(reply_to_thread),
        )
}

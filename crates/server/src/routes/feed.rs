//! Read side of the project feed: merged feed, comment threads, activity.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{activity_log::ActivityLogItem, project::Project};
use serde::Deserialize;
use services::services::{
    activity_feed::ActivityFeedService,
    audience::AudienceService,
    comment_feed::CommentFeedService,
    comment_threads::{ThreadGroup, group_comments},
    unified_feed::{FeedFilter, UnifiedFeedItem, UnifiedFeedService},
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub filter: FeedFilter,
}

#[derive(Debug, Deserialize)]
pub struct ThreadsQuery {
    /// Only threads relevant to this user.
    pub user_id: Option<Uuid>,
}

pub(crate) async fn ensure_project(state: &AppState, project_id: Uuid) -> Result<(), ApiError> {
    Project::find_by_id(&state.db().pool, project_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("project {project_id} not found")))
}

/// GET /api/projects/{project_id}/feed
pub async fn get_feed(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<FeedQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<UnifiedFeedItem>>>, ApiError> {
    ensure_project(&state, project_id).await?;
    let items =
        UnifiedFeedService::load(state.db(), project_id, state.config().activity_feed_limit)
            .await?;
    Ok(ResponseJson(ApiResponse::success(query.filter.apply(items))))
}

/// GET /api/projects/{project_id}/threads
pub async fn get_threads(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ThreadsQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ThreadGroup>>>, ApiError> {
    ensure_project(&state, project_id).await?;
    let comments = CommentFeedService::aggregate(state.db(), project_id).await?;
    let mut threads = group_comments(comments);
    if let Some(user_id) = query.user_id {
        threads =
            AudienceService::filter_for_user(state.db(), threads, user_id, project_id).await?;
    }
    Ok(ResponseJson(ApiResponse::success(threads)))
}

/// GET /api/projects/{project_id}/activity
pub async fn get_activity(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<ActivityLogItem>>>, ApiError> {
    ensure_project(&state, project_id).await?;
    let activities =
        ActivityFeedService::fetch(state.db(), project_id, state.config().activity_feed_limit)
            .await;
    Ok(ResponseJson(ApiResponse::success(activities)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/{project_id}/feed", get(get_feed))
        .route("/projects/{project_id}/threads", get(get_threads))
        .route("/projects/{project_id}/activity", get(get_activity))
}

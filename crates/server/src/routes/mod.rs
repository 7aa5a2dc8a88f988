use axum::{Router, response::Json as ResponseJson, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utils::response::ApiResponse;

use crate::AppState;

pub mod comments;
pub mod feed;

async fn health() -> ResponseJson<ApiResponse<String>> {
    ResponseJson(ApiResponse::success("OK".to_string()))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(feed::router())
        .merge(comments::router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

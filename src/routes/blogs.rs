use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::feed::PostDto;
use crate::state::AppState;

pub fn router(api_prefix: &str) -> Router<AppState> {
    let path = format!("{}/blogs", api_prefix.trim_end_matches('/'));
    Router::new().route(&path, get(list_blogs))
}

/// GET /{namespace}/blogs
///
/// Every published post as a JSON array. Collaborator failures surface as
/// an opaque 500.
pub async fn list_blogs(State(state): State<AppState>) -> AppResult<Json<Vec<PostDto>>> {
    let feed = state.feed.clone();
    let posts = tokio::task::spawn_blocking(move || feed.list_blogs()).await??;

    tracing::debug!(count = posts.len(), "Served published posts");
    Ok(Json(posts))
}

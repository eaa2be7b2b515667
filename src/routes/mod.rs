pub mod blogs;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router. Routes are registered here, once, at startup.
pub fn app(state: AppState, api_prefix: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .merge(blogs::router(api_prefix))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

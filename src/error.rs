use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure raised by a collaborator while building a response.
///
/// Every variant maps to the same opaque 500; the variants exist so the
/// log line says which collaborator gave up.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {}", e),
            AppError::Pool(e) => tracing::error!("Pool error: {}", e),
            AppError::Metadata(e) => tracing::error!("Malformed image metadata: {}", e),
            AppError::Task(e) => tracing::error!("Request task failed: {}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
            .into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub mod error;
pub mod extract;
pub mod likes;
pub mod participant;
pub mod questions;
pub mod ranking;
pub mod rooms;
pub mod toggle;
pub mod views;

use std::sync::Arc;

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use ama_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Honour `X-Forwarded-For` / `X-Real-IP` when identifying participants.
    pub trust_proxy_headers: bool,
}

/// Build the full HTTP surface. Room routes all pass through participant
/// identification.
pub fn router(state: AppState) -> Router {
    let room_routes = Router::new()
        .route("/rooms/{room_id}", get(rooms::get_room).post(rooms::create_room))
        .route(
            "/rooms/{room_id}/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/rooms/{room_id}/questions/{question_id}",
            patch(questions::update_question),
        )
        .route(
            "/rooms/{room_id}/questions/{question_id}/like",
            post(likes::like_question).delete(likes::unlike_question),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            participant::identify_participant,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(room_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run store work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
}

#[cfg(test)]
pub(crate) mod test_support {
    use ama_db::Database;
    use tempfile::TempDir;

    pub fn open_temp() -> (TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open(&dir.path().join("ama-api-test.db")).expect("open db");
        (dir, db)
    }
}

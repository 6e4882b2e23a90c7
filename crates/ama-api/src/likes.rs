use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use ama_types::models::LikeIntent;

use crate::error::ApiError;
use crate::participant::Participant;
use crate::toggle::toggle_like;
use crate::{AppState, blocking};

/// POST /rooms/{room_id}/questions/{question_id}/like
pub async fn like_question(
    state: State<AppState>,
    path: Path<(String, String)>,
    participant: Extension<Participant>,
) -> Result<impl IntoResponse, ApiError> {
    apply(state, path, participant, LikeIntent::Like).await
}

/// DELETE /rooms/{room_id}/questions/{question_id}/like
pub async fn unlike_question(
    state: State<AppState>,
    path: Path<(String, String)>,
    participant: Extension<Participant>,
) -> Result<impl IntoResponse, ApiError> {
    apply(state, path, participant, LikeIntent::Unlike).await
}

async fn apply(
    State(state): State<AppState>,
    Path((room_id, question_id)): Path<(String, String)>,
    Extension(participant): Extension<Participant>,
    intent: LikeIntent,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = blocking(&state, move |db| {
        Ok(toggle_like(
            db,
            &room_id,
            &question_id,
            participant.as_str(),
            intent,
        )?)
    })
    .await?;

    Ok(Json(outcome))
}

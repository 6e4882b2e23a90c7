use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use ama_types::api::{
    CreateQuestionRequest, QuestionResponse, QuestionView, QuestionsResponse, UpdateQuestionRequest,
};
use ama_types::models::Question;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::participant::Participant;
use crate::ranking::rank;
use crate::views::question_view;
use crate::{AppState, blocking};

/// GET /rooms/{room_id}/questions: every question in the room, ranked,
/// each carrying whether the caller has liked it.
pub async fn list_questions(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Extension(participant): Extension<Participant>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = blocking(&state, move |db| {
        db.ensure_room(&room_id, Utc::now())?;
        Ok(db.list_questions(&room_id, participant.as_str())?)
    })
    .await?;

    let questions = rank(rows.into_iter().map(question_view).collect());
    Ok(Json(QuestionsResponse { questions }))
}

pub async fn create_question(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ApiJson(req): ApiJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::Validation("content is required".into()));
    }

    let now = Utc::now();
    let question = Question {
        id: Uuid::new_v4(),
        room_id,
        content,
        answered: false,
        created_at: now,
        updated_at: now,
    };

    let stored = question.clone();
    blocking(&state, move |db| {
        db.ensure_room(&stored.room_id, now)?;
        db.create_question(&stored.id.to_string(), &stored.room_id, &stored.content, now)?;
        Ok(())
    })
    .await?;

    info!("Question {} created in room {}", question.id, question.room_id);
    Ok((
        StatusCode::CREATED,
        Json(QuestionResponse {
            question: QuestionView::new(question, 0, false),
        }),
    ))
}

/// PATCH /rooms/{room_id}/questions/{question_id}: mark answered or not.
/// Presentation only; the question keeps its rank.
pub async fn update_question(
    State(state): State<AppState>,
    Path((room_id, question_id)): Path<(String, String)>,
    Extension(participant): Extension<Participant>,
    ApiJson(req): ApiJson<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let qid = question_id.clone();
    let row = blocking(&state, move |db| {
        if !db.set_answered(&room_id, &qid, req.answered, Utc::now())? {
            return Err(ApiError::QuestionNotFound);
        }
        db.get_question_listing(&room_id, &qid, participant.as_str())?
            .ok_or(ApiError::QuestionNotFound)
    })
    .await?;

    info!("Question {} answered={}", question_id, req.answered);
    Ok(Json(QuestionResponse {
        question: question_view(row),
    }))
}

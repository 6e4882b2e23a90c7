use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Question, Room};

// -- Rooms --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRoomRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    #[serde(flatten)]
    pub room: Room,
    pub question_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomResponse {
    pub room: RoomView,
}

// -- Questions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateQuestionRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateQuestionRequest {
    pub answered: bool,
}

/// A question as seen by one participant: live like count plus whether
/// that participant is among the likers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: Uuid,
    pub content: String,
    pub like_count: u64,
    pub liked_by_caller: bool,
    pub answered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionView {
    pub fn new(question: Question, like_count: u64, liked_by_caller: bool) -> Self {
        Self {
            id: question.id,
            content: question.content,
            like_count,
            liked_by_caller,
            answered: question.answered,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: QuestionView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionView>,
}

// -- Likes --

/// Authoritative post-mutation state of one participant's like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub like_count: u64,
    pub liked: bool,
}

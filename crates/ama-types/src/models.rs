use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A question as stored. The like count is never part of the stored record;
/// it is always read from the like ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub room_id: String,
    pub content: String,
    pub answered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the caller wants the like state to become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeIntent {
    Like,
    Unlike,
}

impl LikeIntent {
    /// The `liked` flag a successful toggle with this intent leaves behind.
    pub fn resulting_flag(self) -> bool {
        matches!(self, Self::Like)
    }
}

//! Database row types. These map directly to SQLite rows.
//! Distinct from ama-types API models to keep the DB layer independent.

pub struct RoomRow {
    pub id: String,
    pub name: Option<String>,
    pub created_at: String,
    pub question_count: u64,
}

pub struct QuestionRow {
    pub id: String,
    pub room_id: String,
    pub content: String,
    pub answered: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A question joined with its live like count and whether the requesting
/// participant is one of the likers.
pub struct QuestionListingRow {
    pub question: QuestionRow,
    pub like_count: u64,
    pub liked_by_caller: bool,
}

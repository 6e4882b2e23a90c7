//! Like/unlike coordination.
//!
//! One call checks that the question exists in the room, applies a single
//! ledger mutation, and reads the count back. The count is always read after
//! the mutation committed and is never cached here.

use ama_db::{Database, LedgerError};
use ama_types::api::LikeResponse;
use ama_types::models::LikeIntent;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("question not found")]
    QuestionNotFound,

    #[error("question already liked by this participant")]
    AlreadyLiked,

    #[error("like not found")]
    NotLiked,

    #[error("store unavailable: {0}")]
    StoreUnavailable(anyhow::Error),
}

impl From<LedgerError> for ToggleError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::AlreadyLiked => ToggleError::AlreadyLiked,
            LedgerError::NotLiked => ToggleError::NotLiked,
            LedgerError::StoreUnavailable(inner) => ToggleError::StoreUnavailable(inner),
        }
    }
}

pub fn toggle_like(
    db: &Database,
    room_id: &str,
    question_id: &str,
    participant_id: &str,
    intent: LikeIntent,
) -> Result<LikeResponse, ToggleError> {
    let question = db
        .find_question(question_id)
        .map_err(ToggleError::StoreUnavailable)?;
    if !question.is_some_and(|q| q.room_id == room_id) {
        return Err(ToggleError::QuestionNotFound);
    }

    let applied = match intent {
        LikeIntent::Like => db.add_like(question_id, participant_id),
        LikeIntent::Unlike => db.remove_like(question_id, participant_id),
    };
    if let Err(e) = applied {
        debug!(
            "{:?} by {} on question {} rejected: {}",
            intent, participant_id, question_id, e
        );
        return Err(e.into());
    }

    let like_count = db.count_likes(question_id)?;
    debug!(
        "{:?} by {} on question {} applied, count now {}",
        intent, participant_id, question_id, like_count
    );

    Ok(LikeResponse {
        like_count,
        liked: intent.resulting_flag(),
    })
}

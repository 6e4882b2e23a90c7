//! The like ledger: one row per (question, participant) fact.
//!
//! Uniqueness lives in the `likes` primary key, and each mutation is a single
//! statement, so a like is never half-applied and two concurrent likes from
//! the same participant cannot both land.

use chrono::Utc;
use thiserror::Error;

use crate::{Database, format_timestamp};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The participant already likes this question.
    #[error("question already liked by this participant")]
    AlreadyLiked,

    /// The participant has no like on this question to remove.
    #[error("like not found")]
    NotLiked,

    /// The backing store failed; nothing was applied.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl Database {
    pub fn has_liked(&self, question_id: &str, participant_id: &str) -> Result<bool, LedgerError> {
        let liked = self.with_conn(|conn| {
            let found: bool = conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM likes WHERE question_id = ?1 AND participant_id = ?2)",
                [question_id, participant_id],
                |row| row.get(0),
            )?;
            Ok(found)
        })?;
        Ok(liked)
    }

    /// Records a like. The insert is conditional on the composite key, so
    /// the check and the write are one atomic step.
    pub fn add_like(&self, question_id: &str, participant_id: &str) -> Result<(), LedgerError> {
        let inserted = self.with_conn_mut(|conn| {
            let n = conn.execute(
                "INSERT OR IGNORE INTO likes (question_id, participant_id, created_at)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![question_id, participant_id, format_timestamp(Utc::now())],
            )?;
            Ok(n)
        })?;

        if inserted == 0 {
            return Err(LedgerError::AlreadyLiked);
        }
        Ok(())
    }

    pub fn remove_like(&self, question_id: &str, participant_id: &str) -> Result<(), LedgerError> {
        let deleted = self.with_conn_mut(|conn| {
            let n = conn.execute(
                "DELETE FROM likes WHERE question_id = ?1 AND participant_id = ?2",
                [question_id, participant_id],
            )?;
            Ok(n)
        })?;

        if deleted == 0 {
            return Err(LedgerError::NotLiked);
        }
        Ok(())
    }

    pub fn count_likes(&self, question_id: &str) -> Result<u64, LedgerError> {
        let count = self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM likes WHERE question_id = ?1",
                [question_id],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        })?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::open_temp;
    use std::sync::Barrier;

    fn seeded() -> (tempfile::TempDir, Database) {
        let (dir, db) = open_temp();
        let now = Utc::now();
        db.ensure_room("room", now).unwrap();
        db.create_question("q1", "room", "first", now).unwrap();
        db.create_question("q2", "room", "second", now).unwrap();
        (dir, db)
    }

    #[test]
    fn test_add_then_duplicate_is_rejected() {
        let (_dir, db) = seeded();

        assert!(!db.has_liked("q1", "p1").unwrap());
        db.add_like("q1", "p1").unwrap();
        assert!(db.has_liked("q1", "p1").unwrap());

        assert!(matches!(db.add_like("q1", "p1"), Err(LedgerError::AlreadyLiked)));
        assert_eq!(db.count_likes("q1").unwrap(), 1);
    }

    #[test]
    fn test_toggle_returns_to_previous_count() {
        let (_dir, db) = seeded();
        db.add_like("q1", "other").unwrap();
        let before = db.count_likes("q1").unwrap();

        db.add_like("q1", "p1").unwrap();
        assert_eq!(db.count_likes("q1").unwrap(), before + 1);
        db.remove_like("q1", "p1").unwrap();
        assert_eq!(db.count_likes("q1").unwrap(), before);

        assert!(matches!(db.remove_like("q1", "p1"), Err(LedgerError::NotLiked)));
        assert_eq!(db.count_likes("q1").unwrap(), before);
        assert!(!db.has_liked("q1", "p1").unwrap());
    }

    #[test]
    fn test_likes_are_per_question() {
        let (_dir, db) = seeded();
        db.add_like("q1", "p1").unwrap();
        db.add_like("q2", "p1").unwrap();

        assert_eq!(db.count_likes("q1").unwrap(), 1);
        assert_eq!(db.count_likes("q2").unwrap(), 1);
        assert_eq!(db.count_likes("unknown").unwrap(), 0);
    }

    #[test]
    fn test_like_on_missing_question_is_a_store_error() {
        let (_dir, db) = seeded();
        assert!(matches!(
            db.add_like("missing", "p1"),
            Err(LedgerError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_concurrent_duplicate_likes_only_one_wins() {
        let (_dir, db) = seeded();
        const CALLERS: usize = 16;
        let barrier = Barrier::new(CALLERS);

        let results: Vec<Result<(), LedgerError>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..CALLERS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        db.add_like("q1", "same-participant")
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let wins = results.iter().filter(|r| r.is_ok()).count();
        let dupes = results
            .iter()
            .filter(|r| matches!(r, Err(LedgerError::AlreadyLiked)))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(dupes, CALLERS - 1);
        assert_eq!(db.count_likes("q1").unwrap(), 1);
    }

    #[test]
    fn test_concurrent_distinct_participants_all_succeed() {
        let (_dir, db) = seeded();
        const CALLERS: usize = 16;
        let barrier = Barrier::new(CALLERS);

        std::thread::scope(|s| {
            for i in 0..CALLERS {
                let db = &db;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    db.add_like("q1", &format!("p{i}")).unwrap();
                });
            }
        });

        assert_eq!(db.count_likes("q1").unwrap(), CALLERS as u64);
        for i in 0..CALLERS {
            assert!(db.has_liked("q1", &format!("p{i}")).unwrap());
        }
    }
}

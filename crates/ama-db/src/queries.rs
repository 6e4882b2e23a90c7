use crate::models::{QuestionListingRow, QuestionRow, RoomRow};
use crate::{Database, format_timestamp};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row};

const QUESTION_COLUMNS: &str = "q.id, q.room_id, q.content, q.answered, q.created_at, q.updated_at";

impl Database {
    // -- Rooms --

    /// Creates a room. Returns `false` without touching the existing row if
    /// the id is already taken.
    pub fn create_room(&self, id: &str, name: Option<&str>, now: DateTime<Utc>) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO rooms (id, name, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, name, format_timestamp(now)],
            )?;
            Ok(inserted == 1)
        })
    }

    /// Rooms are addressed by code and come into existence on first use.
    pub fn ensure_room(&self, id: &str, now: DateTime<Utc>) -> Result<()> {
        self.create_room(id, None, now).map(|_| ())
    }

    pub fn get_room(&self, id: &str) -> Result<Option<RoomRow>> {
        self.with_conn(|conn| query_room(conn, id))
    }

    // -- Questions --

    pub fn create_question(
        &self,
        id: &str,
        room_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let ts = format_timestamp(now);
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO questions (id, room_id, content, answered, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 0, ?4, ?4)",
                rusqlite::params![id, room_id, content, ts],
            )?;
            Ok(())
        })
    }

    pub fn find_question(&self, id: &str) -> Result<Option<QuestionRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions q WHERE q.id = ?1");
            conn.query_row(&sql, [id], question_from_row).optional()
        })
    }

    /// Sets the answered flag. Returns `false` if no such question exists in
    /// the room.
    pub fn set_answered(
        &self,
        room_id: &str,
        id: &str,
        answered: bool,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE questions SET answered = ?1, updated_at = ?2 WHERE id = ?3 AND room_id = ?4",
                rusqlite::params![answered, format_timestamp(now), id, room_id],
            )?;
            Ok(updated == 1)
        })
    }

    /// Every question in the room with its live like count and the caller's
    /// like flag, read in one statement. Order is unspecified; ranking is the
    /// caller's job.
    pub fn list_questions(&self, room_id: &str, participant_id: &str) -> Result<Vec<QuestionListingRow>> {
        self.with_conn(|conn| query_listing(conn, "q.room_id = ?1", room_id, participant_id))
    }

    /// Single-question variant of [`Database::list_questions`].
    pub fn get_question_listing(
        &self,
        room_id: &str,
        id: &str,
        participant_id: &str,
    ) -> Result<Option<QuestionListingRow>> {
        self.with_conn(|conn| {
            let sql = listing_sql("q.room_id = ?1 AND q.id = ?3");
            conn.query_row(
                &sql,
                rusqlite::params![room_id, participant_id, id],
                listing_from_row,
            )
            .optional()
        })
    }
}

fn query_room(conn: &Connection, id: &str) -> Result<Option<RoomRow>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.name, r.created_at,
                (SELECT COUNT(*) FROM questions q WHERE q.room_id = r.id)
         FROM rooms r
         WHERE r.id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(RoomRow {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
                question_count: row.get::<_, i64>(3)? as u64,
            })
        })
        .optional()?;

    Ok(row)
}

// ?1 = room id, ?2 = participant id. Counting and the caller flag use the
// same likes table inside one statement, so both come from one snapshot.
fn listing_sql(filter: &str) -> String {
    format!(
        "SELECT {QUESTION_COLUMNS},
                (SELECT COUNT(*) FROM likes l WHERE l.question_id = q.id),
                EXISTS (SELECT 1 FROM likes l WHERE l.question_id = q.id AND l.participant_id = ?2)
         FROM questions q
         WHERE {filter}"
    )
}

fn query_listing(
    conn: &Connection,
    filter: &str,
    room_id: &str,
    participant_id: &str,
) -> Result<Vec<QuestionListingRow>> {
    let mut stmt = conn.prepare(&listing_sql(filter))?;

    let rows = stmt
        .query_map(rusqlite::params![room_id, participant_id], listing_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        id: row.get(0)?,
        room_id: row.get(1)?,
        content: row.get(2)?,
        answered: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<QuestionListingRow> {
    Ok(QuestionListingRow {
        question: question_from_row(row)?,
        like_count: row.get::<_, i64>(6)? as u64,
        liked_by_caller: row.get(7)?,
    })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

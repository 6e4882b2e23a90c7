use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (rooms, questions, likes)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE rooms (
                id          TEXT PRIMARY KEY,
                name        TEXT,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE questions (
                id          TEXT PRIMARY KEY,
                room_id     TEXT NOT NULL REFERENCES rooms(id),
                content     TEXT NOT NULL,
                answered    INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX idx_questions_room
                ON questions(room_id);

            -- One row per (question, participant); the primary key is what
            -- makes a second like from the same participant impossible.
            CREATE TABLE likes (
                question_id     TEXT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
                participant_id  TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                PRIMARY KEY (question_id, participant_id)
            ) WITHOUT ROWID;

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }
}

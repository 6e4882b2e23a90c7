use ama_db::models::{QuestionListingRow, QuestionRow, RoomRow};
use ama_types::api::{QuestionView, RoomView};
use ama_types::models::{Question, Room};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok()
}

fn timestamp_or_default(raw: &str, field: &str, owner: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(|| {
        warn!("Corrupt {} '{}' on '{}'", field, raw, owner);
        DateTime::default()
    })
}

pub fn question_from_row(row: QuestionRow) -> Question {
    Question {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt question id '{}': {}", row.id, e);
            Uuid::default()
        }),
        created_at: timestamp_or_default(&row.created_at, "created_at", &row.id),
        updated_at: timestamp_or_default(&row.updated_at, "updated_at", &row.id),
        room_id: row.room_id,
        content: row.content,
        answered: row.answered,
    }
}

pub fn question_view(row: QuestionListingRow) -> QuestionView {
    QuestionView::new(question_from_row(row.question), row.like_count, row.liked_by_caller)
}

pub fn room_view(row: RoomRow) -> RoomView {
    RoomView {
        room: Room {
            created_at: timestamp_or_default(&row.created_at, "created_at", &row.id),
            id: row.id,
            name: row.name,
        },
        question_count: row.question_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2025-03-01T12:30:45.123456Z").unwrap();
        assert_eq!(rfc.nanosecond(), 123_456_000);

        let stored = parse_timestamp(&ama_db::format_timestamp(rfc)).unwrap();
        assert_eq!(stored, rfc);

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2025-03-01 12:30:45").is_none());
    }

    #[test]
    fn test_corrupt_id_falls_back() {
        let q = question_from_row(QuestionRow {
            id: "not-a-uuid".into(),
            room_id: "r".into(),
            content: "c".into(),
            answered: true,
            created_at: "2025-03-01T12:30:45Z".into(),
            updated_at: "garbage".into(),
        });
        assert_eq!(q.id, Uuid::default());
        assert_eq!(q.updated_at, DateTime::<Utc>::default());
        assert!(q.answered);
    }
}

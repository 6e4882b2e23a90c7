//! Loads a demo room so a fresh install has something to look at.

use std::path::PathBuf;

use anyhow::Result;
use ama_db::Database;
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

const ROOM_ID: &str = "golang-ama";
const ROOM_NAME: &str = "GoLang AMA Session";

struct SeedQuestion {
    content: &'static str,
    answered: bool,
    likes: usize,
}

const QUESTIONS: &[SeedQuestion] = &[
    SeedQuestion {
        content: "What is Go, and what are its main advantages over Python, Java or C++?",
        answered: false,
        likes: 0,
    },
    SeedQuestion {
        content: "How do goroutines work, and why do they matter for concurrency and parallelism?",
        answered: false,
        likes: 5,
    },
    SeedQuestion {
        content: "What are the best practices for laying out a Go project: packages, modules and directories?",
        answered: true,
        likes: 3,
    },
    SeedQuestion {
        content: "How does memory management in Go differ from other garbage-collected languages?",
        answered: false,
        likes: 0,
    },
];

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ama_seed=info,ama_db=info".into()),
        )
        .init();

    let db_path = std::env::var("AMA_DB_PATH").unwrap_or_else(|_| "ama.db".into());
    let db = Database::open(&PathBuf::from(&db_path))?;

    if seed_demo_room(&db, Utc::now())? {
        info!("Seeded room {} at {}", ROOM_ID, db_path);
    }
    Ok(())
}

/// Creates the demo room and its questions. Returns `false` and leaves the
/// store untouched if the room already has questions.
fn seed_demo_room(db: &Database, start: DateTime<Utc>) -> Result<bool> {
    db.create_room(ROOM_ID, Some(ROOM_NAME), start)?;

    if let Some(room) = db.get_room(ROOM_ID)? {
        if room.question_count > 0 {
            info!("Room {} already has {} questions, nothing to do", ROOM_ID, room.question_count);
            return Ok(false);
        }
    }

    for (i, seed) in QUESTIONS.iter().enumerate() {
        // Spread creation times so the tie-break on recency is visible.
        let created_at = start + Duration::seconds(i as i64);
        let id = Uuid::new_v4().to_string();
        db.create_question(&id, ROOM_ID, seed.content, created_at)?;
        if seed.answered {
            db.set_answered(ROOM_ID, &id, true, created_at)?;
        }
        for n in 1..=seed.likes {
            db.add_like(&id, &format!("user-{n}"))?;
        }
        info!("Question {} created with {} likes", id, seed.likes);
    }

    Ok(true)
}

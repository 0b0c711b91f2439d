//! Database schema and migrations

use rusqlite::Connection;

use crate::Result;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the database schema
///
/// # Errors
///
/// Returns error if migration fails
pub fn init(conn: &Connection) -> Result<()> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r"
        -- Users table (platform-native numeric id, normalized to integer)
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Conversation turns (append-only)
        CREATE TABLE IF NOT EXISTS conversation_turns (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('user_message', 'ai_response', 'channel_context')),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_turns_user ON conversation_turns(user_id);
        CREATE INDEX IF NOT EXISTS idx_turns_user_created ON conversation_turns(user_id, created_at);

        PRAGMA user_version = 1;
        ",
    )?;

    tracing::debug!("migrated schema to v1");
    Ok(())
}

fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r"
        -- Mood check-ins (immutable once created)
        CREATE TABLE IF NOT EXISTS mood_checkins (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            mood TEXT NOT NULL,
            intensity INTEGER CHECK(intensity BETWEEN 1 AND 5),
            activity TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_checkins_user ON mood_checkins(user_id);
        CREATE INDEX IF NOT EXISTS idx_checkins_user_created ON mood_checkins(user_id, created_at);

        PRAGMA user_version = 2;
        ",
    )?;

    tracing::debug!("migrated schema to v2");
    Ok(())
}

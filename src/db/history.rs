//! Conversation history repository
//!
//! Append-only log of conversational turns per user. Turns are never
//! mutated after creation; deletion happens only in bulk via [`HistoryRepo::clear`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbPool;
use crate::{Error, Result};

/// One recorded conversational event tied to a user
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub id: String,
    pub user_id: i64,
    pub content: String,
    pub kind: TurnKind,
    pub created_at: DateTime<Utc>,
}

/// What a turn represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    UserMessage,
    AiResponse,
    ChannelContext,
}

impl TurnKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::UserMessage => "user_message",
            Self::AiResponse => "ai_response",
            Self::ChannelContext => "channel_context",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "user_message" => Some(Self::UserMessage),
            "ai_response" => Some(Self::AiResponse),
            "channel_context" => Some(Self::ChannelContext),
            _ => None,
        }
    }
}

/// Conversation history repository
#[derive(Clone)]
pub struct HistoryRepo {
    pool: DbPool,
}

impl HistoryRepo {
    /// Create a new history repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append a new turn for a user
    ///
    /// No dedup is performed; callers are responsible for not double-appending.
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn append(&self, user_id: i64, content: &str, kind: TurnKind) -> Result<ConversationTurn> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO conversation_turns (id, user_id, content, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![&id, user_id, content, kind.as_str(), &now_str],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(ConversationTurn {
            id,
            user_id,
            content: content.to_string(),
            kind,
            created_at: now,
        })
    }

    /// Get the most recent turns for a user, oldest-to-newest
    ///
    /// Returns an empty sequence for an unknown user.
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn recent(&self, user_id: i64, limit: usize) -> Result<Vec<ConversationTurn>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, content, kind, created_at
                 FROM conversation_turns WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        #[allow(clippy::cast_possible_wrap)]
        let turns = stmt
            .query_map(rusqlite::params![user_id, limit as i64], row_to_turn)
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        Ok(turns)
    }

    /// Get all turns for a user at or after a cutoff, oldest-to-newest
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn since(&self, user_id: i64, cutoff: DateTime<Utc>) -> Result<Vec<ConversationTurn>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, content, kind, created_at
                 FROM conversation_turns WHERE user_id = ?1 AND created_at >= ?2
                 ORDER BY created_at ASC, rowid ASC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let turns = stmt
            .query_map(
                rusqlite::params![user_id, cutoff.to_rfc3339()],
                row_to_turn,
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect();

        Ok(turns)
    }

    /// Delete all turns for a user, returning the count deleted
    ///
    /// Safe to call with no prior turns (no-op, returns 0).
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn clear(&self, user_id: i64) -> Result<usize> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let deleted = conn
            .execute(
                "DELETE FROM conversation_turns WHERE user_id = ?1",
                rusqlite::params![user_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        tracing::debug!(user = user_id, deleted, "cleared conversation history");
        Ok(deleted)
    }

    /// Count turns for a user
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn count(&self, user_id: i64) -> Result<usize> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM conversation_turns WHERE user_id = ?1",
                rusqlite::params![user_id],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn row_to_turn(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationTurn> {
    Ok(ConversationTurn {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        kind: TurnKind::from_str(&row.get::<_, String>(3)?).unwrap_or(TurnKind::UserMessage),
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

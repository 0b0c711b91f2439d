//! User repository

use chrono::{DateTime, Utc};

use super::DbPool;
use crate::{Error, Result};

/// A user, keyed by the platform-native numeric identifier
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User repository
#[derive(Clone)]
pub struct UserRepo {
    pool: DbPool,
}

impl UserRepo {
    /// Create a new user repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find or create a user
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn find_or_create(&self, id: i64) -> Result<User> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let existing: Option<User> = conn
            .query_row(
                "SELECT id, created_at, updated_at FROM users WHERE id = ?1",
                rusqlite::params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        created_at: parse_datetime(&row.get::<_, String>(1)?),
                        updated_at: parse_datetime(&row.get::<_, String>(2)?),
                    })
                },
            )
            .ok();

        if let Some(user) = existing {
            return Ok(user);
        }

        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO users (id, created_at, updated_at) VALUES (?1, ?2, ?2)",
            rusqlite::params![id, &now_str],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(User {
            id,
            created_at: now,
            updated_at: now,
        })
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory;

    #[test]
    fn test_find_or_create_is_idempotent() {
        let repo = UserRepo::new(init_memory().unwrap());

        let user = repo.find_or_create(123_456_789).unwrap();
        assert_eq!(user.id, 123_456_789);

        let again = repo.find_or_create(123_456_789).unwrap();
        assert_eq!(user.id, again.id);
    }
}

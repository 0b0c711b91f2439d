//! Mood check-in repository

use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use super::DbPool;
use crate::{Error, Result};

/// Intensity assumed when a check-in was logged without one
pub const DEFAULT_INTENSITY: u8 = 3;

/// A recorded mood check-in
#[derive(Debug, Clone)]
pub struct MoodCheckIn {
    pub id: String,
    pub user_id: i64,
    pub mood: Mood,
    /// Self-reported intensity 1-5; `None` means the user skipped it
    pub intensity: Option<u8>,
    pub activity: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MoodCheckIn {
    /// Intensity with the absent-value default applied
    #[must_use]
    pub fn effective_intensity(&self) -> u8 {
        self.intensity.unwrap_or(DEFAULT_INTENSITY)
    }
}

/// Mood label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Calm,
    Neutral,
    Sad,
    Anxious,
    Frustrated,
    Tired,
    Confused,
}

impl Mood {
    /// Stable storage/display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Frustrated => "frustrated",
            Self::Tired => "tired",
            Self::Confused => "confused",
        }
    }

    /// Parse a stored or user-supplied label
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "happy" => Some(Self::Happy),
            "calm" => Some(Self::Calm),
            "neutral" => Some(Self::Neutral),
            "sad" => Some(Self::Sad),
            "anxious" => Some(Self::Anxious),
            "frustrated" => Some(Self::Frustrated),
            "tired" => Some(Self::Tired),
            "confused" => Some(Self::Confused),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named analytics window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    /// Last 7 days
    Week,
    /// Last calendar month
    Month,
    /// All recorded check-ins
    All,
}

impl Timeframe {
    /// Inclusive lower bound of the window, or `None` for all-time
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Week => Some(now - chrono::Duration::days(7)),
            Self::Month => Some(now.checked_sub_months(Months::new(1)).unwrap_or(now)),
            Self::All => None,
        }
    }

    /// Parse a user-supplied timeframe name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        })
    }
}

/// Check-in repository
#[derive(Clone)]
pub struct CheckInRepo {
    pool: DbPool,
}

impl CheckInRepo {
    /// Create a new check-in repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record a check-in
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn add(
        &self,
        user_id: i64,
        mood: Mood,
        intensity: Option<u8>,
        activity: Option<&str>,
    ) -> Result<MoodCheckIn> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO mood_checkins (id, user_id, mood, intensity, activity, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![&id, user_id, mood.as_str(), intensity, activity, &now_str],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(MoodCheckIn {
            id,
            user_id,
            mood,
            intensity,
            activity: activity.map(String::from),
            created_at: now,
        })
    }

    /// Get check-ins within a timeframe, oldest-to-newest
    ///
    /// Week and month windows are inclusive of the cutoff instant;
    /// `Timeframe::All` returns every recorded check-in.
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn in_timeframe(&self, user_id: i64, timeframe: Timeframe) -> Result<Vec<MoodCheckIn>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let checkins = if let Some(cutoff) = timeframe.cutoff(Utc::now()) {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, mood, intensity, activity, created_at
                     FROM mood_checkins WHERE user_id = ?1 AND created_at >= ?2
                     ORDER BY created_at ASC, rowid ASC",
                )
                .map_err(|e| Error::Database(e.to_string()))?;

            stmt.query_map(
                rusqlite::params![user_id, cutoff.to_rfc3339()],
                row_to_checkin,
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect()
        } else {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, mood, intensity, activity, created_at
                     FROM mood_checkins WHERE user_id = ?1
                     ORDER BY created_at ASC, rowid ASC",
                )
                .map_err(|e| Error::Database(e.to_string()))?;

            stmt.query_map(rusqlite::params![user_id], row_to_checkin)
                .map_err(|e| Error::Database(e.to_string()))?
                .filter_map(std::result::Result::ok)
                .collect()
        };

        Ok(checkins)
    }
}

fn row_to_checkin(row: &rusqlite::Row<'_>) -> rusqlite::Result<MoodCheckIn> {
    let intensity: Option<i64> = row.get(3)?;
    Ok(MoodCheckIn {
        id: row.get(0)?,
        user_id: row.get(1)?,
        mood: Mood::parse(&row.get::<_, String>(2)?).unwrap_or(Mood::Neutral),
        intensity: intensity.and_then(|i| u8::try_from(i).ok()),
        activity: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

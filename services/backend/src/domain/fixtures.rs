use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::EventStatus;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Sport {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeamDraft {
    pub name: String,
    pub country: String,
    /// Free-text sport name; not checked against `sports`
    pub sport: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub sport: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompetitionDraft {
    pub name: String,
    pub country: String,
    pub sport: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub sport: String,
    pub active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompetitionFilter {
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventDraft {
    pub date: DateTime<Utc>,
    pub competition_id: i64,
    pub team_a_id: i64,
    pub team_b_id: i64,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub competition_id: i64,
    pub team_a_id: i64,
    pub team_b_id: i64,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// On update the path key wins; the body's `event_id` is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResultDraft {
    pub event_id: i64,
    pub score_a: i32,
    pub score_b: i32,
}

/// Final score of an event (one per event)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventResult {
    pub event_id: i64,
    pub score_a: i32,
    pub score_b: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

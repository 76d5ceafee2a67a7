use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use super::{
    parse_column, CreateRepository, DeleteRepository, Keyed, ListRepository, UpdateRepository,
};
use crate::domain::{Event, EventDraft, NoFilter};
use crate::errors::{DecodeError, Result};

macro_rules! event_columns {
    () => {
        "id, date, competition_id, team_a_id, team_b_id, status::text AS status, created_at, updated_at"
    };
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    date: DateTime<Utc>,
    competition_id: i64,
    team_a_id: i64,
    team_b_id: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = DecodeError;

    fn try_from(row: EventRow) -> std::result::Result<Self, Self::Error> {
        Ok(Event {
            id: row.id,
            date: row.date,
            competition_id: row.competition_id,
            team_a_id: row.team_a_id,
            team_b_id: row.team_b_id,
            status: parse_column("status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct EventRepository;

#[async_trait]
impl ListRepository for EventRepository {
    const RESOURCE: &'static str = "Event";

    type Record = Event;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(concat!(
            "SELECT ",
            event_columns!(),
            " FROM events ORDER BY date DESC"
        ))
        .fetch_all(conn)
        .await?;

        let events = rows
            .into_iter()
            .map(Event::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

#[async_trait]
impl CreateRepository for EventRepository {
    type Draft = EventDraft;

    async fn create(conn: &mut PgConnection, draft: &EventDraft) -> Result<Event> {
        let row = sqlx::query_as::<_, EventRow>(concat!(
            "INSERT INTO events (date, competition_id, team_a_id, team_b_id, status) ",
            "VALUES ($1, $2, $3, $4, $5) RETURNING ",
            event_columns!()
        ))
        .bind(draft.date)
        .bind(draft.competition_id)
        .bind(draft.team_a_id)
        .bind(draft.team_b_id)
        .bind(draft.status.as_str())
        .fetch_one(conn)
        .await?;

        Ok(Event::try_from(row)?)
    }
}

impl Keyed for EventRepository {
    type Key = i64;
}

#[async_trait]
impl UpdateRepository for EventRepository {
    async fn update(conn: &mut PgConnection, id: &i64, draft: &EventDraft) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(concat!(
            "UPDATE events ",
            "SET date = $1, competition_id = $2, team_a_id = $3, team_b_id = $4, status = $5 ",
            "WHERE id = $6 RETURNING ",
            event_columns!()
        ))
        .bind(draft.date)
        .bind(draft.competition_id)
        .bind(draft.team_a_id)
        .bind(draft.team_b_id)
        .bind(draft.status.as_str())
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Event::try_from).transpose()?)
    }
}

#[async_trait]
impl DeleteRepository for EventRepository {
    async fn delete(conn: &mut PgConnection, id: &i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

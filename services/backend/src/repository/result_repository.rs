use async_trait::async_trait;
use sqlx::PgConnection;

use super::{CreateRepository, DeleteRepository, Keyed, ListRepository, UpdateRepository};
use crate::domain::{EventResult, NoFilter, ResultDraft};
use crate::errors::Result;

/// Results are keyed by their event; there is at most one per event.
pub struct ResultRepository;

#[async_trait]
impl ListRepository for ResultRepository {
    const RESOURCE: &'static str = "Result";

    type Record = EventResult;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<EventResult>> {
        let results = sqlx::query_as::<_, EventResult>(
            r#"
            SELECT event_id, score_a, score_b, created_at, updated_at
            FROM results
            ORDER BY event_id ASC
            "#,
        )
        .fetch_all(conn)
        .await?;

        Ok(results)
    }
}

#[async_trait]
impl CreateRepository for ResultRepository {
    type Draft = ResultDraft;

    async fn create(conn: &mut PgConnection, draft: &ResultDraft) -> Result<EventResult> {
        let result = sqlx::query_as::<_, EventResult>(
            r#"
            INSERT INTO results (event_id, score_a, score_b)
            VALUES ($1, $2, $3)
            RETURNING event_id, score_a, score_b, created_at, updated_at
            "#,
        )
        .bind(draft.event_id)
        .bind(draft.score_a)
        .bind(draft.score_b)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }
}

impl Keyed for ResultRepository {
    type Key = i64;
}

#[async_trait]
impl UpdateRepository for ResultRepository {
    async fn update(
        conn: &mut PgConnection,
        event_id: &i64,
        draft: &ResultDraft,
    ) -> Result<Option<EventResult>> {
        let result = sqlx::query_as::<_, EventResult>(
            r#"
            UPDATE results
            SET score_a = $1, score_b = $2
            WHERE event_id = $3
            RETURNING event_id, score_a, score_b, created_at, updated_at
            "#,
        )
        .bind(draft.score_a)
        .bind(draft.score_b)
        .bind(event_id)
        .fetch_optional(conn)
        .await?;

        Ok(result)
    }
}

#[async_trait]
impl DeleteRepository for ResultRepository {
    async fn delete(conn: &mut PgConnection, event_id: &i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM results WHERE event_id = $1")
            .bind(event_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

use async_trait::async_trait;
use sqlx::PgConnection;

use super::{CreateRepository, DeleteRepository, Keyed, ListRepository, UpdateRepository};
use crate::domain::{Competition, CompetitionDraft, CompetitionFilter};
use crate::errors::Result;

pub struct CompetitionRepository;

#[async_trait]
impl ListRepository for CompetitionRepository {
    const RESOURCE: &'static str = "Competition";

    type Record = Competition;
    type Filter = CompetitionFilter;

    async fn list(conn: &mut PgConnection, filter: &CompetitionFilter) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(
            r#"
            SELECT id, name, country, sport, active
            FROM competitions
            WHERE ($1::boolean IS NULL OR active = $1)
            ORDER BY id ASC
            "#,
        )
        .bind(filter.active)
        .fetch_all(conn)
        .await?;

        Ok(competitions)
    }
}

#[async_trait]
impl CreateRepository for CompetitionRepository {
    type Draft = CompetitionDraft;

    async fn create(conn: &mut PgConnection, draft: &CompetitionDraft) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            INSERT INTO competitions (name, country, sport, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, country, sport, active
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(&draft.sport)
        .bind(draft.active)
        .fetch_one(conn)
        .await?;

        Ok(competition)
    }
}

impl Keyed for CompetitionRepository {
    type Key = i64;
}

#[async_trait]
impl UpdateRepository for CompetitionRepository {
    async fn update(
        conn: &mut PgConnection,
        id: &i64,
        draft: &CompetitionDraft,
    ) -> Result<Option<Competition>> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            UPDATE competitions
            SET name = $1, country = $2, sport = $3, active = $4
            WHERE id = $5
            RETURNING id, name, country, sport, active
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(&draft.sport)
        .bind(draft.active)
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(competition)
    }
}

#[async_trait]
impl DeleteRepository for CompetitionRepository {
    async fn delete(conn: &mut PgConnection, id: &i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM competitions WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

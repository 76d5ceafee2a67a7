use async_trait::async_trait;
use sqlx::PgConnection;

use super::{CreateRepository, DeleteRepository, Keyed, ListRepository, UpdateRepository};
use crate::domain::{NoFilter, Team, TeamDraft};
use crate::errors::Result;

pub struct TeamRepository;

#[async_trait]
impl ListRepository for TeamRepository {
    const RESOURCE: &'static str = "Team";

    type Record = Team;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, country, sport, created_at, updated_at
            FROM teams
            ORDER BY id ASC
            "#,
        )
        .fetch_all(conn)
        .await?;

        Ok(teams)
    }
}

#[async_trait]
impl CreateRepository for TeamRepository {
    type Draft = TeamDraft;

    async fn create(conn: &mut PgConnection, draft: &TeamDraft) -> Result<Team> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, country, sport)
            VALUES ($1, $2, $3)
            RETURNING id, name, country, sport, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(&draft.sport)
        .fetch_one(conn)
        .await?;

        Ok(team)
    }
}

impl Keyed for TeamRepository {
    type Key = i64;
}

#[async_trait]
impl UpdateRepository for TeamRepository {
    async fn update(conn: &mut PgConnection, id: &i64, draft: &TeamDraft) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET name = $1, country = $2, sport = $3
            WHERE id = $4
            RETURNING id, name, country, sport, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(&draft.sport)
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(team)
    }
}

#[async_trait]
impl DeleteRepository for TeamRepository {
    async fn delete(conn: &mut PgConnection, id: &i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

use async_trait::async_trait;
use sqlx::PgConnection;

use super::{CreateRepository, DeleteRepository, Keyed, ListRepository};
use crate::domain::{NoFilter, Sport};
use crate::errors::Result;

/// Sports are identified by name alone.
pub struct SportRepository;

#[async_trait]
impl ListRepository for SportRepository {
    const RESOURCE: &'static str = "Sport";

    type Record = Sport;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<Sport>> {
        let sports = sqlx::query_as::<_, Sport>("SELECT name FROM sports ORDER BY name ASC")
            .fetch_all(conn)
            .await?;

        Ok(sports)
    }
}

#[async_trait]
impl CreateRepository for SportRepository {
    type Draft = Sport;

    async fn create(conn: &mut PgConnection, draft: &Sport) -> Result<Sport> {
        let sport = sqlx::query_as::<_, Sport>("INSERT INTO sports (name) VALUES ($1) RETURNING name")
            .bind(&draft.name)
            .fetch_one(conn)
            .await?;

        Ok(sport)
    }
}

impl Keyed for SportRepository {
    type Key = String;
}

#[async_trait]
impl DeleteRepository for SportRepository {
    async fn delete(conn: &mut PgConnection, name: &String) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sports WHERE name = $1")
            .bind(name)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

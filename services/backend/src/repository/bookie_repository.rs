use async_trait::async_trait;
use sqlx::{types::Json, PgConnection};

use super::{CreateRepository, DeleteRepository, Keyed, ListRepository, UpdateRepository};
use crate::domain::{Bookie, BookieDraft, JsonMap, NoFilter};
use crate::errors::Result;

#[derive(sqlx::FromRow)]
struct BookieRow {
    name: String,
    description: String,
    preferences: Option<Json<JsonMap>>,
}

impl From<BookieRow> for Bookie {
    fn from(row: BookieRow) -> Self {
        Bookie {
            name: row.name,
            description: row.description,
            preferences: row.preferences.map(|p| p.0).unwrap_or_default(),
        }
    }
}

/// Bookies use their name as primary key, so an update may rename one.
pub struct BookieRepository;

#[async_trait]
impl ListRepository for BookieRepository {
    const RESOURCE: &'static str = "Bookie";

    type Record = Bookie;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<Bookie>> {
        let rows = sqlx::query_as::<_, BookieRow>(
            "SELECT name, description, preferences FROM bookies ORDER BY name ASC",
        )
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(Bookie::from).collect())
    }
}

#[async_trait]
impl CreateRepository for BookieRepository {
    type Draft = BookieDraft;

    async fn create(conn: &mut PgConnection, draft: &BookieDraft) -> Result<Bookie> {
        let row = sqlx::query_as::<_, BookieRow>(
            r#"
            INSERT INTO bookies (name, description, preferences)
            VALUES ($1, $2, $3)
            RETURNING name, description, preferences
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(Json(draft.preferences.clone().unwrap_or_default()))
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }
}

impl Keyed for BookieRepository {
    type Key = String;
}

#[async_trait]
impl UpdateRepository for BookieRepository {
    async fn update(
        conn: &mut PgConnection,
        name: &String,
        draft: &BookieDraft,
    ) -> Result<Option<Bookie>> {
        let row = sqlx::query_as::<_, BookieRow>(
            r#"
            UPDATE bookies
            SET name = $1, description = $2, preferences = $3
            WHERE name = $4
            RETURNING name, description, preferences
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(Json(draft.preferences.clone().unwrap_or_default()))
        .bind(name)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Bookie::from))
    }
}

#[async_trait]
impl DeleteRepository for BookieRepository {
    async fn delete(conn: &mut PgConnection, name: &String) -> Result<u64> {
        let result = sqlx::query("DELETE FROM bookies WHERE name = $1")
            .bind(name)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

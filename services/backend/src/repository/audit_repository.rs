use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use super::{parse_column, ListRepository};
use crate::domain::{AuditFilter, AuditLogEntry};
use crate::errors::{DecodeError, Result};

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    table_name: String,
    operation: String,
    username: String,
    changed_at: DateTime<Utc>,
    row_id: Option<i64>,
    old_data: Option<serde_json::Value>,
    new_data: Option<serde_json::Value>,
}

impl TryFrom<AuditRow> for AuditLogEntry {
    type Error = DecodeError;

    fn try_from(row: AuditRow) -> std::result::Result<Self, Self::Error> {
        Ok(AuditLogEntry {
            id: row.id,
            table_name: row.table_name,
            operation: parse_column("operation", &row.operation)?,
            username: row.username,
            changed_at: row.changed_at,
            row_id: row.row_id,
            old_data: row.old_data,
            new_data: row.new_data,
        })
    }
}

/// Read-only view of the trail the store's triggers write.
pub struct AuditRepository;

#[async_trait]
impl ListRepository for AuditRepository {
    const RESOURCE: &'static str = "Audit log entry";

    type Record = AuditLogEntry;
    type Filter = AuditFilter;

    async fn list(conn: &mut PgConnection, filter: &AuditFilter) -> Result<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT id, table_name, operation::text AS operation, username, changed_at,
                   row_id, old_data, new_data
            FROM audit_log
            WHERE ($1::text IS NULL OR table_name = $1)
            ORDER BY changed_at DESC
            "#,
        )
        .bind(filter.table())
        .fetch_all(conn)
        .await?;

        let entries = rows
            .into_iter()
            .map(AuditLogEntry::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

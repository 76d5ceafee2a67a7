use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use super::{money, parse_column, CreateRepository, ListRepository};
use crate::domain::{BalanceChange, BalanceChangeDraft, NoFilter};
use crate::errors::{DecodeError, Result};

macro_rules! balance_change_columns {
    () => {
        "id, customer_id, change_type::text AS change_type, \
         (delta).amount AS delta_amount, (delta).currency::text AS delta_currency, \
         reference_id, description, created_at"
    };
}

#[derive(sqlx::FromRow)]
struct BalanceChangeRow {
    id: i64,
    customer_id: i64,
    change_type: String,
    delta_amount: Option<Decimal>,
    delta_currency: Option<String>,
    reference_id: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BalanceChangeRow> for BalanceChange {
    type Error = DecodeError;

    fn try_from(row: BalanceChangeRow) -> std::result::Result<Self, Self::Error> {
        Ok(BalanceChange {
            id: row.id,
            customer_id: row.customer_id,
            change_type: parse_column("change_type", &row.change_type)?,
            delta: money::decode("delta", row.delta_amount, row.delta_currency)?,
            reference_id: row.reference_id,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

/// Append-only: no update or delete.
pub struct BalanceChangeRepository;

#[async_trait]
impl ListRepository for BalanceChangeRepository {
    const RESOURCE: &'static str = "Balance change";

    type Record = BalanceChange;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<BalanceChange>> {
        let rows = sqlx::query_as::<_, BalanceChangeRow>(concat!(
            "SELECT ",
            balance_change_columns!(),
            " FROM balance_changes ORDER BY created_at DESC"
        ))
        .fetch_all(conn)
        .await?;

        let changes = rows
            .into_iter()
            .map(BalanceChange::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(changes)
    }
}

#[async_trait]
impl CreateRepository for BalanceChangeRepository {
    type Draft = BalanceChangeDraft;

    async fn create(conn: &mut PgConnection, draft: &BalanceChangeDraft) -> Result<BalanceChange> {
        let (amount, currency) = money::encode(&draft.delta);
        let row = sqlx::query_as::<_, BalanceChangeRow>(concat!(
            "INSERT INTO balance_changes ",
            "(customer_id, change_type, delta, reference_id, description) ",
            "VALUES ($1, $2, ROW($3::numeric, $4::text)::money_amount, $5, $6) ",
            "RETURNING ",
            balance_change_columns!()
        ))
        .bind(draft.customer_id)
        .bind(draft.change_type.as_str())
        .bind(amount)
        .bind(currency)
        .bind(&draft.reference_id)
        .bind(&draft.description)
        .fetch_one(conn)
        .await?;

        Ok(BalanceChange::try_from(row)?)
    }
}

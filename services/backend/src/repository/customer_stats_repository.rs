use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgConnection;

use super::{parse_column, ListRepository};
use crate::domain::{CustomerStats, NoFilter};
use crate::errors::{DecodeError, Result};

#[derive(sqlx::FromRow)]
struct CustomerStatsRow {
    customer_id: i64,
    username: String,
    currency: String,
    total_bets: i64,
    won_bets: i64,
    lost_bets: i64,
    void_bets: i64,
    total_staked: Decimal,
    total_won: Decimal,
    net_profit: Decimal,
    current_balance: Decimal,
}

impl TryFrom<CustomerStatsRow> for CustomerStats {
    type Error = DecodeError;

    fn try_from(row: CustomerStatsRow) -> std::result::Result<Self, Self::Error> {
        Ok(CustomerStats {
            customer_id: row.customer_id,
            username: row.username,
            currency: parse_column("currency", &row.currency)?,
            total_bets: row.total_bets,
            won_bets: row.won_bets,
            lost_bets: row.lost_bets,
            void_bets: row.void_bets,
            total_staked: row.total_staked,
            total_won: row.total_won,
            net_profit: row.net_profit,
            current_balance: row.current_balance,
        })
    }
}

/// Aggregates are computed by the store; this only reads them.
pub struct CustomerStatsRepository;

#[async_trait]
impl ListRepository for CustomerStatsRepository {
    const RESOURCE: &'static str = "Customer stats";

    type Record = CustomerStats;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<CustomerStats>> {
        // Aggregate columns are cast so the view may use any integer/numeric width.
        let rows = sqlx::query_as::<_, CustomerStatsRow>(
            r#"
            SELECT customer_id::bigint AS customer_id, username, currency::text AS currency,
                   total_bets::bigint AS total_bets, won_bets::bigint AS won_bets,
                   lost_bets::bigint AS lost_bets, void_bets::bigint AS void_bets,
                   total_staked::numeric AS total_staked, total_won::numeric AS total_won,
                   net_profit::numeric AS net_profit, current_balance::numeric AS current_balance
            FROM customer_stats
            ORDER BY customer_id ASC
            "#,
        )
        .fetch_all(conn)
        .await?;

        let stats = rows
            .into_iter()
            .map(CustomerStats::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(stats)
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgConnection};

use super::{
    money, parse_column, CreateRepository, DeleteRepository, Keyed, ListRepository,
    UpdateRepository,
};
use crate::domain::{Bet, BetDraft, JsonMap, NoFilter};
use crate::errors::{DecodeError, Result};

macro_rules! bet_columns {
    () => {
        "id, bookie, customer_id, bookie_bet_id, bet_type, event_id, sport, \
         placement_status::text AS placement_status, outcome::text AS outcome, \
         (stake).amount AS stake_amount, (stake).currency::text AS stake_currency, \
         odds, placement_data, created_at, updated_at"
    };
}

#[derive(sqlx::FromRow)]
struct BetRow {
    id: i64,
    bookie: String,
    customer_id: i64,
    bookie_bet_id: String,
    bet_type: String,
    event_id: i64,
    sport: String,
    placement_status: String,
    outcome: Option<String>,
    stake_amount: Option<Decimal>,
    stake_currency: Option<String>,
    odds: Decimal,
    placement_data: Option<Json<JsonMap>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BetRow> for Bet {
    type Error = DecodeError;

    fn try_from(row: BetRow) -> std::result::Result<Self, Self::Error> {
        Ok(Bet {
            id: row.id,
            bookie: row.bookie,
            customer_id: row.customer_id,
            bookie_bet_id: row.bookie_bet_id,
            bet_type: row.bet_type,
            event_id: row.event_id,
            sport: row.sport,
            placement_status: parse_column("placement_status", &row.placement_status)?,
            outcome: row
                .outcome
                .as_deref()
                .map(|outcome| parse_column("outcome", outcome))
                .transpose()?,
            stake: money::decode("stake", row.stake_amount, row.stake_currency)?,
            odds: row.odds,
            placement_data: row.placement_data.map(|p| p.0).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct BetRepository;

#[async_trait]
impl ListRepository for BetRepository {
    const RESOURCE: &'static str = "Bet";

    type Record = Bet;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<Bet>> {
        let rows = sqlx::query_as::<_, BetRow>(concat!(
            "SELECT ",
            bet_columns!(),
            " FROM bets ORDER BY created_at DESC"
        ))
        .fetch_all(conn)
        .await?;

        let bets = rows
            .into_iter()
            .map(Bet::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(bets)
    }
}

#[async_trait]
impl CreateRepository for BetRepository {
    type Draft = BetDraft;

    async fn create(conn: &mut PgConnection, draft: &BetDraft) -> Result<Bet> {
        let (amount, currency) = money::encode(&draft.stake);
        let row = sqlx::query_as::<_, BetRow>(concat!(
            "INSERT INTO bets (",
            "bookie, customer_id, bookie_bet_id, bet_type, event_id, sport, ",
            "placement_status, outcome, stake, odds, placement_data",
            ") VALUES (",
            "$1, $2, $3, $4, $5, $6, $7, $8, ",
            "ROW($9::numeric, $10::text)::money_amount, $11, $12",
            ") RETURNING ",
            bet_columns!()
        ))
        .bind(&draft.bookie)
        .bind(draft.customer_id)
        .bind(&draft.bookie_bet_id)
        .bind(&draft.bet_type)
        .bind(draft.event_id)
        .bind(&draft.sport)
        .bind(draft.placement_status.as_str())
        .bind(draft.outcome.map(|o| o.as_str()))
        .bind(amount)
        .bind(currency)
        .bind(draft.odds)
        .bind(Json(&draft.placement_data))
        .fetch_one(conn)
        .await?;

        Ok(Bet::try_from(row)?)
    }
}

impl Keyed for BetRepository {
    type Key = i64;
}

#[async_trait]
impl UpdateRepository for BetRepository {
    async fn update(conn: &mut PgConnection, id: &i64, draft: &BetDraft) -> Result<Option<Bet>> {
        let (amount, currency) = money::encode(&draft.stake);
        let row = sqlx::query_as::<_, BetRow>(concat!(
            "UPDATE bets SET ",
            "bookie = $1, customer_id = $2, bookie_bet_id = $3, bet_type = $4, ",
            "event_id = $5, sport = $6, placement_status = $7, outcome = $8, ",
            "stake = ROW($9::numeric, $10::text)::money_amount, odds = $11, placement_data = $12 ",
            "WHERE id = $13 RETURNING ",
            bet_columns!()
        ))
        .bind(&draft.bookie)
        .bind(draft.customer_id)
        .bind(&draft.bookie_bet_id)
        .bind(&draft.bet_type)
        .bind(draft.event_id)
        .bind(&draft.sport)
        .bind(draft.placement_status.as_str())
        .bind(draft.outcome.map(|o| o.as_str()))
        .bind(amount)
        .bind(currency)
        .bind(draft.odds)
        .bind(Json(&draft.placement_data))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Bet::try_from).transpose()?)
    }
}

#[async_trait]
impl DeleteRepository for BetRepository {
    async fn delete(conn: &mut PgConnection, id: &i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM bets WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgConnection};

use super::{
    money, parse_column, CreateRepository, DeleteRepository, Keyed, ListRepository,
    UpdateRepository,
};
use crate::domain::{Customer, CustomerDraft, JsonMap, NoFilter};
use crate::errors::{DecodeError, Result};

// `password` is deliberately not projected.
macro_rules! customer_columns {
    () => {
        "id, username, real_name, currency::text AS currency, status::text AS status, \
         (balance).amount AS balance_amount, (balance).currency::text AS balance_currency, \
         preferences, created_at, updated_at"
    };
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    username: String,
    real_name: String,
    currency: String,
    status: String,
    balance_amount: Option<Decimal>,
    balance_currency: Option<String>,
    preferences: Option<Json<JsonMap>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = DecodeError;

    fn try_from(row: CustomerRow) -> std::result::Result<Self, Self::Error> {
        Ok(Customer {
            id: row.id,
            username: row.username,
            real_name: row.real_name,
            currency: parse_column("currency", &row.currency)?,
            status: parse_column("status", &row.status)?,
            balance: money::decode("balance", row.balance_amount, row.balance_currency)?,
            preferences: row.preferences.map(|p| p.0).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct CustomerRepository;

#[async_trait]
impl ListRepository for CustomerRepository {
    const RESOURCE: &'static str = "Customer";

    type Record = Customer;
    type Filter = NoFilter;

    async fn list(conn: &mut PgConnection, _filter: &NoFilter) -> Result<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(concat!(
            "SELECT ",
            customer_columns!(),
            " FROM customers ORDER BY id ASC"
        ))
        .fetch_all(conn)
        .await?;

        let customers = rows
            .into_iter()
            .map(Customer::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(customers)
    }
}

#[async_trait]
impl CreateRepository for CustomerRepository {
    type Draft = CustomerDraft;

    async fn create(conn: &mut PgConnection, draft: &CustomerDraft) -> Result<Customer> {
        let (amount, currency) = money::encode(&draft.balance);
        let row = sqlx::query_as::<_, CustomerRow>(concat!(
            "INSERT INTO customers ",
            "(username, password, real_name, currency, status, balance, preferences) ",
            "VALUES ($1, $2, $3, $4, $5, ROW($6::numeric, $7::text)::money_amount, $8) ",
            "RETURNING ",
            customer_columns!()
        ))
        .bind(&draft.username)
        .bind(&draft.password)
        .bind(&draft.real_name)
        .bind(draft.currency.as_str())
        .bind(draft.status.as_str())
        .bind(amount)
        .bind(currency)
        .bind(Json(draft.preferences.clone().unwrap_or_default()))
        .fetch_one(conn)
        .await?;

        Ok(Customer::try_from(row)?)
    }
}

impl Keyed for CustomerRepository {
    type Key = i64;
}

#[async_trait]
impl UpdateRepository for CustomerRepository {
    async fn update(
        conn: &mut PgConnection,
        id: &i64,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>> {
        let (amount, currency) = money::encode(&draft.balance);
        let row = sqlx::query_as::<_, CustomerRow>(concat!(
            "UPDATE customers SET ",
            "username = $1, password = $2, real_name = $3, currency = $4, status = $5, ",
            "balance = ROW($6::numeric, $7::text)::money_amount, preferences = $8 ",
            "WHERE id = $9 RETURNING ",
            customer_columns!()
        ))
        .bind(&draft.username)
        .bind(&draft.password)
        .bind(&draft.real_name)
        .bind(draft.currency.as_str())
        .bind(draft.status.as_str())
        .bind(amount)
        .bind(currency)
        .bind(Json(draft.preferences.clone().unwrap_or_default()))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Customer::try_from).transpose()?)
    }
}

#[async_trait]
impl DeleteRepository for CustomerRepository {
    async fn delete(conn: &mut PgConnection, id: &i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

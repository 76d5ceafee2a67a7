use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{AuditOperation, Currency};

/// Row written by the store's audit trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub table_name: String,
    pub operation: AuditOperation,
    pub username: String,
    pub changed_at: DateTime<Utc>,
    pub row_id: Option<i64>,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditFilter {
    /// Restrict to one table; empty means all tables
    pub table: Option<String>,
}

impl AuditFilter {
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref().filter(|t| !t.is_empty())
    }
}

/// Per-customer aggregate maintained by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerStats {
    pub customer_id: i64,
    pub username: String,
    pub currency: Currency,
    pub total_bets: i64,
    pub won_bets: i64,
    pub lost_bets: i64,
    pub void_bets: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_staked: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_won: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub net_profit: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub current_balance: Decimal,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{BalanceChangeType, Currency, CustomerStatus, Money};
use validator::Validate;

use super::JsonMap;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "balance_in_account_currency"))]
pub struct CustomerDraft {
    pub username: String,
    /// Stored as submitted; never echoed back in responses
    pub password: String,
    pub real_name: String,
    pub currency: Currency,
    pub status: CustomerStatus,
    #[validate]
    pub balance: Money,
    #[serde(default)]
    pub preferences: Option<JsonMap>,
}

fn balance_in_account_currency(draft: &CustomerDraft) -> Result<(), validator::ValidationError> {
    if draft.balance.currency != draft.currency {
        let mut error = validator::ValidationError::new("currency_mismatch");
        error.message = Some(
            format!(
                "balance currency {} does not match account currency {}",
                draft.balance.currency, draft.currency
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub username: String,
    pub real_name: String,
    pub currency: Currency,
    pub status: CustomerStatus,
    pub balance: Option<Money>,
    pub preferences: JsonMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bookies are keyed by name; there is no surrogate id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookieDraft {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub preferences: Option<JsonMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookie {
    pub name: String,
    pub description: String,
    pub preferences: JsonMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BalanceChangeDraft {
    pub customer_id: i64,
    pub change_type: BalanceChangeType,
    #[validate]
    pub delta: Money,
    pub reference_id: Option<String>,
    pub description: Option<String>,
}

/// Append-only ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceChange {
    pub id: i64,
    pub customer_id: i64,
    pub change_type: BalanceChangeType,
    pub delta: Option<Money>,
    pub reference_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

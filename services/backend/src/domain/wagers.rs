use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{BetOutcome, Money, PlacementStatus};
use validator::Validate;

use super::JsonMap;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BetDraft {
    /// Name of the bookie the bet was routed to
    pub bookie: String,
    pub customer_id: i64,
    pub bookie_bet_id: String,
    pub bet_type: String,
    pub event_id: i64,
    pub sport: String,
    #[serde(default)]
    pub placement_status: PlacementStatus,
    #[serde(default)]
    pub outcome: Option<BetOutcome>,
    #[validate]
    pub stake: Money,
    #[validate(custom = "shared::validate_odds")]
    pub odds: Decimal,
    pub placement_data: JsonMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: i64,
    pub bookie: String,
    pub customer_id: i64,
    pub bookie_bet_id: String,
    pub bet_type: String,
    pub event_id: i64,
    pub sport: String,
    pub placement_status: PlacementStatus,
    pub outcome: Option<BetOutcome>,
    pub stake: Option<Money>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub odds: Decimal,
    pub placement_data: JsonMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn body(odds: serde_json::Value) -> serde_json::Value {
        json!({
            "bookie": "acme",
            "customer_id": 1,
            "bookie_bet_id": "A-1",
            "bet_type": "single",
            "event_id": 7,
            "sport": "football",
            "stake": {"amount": 25.5, "currency": "EUR"},
            "odds": odds,
            "placement_data": {"market": "1x2"}
        })
    }

    #[test]
    fn test_defaults_for_placement_and_outcome() {
        let draft: BetDraft = serde_json::from_value(body(json!(2.5))).unwrap();
        assert_eq!(draft.placement_status, PlacementStatus::Pending);
        assert_eq!(draft.outcome, None);
        assert_eq!(draft.odds, dec!(2.5));
    }

    #[test]
    fn test_odds_range_is_inclusive() {
        for odds in [json!(1.01), json!(999.0), json!("999")] {
            let draft: BetDraft = serde_json::from_value(body(odds.clone())).unwrap();
            assert!(draft.validate().is_ok(), "odds {odds} should be accepted");
        }
        for odds in [json!(1.0), json!(999.01), json!(1000)] {
            let draft: BetDraft = serde_json::from_value(body(odds.clone())).unwrap();
            let errors = draft.validate().unwrap_err();
            assert!(
                errors.field_errors().contains_key("odds"),
                "odds {odds} should be rejected"
            );
        }
    }

    #[test]
    fn test_placement_data_is_required() {
        let mut value = body(json!(2.0));
        value.as_object_mut().unwrap().remove("placement_data");
        assert!(serde_json::from_value::<BetDraft>(value).is_err());
    }
}

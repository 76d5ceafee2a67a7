/// Type-safe wrappers for ledger primitives
///
/// Every enum-like string the store accepts is a closed set of variants here,
/// so an unknown value is rejected while the request body is parsed instead of
/// surfacing later as a constraint violation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::constants::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown {kind} value: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Declares a string-backed enum together with its wire/store spelling.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// ISO currency codes the ledger books in
    Currency("currency") {
        Usd => "USD",
        Gbp => "GBP",
        Eur => "EUR",
    }
}

closed_enum! {
    EventStatus("event status") {
        Prematch => "prematch",
        Live => "live",
        Finished => "finished",
    }
}

closed_enum! {
    CustomerStatus("customer status") {
        Active => "active",
        Disabled => "disabled",
    }
}

closed_enum! {
    /// Whether the bookie accepted the bet
    PlacementStatus("placement status") {
        Pending => "pending",
        Placed => "placed",
        Failed => "failed",
    }
}

impl Default for PlacementStatus {
    fn default() -> Self {
        PlacementStatus::Pending
    }
}

closed_enum! {
    BetOutcome("bet outcome") {
        Win => "win",
        Lose => "lose",
        Void => "void",
    }
}

closed_enum! {
    BalanceChangeType("balance change type") {
        TopUp => "top_up",
        BetPlaced => "bet_placed",
        BetSettled => "bet_settled",
        Withdrawal => "withdrawal",
        Adjustment => "adjustment",
    }
}

closed_enum! {
    /// Row operation recorded by the store's audit trigger
    AuditOperation("audit operation") {
        Insert => "INSERT",
        Update => "UPDATE",
        Delete => "DELETE",
    }
}

/// Amount paired with its currency, persisted as one `money_amount` composite
///
/// On the wire the amount is a JSON number (strings are accepted on input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Money {
    #[validate(custom = "validate_money_amount")]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

fn range_error(code: &'static str, message: String) -> validator::ValidationError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Money amounts must fit `NUMERIC(20, 4)` and lie strictly within ±10 billion.
pub fn validate_money_amount(amount: &Decimal) -> Result<(), validator::ValidationError> {
    if amount.abs() >= MONEY_AMOUNT_BOUND {
        return Err(range_error(
            "range",
            format!(
                "amount must be greater than -{} and less than {}",
                MONEY_AMOUNT_BOUND, MONEY_AMOUNT_BOUND
            ),
        ));
    }
    let normalized = amount.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(range_error(
            "precision",
            format!("amount must have at most {} decimal places", MONEY_SCALE),
        ));
    }
    if digit_count(&normalized) > MONEY_MAX_DIGITS {
        return Err(range_error(
            "precision",
            format!("amount must have at most {} digits in total", MONEY_MAX_DIGITS),
        ));
    }
    Ok(())
}

/// Decimal odds must lie in `[1.01, 999.0]` with at most 10 decimal places.
pub fn validate_odds(odds: &Decimal) -> Result<(), validator::ValidationError> {
    if *odds < MIN_ODDS || *odds > MAX_ODDS {
        return Err(range_error(
            "range",
            format!("odds must be between {} and {} inclusive", MIN_ODDS, MAX_ODDS),
        ));
    }
    if odds.normalize().scale() > ODDS_SCALE {
        return Err(range_error(
            "precision",
            format!("odds must have at most {} decimal places", ODDS_SCALE),
        ));
    }
    Ok(())
}

fn digit_count(value: &Decimal) -> u32 {
    let mantissa = value.mantissa().unsigned_abs();
    if mantissa == 0 {
        1
    } else {
        mantissa.ilog10() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_currency_parsing() {
        assert_eq!(Currency::from_str("GBP").unwrap(), Currency::Gbp);
        assert!(matches!(
            Currency::from_str("usd"),
            Err(ValidationError::UnknownVariant { kind: "currency", .. })
        ));
        assert!(Currency::from_str("JPY").is_err());
    }

    #[test]
    fn test_enum_spelling_matches_store() {
        assert_eq!(BalanceChangeType::TopUp.as_str(), "top_up");
        assert_eq!(AuditOperation::Delete.to_string(), "DELETE");
        assert_eq!(
            serde_json::to_string(&BalanceChangeType::BetSettled).unwrap(),
            "\"bet_settled\""
        );
        for status in EventStatus::ALL {
            assert_eq!(EventStatus::from_str(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn test_unknown_variant_rejected_by_serde() {
        let parsed: Result<EventStatus, _> = serde_json::from_str("\"postponed\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_money_amount_bounds() {
        assert!(validate_money_amount(&dec!(9_999_999_999.9999)).is_ok());
        assert!(validate_money_amount(&dec!(-9_999_999_999.9999)).is_ok());
        assert!(validate_money_amount(&dec!(10_000_000_000)).is_err());
        assert!(validate_money_amount(&dec!(-10_000_000_000)).is_err());
    }

    #[test]
    fn test_money_amount_precision() {
        assert!(validate_money_amount(&dec!(123.4500)).is_ok());
        assert!(validate_money_amount(&dec!(1.234500000)).is_ok());
        let err = validate_money_amount(&dec!(0.00001)).unwrap_err();
        assert_eq!(err.code, "precision");
    }

    #[test]
    fn test_odds_boundaries() {
        assert!(validate_odds(&dec!(1.01)).is_ok());
        assert!(validate_odds(&dec!(999.0)).is_ok());
        assert!(validate_odds(&dec!(1.00)).is_err());
        assert!(validate_odds(&dec!(999.01)).is_err());
        assert!(validate_odds(&dec!(1000)).is_err());
        assert!(validate_odds(&dec!(2.12345678901)).is_err());
    }

    #[test]
    fn test_money_wire_shape() {
        let money: Money =
            serde_json::from_str(r#"{"amount": 123.45, "currency": "USD"}"#).unwrap();
        assert_eq!(money, Money::new(dec!(123.45), Currency::Usd));
        assert!(money.validate().is_ok());

        let json = serde_json::to_value(Money::new(dec!(123.4500), Currency::Eur)).unwrap();
        assert_eq!(json, serde_json::json!({"amount": 123.45, "currency": "EUR"}));
    }

    #[test]
    fn test_money_validation_reports_amount_field() {
        let money = Money::new(dec!(12_000_000_000), Currency::Gbp);
        let errors = money.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }
}

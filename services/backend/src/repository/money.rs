//! Conversion between `Money` and the store's `money_amount` composite.
//!
//! Reads project the composite into two plain columns,
//! `(col).amount AS col_amount, (col).currency::text AS col_currency`, which
//! row structs pick up as `Option`s and hand to [`decode`]. Writes bind the
//! two halves separately and rebuild the composite in SQL with
//! `ROW($n::numeric, $m::text)::money_amount`.

use rust_decimal::Decimal;
use shared::Money;

use crate::errors::DecodeError;

/// Rebuild a `Money` from its projected columns.
///
/// A null composite stays `None`; a composite with only one half present is
/// a corrupt row.
pub fn decode(
    column: &'static str,
    amount: Option<Decimal>,
    currency: Option<String>,
) -> Result<Option<Money>, DecodeError> {
    match (amount, currency) {
        (None, None) => Ok(None),
        (Some(amount), Some(currency)) => {
            let currency = currency
                .trim()
                .parse()
                .map_err(|source| DecodeError::Variant { column, source })?;
            Ok(Some(Money::new(amount, currency)))
        }
        _ => Err(DecodeError::PartialMoney { column }),
    }
}

/// The two bind parameters for a composite write.
pub fn encode(money: &Money) -> (Decimal, &'static str) {
    (money.amount, money.currency.as_str())
}

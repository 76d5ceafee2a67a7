/// Shared constants for the betting ledger
///
/// This module centralizes the numeric limits that the store's column types
/// impose, so request validation rejects what the database would reject.

use rust_decimal::Decimal;

/// Maximum fractional digits of a money amount (`NUMERIC(20, 4)`)
pub const MONEY_SCALE: u32 = 4;

/// Maximum total digits of a money amount (`NUMERIC(20, 4)`)
pub const MONEY_MAX_DIGITS: u32 = 20;

/// Exclusive bound on the absolute value of a money amount (10 billion)
///
/// Amounts must lie strictly inside `(-MONEY_AMOUNT_BOUND, MONEY_AMOUNT_BOUND)`.
pub const MONEY_AMOUNT_BOUND: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Maximum fractional digits of decimal odds (`NUMERIC(20, 10)`)
pub const ODDS_SCALE: u32 = 10;

/// Lowest accepted decimal odds, inclusive (1.01)
pub const MIN_ODDS: Decimal = Decimal::from_parts(101, 0, 0, false, 2);

/// Highest accepted decimal odds, inclusive (999.0)
pub const MAX_ODDS: Decimal = Decimal::from_parts(999, 0, 0, false, 0);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_limits_match_their_literals() {
        assert_eq!(MONEY_AMOUNT_BOUND, dec!(10_000_000_000));
        assert_eq!(MIN_ODDS, dec!(1.01));
        assert_eq!(MAX_ODDS, dec!(999));
    }
}

//! Monetary rounding and input bounds.
//!
//! Engines keep full precision internally and round once, when a figure is
//! written into a result record.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Number of decimal places money is reported with.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Largest monetary amount accepted as input: 10^15.
///
/// Every sum and rate product the engines form from bounded inputs stays
/// far inside `Decimal`'s 96-bit range.
pub const MAX_MONETARY_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Rejects an input amount outside `0..=MAX_MONETARY_AMOUNT`.
pub(crate) fn check_amount(field: &str, amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(EngineError::validation(field, "must not be negative"));
    }
    if amount > MAX_MONETARY_AMOUNT {
        return Err(EngineError::validation(
            field,
            format!("out of range, must not exceed {}", MAX_MONETARY_AMOUNT),
        ));
    }
    Ok(())
}

/// Rounds an amount to cents, half away from zero.
///
/// For the non-negative amounts the engines report this is round-half-up.
///
/// # Examples
///
/// ```
/// use levy_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round_money(Decimal::from_str("2.344").unwrap()), Decimal::from_str("2.34").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

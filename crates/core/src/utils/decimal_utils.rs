use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Error, Result, ValidationError};

/// Rejects zero and negative amounts.
pub fn ensure_positive_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::NonPositiveAmount));
    }
    Ok(amount)
}

/// `part / whole * 100`, rounded half away from zero to two places.
///
/// Returns zero when `whole` is not positive so a zero budget never produces
/// a division error.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match part.checked_div(whole) {
        Some(ratio) => (ratio * Decimal::ONE_HUNDRED).round_dp_with_strategy(
            DISPLAY_DECIMAL_PRECISION,
            RoundingStrategy::MidpointAwayFromZero,
        ),
        None => Decimal::ZERO,
    }
}

//! Monetary amounts.
//!
//! All money in the engine is a [`Decimal`] so that band and tier arithmetic
//! stays exact until the final rounding step.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// A monetary amount in the jurisdiction's currency.
pub type Money = Decimal;

/// Decimal places accepted on a monetary input.
const INPUT_DECIMAL_PLACES: u32 = 2;

/// Largest accepted monetary input, in whole currency units (10^15).
///
/// Keeps every sum the engine forms far inside `Decimal`'s range.
pub const MAX_MONEY_INPUT: i64 = 1_000_000_000_000_000;

/// Rejects a negative amount for the named input field.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::ensure_non_negative;
/// use rust_decimal::Decimal;
///
/// assert!(ensure_non_negative("gross_pay", Decimal::ZERO).is_ok());
/// assert!(ensure_non_negative("gross_pay", Decimal::NEGATIVE_ONE).is_err());
/// ```
pub fn ensure_non_negative(field: &str, amount: Money) -> EngineResult<Money> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: format!("must not be negative (got {})", amount),
        });
    }
    Ok(amount)
}

/// Validates a caller-supplied amount and returns it at exactly two
/// decimal places.
///
/// Sub-cent precision is rejected rather than rounded, so every figure in a
/// result is either the caller's own amount or a rounded calculator output.
///
/// # Errors
///
/// Returns `InvalidInput` if the amount is negative, has more than two
/// significant decimal places, or exceeds [`MAX_MONEY_INPUT`].
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::ensure_money_input;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let gross = ensure_money_input("gross_pay", Decimal::from(30000)).unwrap();
/// assert_eq!(gross.to_string(), "30000.00");
/// assert!(ensure_money_input("gross_pay", Decimal::from_str("0.005").unwrap()).is_err());
/// ```
pub fn ensure_money_input(field: &str, amount: Money) -> EngineResult<Money> {
    let amount = ensure_non_negative(field, amount)?;

    if amount > Decimal::from(MAX_MONEY_INPUT) {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: format!("must not exceed {} (got {})", MAX_MONEY_INPUT, amount),
        });
    }
    if amount.normalize().scale() > INPUT_DECIMAL_PLACES {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: format!(
                "must have at most {} decimal places (got {})",
                INPUT_DECIMAL_PLACES, amount
            ),
        });
    }

    let mut amount = if amount.is_zero() { Decimal::ZERO } else { amount.normalize() };
    amount.rescale(INPUT_DECIMAL_PLACES);
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_positive_amount_passes_through() {
        assert_eq!(ensure_non_negative("gross_pay", dec("30000.00")).unwrap(), dec("30000.00"));
    }

    #[test]
    fn test_negative_zero_is_accepted() {
        assert!(ensure_non_negative("gross_pay", dec("-0.00")).is_ok());
    }

    #[test]
    fn test_negative_cent_is_rejected_with_field_name() {
        match ensure_non_negative("other_deductions", dec("-0.01")) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "other_deductions");
                assert!(message.contains("-0.01"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_money_input_is_padded_to_two_places() {
        assert_eq!(ensure_money_input("gross_pay", dec("30000")).unwrap().to_string(), "30000.00");
        assert_eq!(ensure_money_input("gross_pay", dec("2500.5")).unwrap().to_string(), "2500.50");
        assert_eq!(ensure_money_input("gross_pay", dec("0.010")).unwrap().to_string(), "0.01");
        assert_eq!(ensure_money_input("gross_pay", dec("-0")).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_sub_cent_money_input_is_rejected() {
        match ensure_money_input("other_deductions", dec("0.005")) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "other_deductions");
                assert!(message.contains("at most 2 decimal places"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_money_input_above_maximum_is_rejected() {
        assert!(ensure_money_input("gross_pay", Decimal::from(MAX_MONEY_INPUT)).is_ok());
        assert!(matches!(
            ensure_money_input("gross_pay", Decimal::from(MAX_MONEY_INPUT) + dec("0.01")),
            Err(EngineError::InvalidInput { .. })
        ));
        assert!(matches!(
            ensure_money_input("gross_pay", Decimal::MAX),
            Err(EngineError::InvalidInput { .. })
        ));
    }
}

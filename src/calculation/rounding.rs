//! Rounding policy for monetary outputs.
//!
//! Intermediate amounts are kept at full decimal precision; only the final
//! figure of each calculator is rounded, and always through [`round_money`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places in every monetary output.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to two decimal places using half-up rounding.
///
/// The result always carries exactly two decimal places, so `900` comes back
/// as `900.00`.
///
/// A value exactly halfway between two cents rounds away from zero, which
/// for the non-negative amounts the engine produces means upwards. Banker's
/// rounding is not used.
///
/// # Examples
///
/// ```
/// use payroll_tax_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// assert_eq!(round_money(dec("0.005")), dec("0.01"));
/// assert_eq!(round_money(dec("420.045")), dec("420.05"));
/// assert_eq!(round_money(dec("2083.2549")), dec("2083.25"));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(
        MONEY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}

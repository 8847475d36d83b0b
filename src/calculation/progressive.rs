//! Progressive income tax calculation.
//!
//! This module implements a generic marginal-band income tax with a flat
//! personal relief credit. Each slice of income is taxed at the rate of the
//! band it falls in; the relief is then subtracted and the result floored at
//! zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Money, ensure_non_negative};

use super::rounding::round_money;

/// A marginal tax band.
///
/// Income in `[lower_bound, upper_bound)` is taxed at `rate`. An
/// `upper_bound` of `None` makes the band unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    /// Lower bound of the band (inclusive).
    pub lower_bound: Money,
    /// Upper bound of the band (exclusive), or `None` for the top band.
    #[serde(default)]
    pub upper_bound: Option<Money>,
    /// Marginal rate as a fraction (0.25 for 25%).
    pub rate: Decimal,
}

impl TaxBand {
    /// Returns the width of the band, or `None` if it is unbounded.
    pub fn width(&self) -> Option<Money> {
        self.upper_bound.map(|upper| upper - self.lower_bound)
    }
}

/// A validated, ordered table of tax bands plus a personal relief credit.
///
/// The bands partition `[0, ∞)`: the first band starts at zero, each band
/// starts where the previous one ends, and only the last band is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveTaxTable {
    bands: Vec<TaxBand>,
    personal_relief: Money,
    reference: String,
}

impl ProgressiveTaxTable {
    /// Builds a table, checking the band invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvariantViolation` if the bands are empty, do not start
    /// at zero, leave a gap or overlap, are not ascending, have a rate
    /// outside `[0, 1]`, or if the final band is bounded. A negative personal
    /// relief is also rejected.
    pub fn new(
        bands: Vec<TaxBand>,
        personal_relief: Money,
        reference: impl Into<String>,
    ) -> EngineResult<Self> {
        const TABLE: &str = "tax band";

        let first = bands
            .first()
            .ok_or_else(|| EngineError::invariant(TABLE, "at least one band is required"))?;
        if !first.lower_bound.is_zero() {
            return Err(EngineError::invariant(
                TABLE,
                format!("first band must start at 0 (starts at {})", first.lower_bound),
            ));
        }

        let last_index = bands.len() - 1;
        for (i, band) in bands.iter().enumerate() {
            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(EngineError::invariant(
                    TABLE,
                    format!("band {} has rate {} outside [0, 1]", i + 1, band.rate),
                ));
            }

            match band.upper_bound {
                Some(upper) if upper <= band.lower_bound => {
                    return Err(EngineError::invariant(
                        TABLE,
                        format!(
                            "band {} upper bound {} is not above its lower bound {}",
                            i + 1,
                            upper,
                            band.lower_bound
                        ),
                    ));
                }
                Some(_) if i == last_index => {
                    return Err(EngineError::invariant(
                        TABLE,
                        "the final band must be unbounded",
                    ));
                }
                None if i != last_index => {
                    return Err(EngineError::invariant(
                        TABLE,
                        format!("only the final band may be unbounded (band {} is)", i + 1),
                    ));
                }
                _ => {}
            }

            if let Some(next) = bands.get(i + 1) {
                if band.upper_bound != Some(next.lower_bound) {
                    return Err(EngineError::invariant(
                        TABLE,
                        format!(
                            "band {} starts at {} but band {} ends at {:?}",
                            i + 2,
                            next.lower_bound,
                            i + 1,
                            band.upper_bound
                        ),
                    ));
                }
            }
        }

        if personal_relief < Decimal::ZERO {
            return Err(EngineError::invariant(
                TABLE,
                format!("personal relief {} is negative", personal_relief),
            ));
        }

        Ok(Self {
            bands,
            personal_relief,
            reference: reference.into(),
        })
    }

    /// Returns the bands in ascending order.
    pub fn bands(&self) -> &[TaxBand] {
        &self.bands
    }

    /// Returns the personal relief credit.
    pub fn personal_relief(&self) -> Money {
        self.personal_relief
    }

    /// Returns the statutory reference for this table.
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// The slice of income that fell into one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandPortion {
    /// Lower bound of the band.
    pub lower_bound: Money,
    /// Upper bound of the band, `None` for the top band.
    pub upper_bound: Option<Money>,
    /// The band's marginal rate.
    pub rate: Decimal,
    /// Income taxed in this band.
    pub taxable_amount: Money,
    /// Unrounded tax on `taxable_amount`.
    pub tax: Money,
}

/// The result of an income tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Income tax after relief, rounded to two decimal places.
    pub amount: Money,
    /// Tax before relief, unrounded.
    pub tax_before_relief: Money,
    /// Relief actually used (never more than `tax_before_relief`).
    pub relief_applied: Money,
    /// Per-band breakdown, for bands that received income.
    pub portions: Vec<BandPortion>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates income tax on `taxable_income` under the given band table.
///
/// Income exactly at a band's upper bound is taxed entirely within that band;
/// the next band only receives income strictly above the boundary.
///
/// # Errors
///
/// Returns `InvalidInput` if `taxable_income` is negative.
///
/// # Examples
///
/// ```
/// use payroll_tax_engine::calculation::calculate_income_tax;
/// use payroll_tax_engine::config::kenya_2024;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let schedule = kenya_2024().unwrap();
/// let result = calculate_income_tax(Decimal::from(30000), schedule.income_tax(), 1).unwrap();
/// assert_eq!(result.amount, Decimal::from_str("1500.00").unwrap());
/// ```
pub fn calculate_income_tax(
    taxable_income: Money,
    table: &ProgressiveTaxTable,
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    let taxable_income = ensure_non_negative("taxable_income", taxable_income)?;

    let mut remaining = taxable_income;
    let mut tax_before_relief = Decimal::ZERO;
    let mut portions = Vec::new();

    for band in table.bands() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let in_band = match band.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        let tax = in_band * band.rate;

        tax_before_relief += tax;
        remaining -= in_band;
        portions.push(BandPortion {
            lower_bound: band.lower_bound,
            upper_bound: band.upper_bound,
            rate: band.rate,
            taxable_amount: in_band,
            tax,
        });
    }

    let relief_applied = table.personal_relief().min(tax_before_relief);
    let amount = round_money(tax_before_relief - relief_applied);

    let band_lines: Vec<String> = portions
        .iter()
        .map(|p| {
            format!(
                "${} x {}% = ${}",
                p.taxable_amount.normalize(),
                (p.rate * Decimal::ONE_HUNDRED).normalize(),
                p.tax.normalize()
            )
        })
        .collect();

    let reasoning = if portions.is_empty() {
        "No taxable income - income tax is $0".to_string()
    } else {
        format!(
            "{}; tax before relief ${} - relief ${} = ${}",
            band_lines.join(" + "),
            tax_before_relief.normalize(),
            relief_applied.normalize(),
            amount
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Progressive Income Tax".to_string(),
        statutory_ref: table.reference().to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "personal_relief": table.personal_relief().normalize().to_string()
        }),
        output: serde_json::json!({
            "bands": portions
                .iter()
                .map(|p| serde_json::json!({
                    "lower_bound": p.lower_bound.normalize().to_string(),
                    "upper_bound": p.upper_bound.map(|u| u.normalize().to_string()),
                    "rate": p.rate.normalize().to_string(),
                    "taxable_amount": p.taxable_amount.normalize().to_string(),
                    "tax": p.tax.normalize().to_string()
                }))
                .collect::<Vec<_>>(),
            "tax_before_relief": tax_before_relief.normalize().to_string(),
            "relief_applied": relief_applied.normalize().to_string(),
            "income_tax": amount.to_string()
        }),
        reasoning,
    };

    Ok(IncomeTaxResult {
        amount,
        tax_before_relief,
        relief_applied,
        portions,
        audit_step,
    })
}

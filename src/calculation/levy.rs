//! Tiered flat-amount levy calculation.
//!
//! A statutory health levy is not a percentage of pay: gross pay is looked up
//! in a table of income tiers and the tier's flat amount is charged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Money, ensure_non_negative};

use super::rounding::round_money;

/// One row of a levy table.
///
/// Both bounds are inclusive. An `upper_bound` of `None` makes this the
/// catch-all top tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyTier {
    /// Lowest gross pay in this tier (inclusive).
    pub lower_bound: Money,
    /// Highest gross pay in this tier (inclusive), or `None` for no limit.
    #[serde(default)]
    pub upper_bound: Option<Money>,
    /// The flat amount charged for this tier.
    pub amount: Money,
}

impl LevyTier {
    fn covers(&self, gross_pay: Money) -> bool {
        self.upper_bound.is_none_or(|upper| gross_pay <= upper)
    }
}

/// A validated, ascending levy table.
///
/// Published tables use whole currency units (`6000-7999`, `8000-11999`),
/// so consecutive tiers must satisfy
/// `previous.upper < next.lower <= previous.upper + 1`. Gross pay in the
/// sub-unit gap between two tiers belongs to the higher tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevyTable {
    tiers: Vec<LevyTier>,
    reference: String,
}

impl LevyTable {
    /// Builds a table, checking the tier invariants.
    ///
    /// The final tier may be bounded; gross pay beyond it is charged the
    /// final tier's amount.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvariantViolation` if the table is empty, does not
    /// start at zero, has a tier whose upper bound is below its lower bound,
    /// leaves a gap wider than one currency unit, overlaps, has an unbounded
    /// tier before the last one, or carries a negative amount.
    pub fn new(tiers: Vec<LevyTier>, reference: impl Into<String>) -> EngineResult<Self> {
        const TABLE: &str = "levy tier";

        let first = tiers
            .first()
            .ok_or_else(|| EngineError::invariant(TABLE, "at least one tier is required"))?;
        if !first.lower_bound.is_zero() {
            return Err(EngineError::invariant(
                TABLE,
                format!("first tier must start at 0 (starts at {})", first.lower_bound),
            ));
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.amount < Decimal::ZERO {
                return Err(EngineError::invariant(
                    TABLE,
                    format!("tier {} has negative amount {}", i + 1, tier.amount),
                ));
            }
            if let Some(upper) = tier.upper_bound {
                if upper < tier.lower_bound {
                    return Err(EngineError::invariant(
                        TABLE,
                        format!(
                            "tier {} upper bound {} is below its lower bound {}",
                            i + 1,
                            upper,
                            tier.lower_bound
                        ),
                    ));
                }
            }

            let Some(next) = tiers.get(i + 1) else {
                continue;
            };
            let Some(upper) = tier.upper_bound else {
                return Err(EngineError::invariant(
                    TABLE,
                    format!("only the final tier may be unbounded (tier {} is)", i + 1),
                ));
            };
            if next.lower_bound <= upper {
                return Err(EngineError::invariant(
                    TABLE,
                    format!(
                        "tier {} starts at {} which overlaps tier {} ending at {}",
                        i + 2,
                        next.lower_bound,
                        i + 1,
                        upper
                    ),
                ));
            }
            if next.lower_bound > upper + Decimal::ONE {
                return Err(EngineError::invariant(
                    TABLE,
                    format!(
                        "gap between tier {} ending at {} and tier {} starting at {}",
                        i + 1,
                        upper,
                        i + 2,
                        next.lower_bound
                    ),
                ));
            }
        }

        Ok(Self {
            tiers,
            reference: reference.into(),
        })
    }

    /// Returns the tiers in ascending order.
    pub fn tiers(&self) -> &[LevyTier] {
        &self.tiers
    }

    /// Returns the statutory reference for this table.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the amount charged above every bounded tier.
    pub fn maximum_amount(&self) -> Money {
        self.tiers
            .last()
            .map(|tier| tier.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

/// The result of a levy lookup, including the audit step.
#[derive(Debug, Clone)]
pub struct HealthLevyResult {
    /// The flat levy amount.
    pub amount: Money,
    /// The tier that matched, `None` when gross pay exceeded a bounded final tier.
    pub matched_tier: Option<LevyTier>,
    /// True when gross pay was above every tier and the final amount was used.
    pub fallback_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Looks up the flat levy for `gross_pay`.
///
/// The first tier (in ascending order) whose upper bound is at or above
/// `gross_pay` is charged. If `gross_pay` is above every tier, the final
/// tier's amount is charged and the result is flagged as a fallback.
///
/// # Errors
///
/// Returns `InvalidInput` if `gross_pay` is negative.
///
/// # Examples
///
/// ```
/// use payroll_tax_engine::calculation::calculate_health_levy;
/// use payroll_tax_engine::config::kenya_2024;
/// use rust_decimal::Decimal;
///
/// let schedule = kenya_2024().unwrap();
/// let result = calculate_health_levy(Decimal::from(30000), schedule.health_levy(), 2).unwrap();
/// assert_eq!(result.amount, Decimal::from(900));
/// ```
pub fn calculate_health_levy(
    gross_pay: Money,
    table: &LevyTable,
    step_number: u32,
) -> EngineResult<HealthLevyResult> {
    let gross_pay = ensure_non_negative("gross_pay", gross_pay)?;

    let matched_tier = table.tiers().iter().find(|tier| tier.covers(gross_pay)).cloned();
    let fallback_applied = matched_tier.is_none();

    let amount = round_money(match &matched_tier {
        Some(tier) => tier.amount,
        None => {
            warn!(
                gross_pay = %gross_pay,
                amount = %table.maximum_amount(),
                "Gross pay exceeds every levy tier, charging the final tier amount"
            );
            table.maximum_amount()
        }
    });

    let tier_description = match &matched_tier {
        Some(LevyTier {
            lower_bound,
            upper_bound: Some(upper),
            ..
        }) => format!("{}-{}", lower_bound.normalize(), upper.normalize()),
        Some(LevyTier { lower_bound, .. }) => format!("{} and above", lower_bound.normalize()),
        None => "above the final tier".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "health_levy".to_string(),
        rule_name: "Health Levy".to_string(),
        statutory_ref: table.reference().to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.normalize().to_string()
        }),
        output: serde_json::json!({
            "tier": tier_description,
            "amount": amount.normalize().to_string(),
            "fallback_applied": fallback_applied
        }),
        reasoning: format!(
            "Gross pay ${} falls in tier {} - flat levy ${}",
            gross_pay.normalize(),
            tier_description,
            amount.normalize()
        ),
    };

    Ok(HealthLevyResult {
        amount,
        matched_tier,
        fallback_applied,
        audit_step,
    })
}

//! Two-tier pension contribution calculation.
//!
//! Pensionable earnings are split into a lower tier (up to the tier I limit)
//! and an upper tier (from the tier I limit up to the tier II limit). Both
//! tiers contribute at the same rate; earnings above the tier II limit are
//! not pensionable, which caps the contribution.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Money, ensure_non_negative};

use super::rounding::round_money;

/// Validated two-tier pension parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PensionTiers {
    tier1_limit: Money,
    tier2_limit: Money,
    rate: Decimal,
    reference: String,
}

impl PensionTiers {
    /// Builds the tier parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvariantViolation` unless
    /// `0 <= tier1_limit < tier2_limit` and `0 <= rate <= 1`.
    pub fn new(
        tier1_limit: Money,
        tier2_limit: Money,
        rate: Decimal,
        reference: impl Into<String>,
    ) -> EngineResult<Self> {
        const TABLE: &str = "pension tier";

        if tier1_limit < Decimal::ZERO {
            return Err(EngineError::invariant(
                TABLE,
                format!("tier I limit {} is negative", tier1_limit),
            ));
        }
        if tier2_limit <= tier1_limit {
            return Err(EngineError::invariant(
                TABLE,
                format!(
                    "tier II limit {} must be above tier I limit {}",
                    tier2_limit, tier1_limit
                ),
            ));
        }
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(EngineError::invariant(
                TABLE,
                format!("rate {} outside [0, 1]", rate),
            ));
        }

        Ok(Self {
            tier1_limit,
            tier2_limit,
            rate,
            reference: reference.into(),
        })
    }

    /// Returns the upper limit of tier I earnings.
    pub fn tier1_limit(&self) -> Money {
        self.tier1_limit
    }

    /// Returns the upper limit of tier II earnings.
    pub fn tier2_limit(&self) -> Money {
        self.tier2_limit
    }

    /// Returns the contribution rate shared by both tiers.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns the statutory reference for these tiers.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the largest possible contribution, reached at the tier II limit.
    pub fn maximum_contribution(&self) -> Money {
        round_money(self.tier2_limit * self.rate)
    }
}

/// The result of a pension contribution calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct PensionContributionResult {
    /// Total contribution, rounded to two decimal places.
    pub amount: Money,
    /// Unrounded tier I contribution.
    pub tier1_contribution: Money,
    /// Earnings counted in tier II.
    pub tier2_earnings: Money,
    /// Unrounded tier II contribution.
    pub tier2_contribution: Money,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the two-tier pension contribution on `gross_pay`.
///
/// # Errors
///
/// Returns `InvalidInput` if `gross_pay` is negative.
///
/// # Examples
///
/// ```
/// use payroll_tax_engine::calculation::calculate_pension_contribution;
/// use payroll_tax_engine::config::kenya_2024;
/// use rust_decimal::Decimal;
///
/// let schedule = kenya_2024().unwrap();
/// let result = calculate_pension_contribution(Decimal::from(30000), schedule.pension(), 3).unwrap();
/// assert_eq!(result.amount, Decimal::from(1800));
/// ```
pub fn calculate_pension_contribution(
    gross_pay: Money,
    tiers: &PensionTiers,
    step_number: u32,
) -> EngineResult<PensionContributionResult> {
    let gross_pay = ensure_non_negative("gross_pay", gross_pay)?;

    let tier1_earnings = gross_pay.min(tiers.tier1_limit());
    let tier1_contribution = tier1_earnings * tiers.rate();

    let tier2_earnings = (gross_pay - tiers.tier1_limit())
        .max(Decimal::ZERO)
        .min(tiers.tier2_limit() - tiers.tier1_limit());
    let tier2_contribution = tier2_earnings * tiers.rate();

    let amount = round_money(tier1_contribution + tier2_contribution);
    let rate_percent = (tiers.rate() * Decimal::ONE_HUNDRED).normalize();

    let audit_step = AuditStep {
        step_number,
        rule_id: "pension_contribution".to_string(),
        rule_name: "Two-Tier Pension Contribution".to_string(),
        statutory_ref: tiers.reference().to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.normalize().to_string(),
            "tier1_limit": tiers.tier1_limit().normalize().to_string(),
            "tier2_limit": tiers.tier2_limit().normalize().to_string(),
            "rate": tiers.rate().normalize().to_string()
        }),
        output: serde_json::json!({
            "tier1_earnings": tier1_earnings.normalize().to_string(),
            "tier1_contribution": tier1_contribution.normalize().to_string(),
            "tier2_earnings": tier2_earnings.normalize().to_string(),
            "tier2_contribution": tier2_contribution.normalize().to_string(),
            "pension_contribution": amount.to_string()
        }),
        reasoning: format!(
            "Tier I ${} x {}% = ${} + Tier II ${} x {}% = ${}; total ${}",
            tier1_earnings.normalize(),
            rate_percent,
            tier1_contribution.normalize(),
            tier2_earnings.normalize(),
            rate_percent,
            tier2_contribution.normalize(),
            amount
        ),
    };

    Ok(PensionContributionResult {
        amount,
        tier1_contribution,
        tier2_earnings,
        tier2_contribution,
        audit_step,
    })
}

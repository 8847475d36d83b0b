//! Payroll tax aggregation.
//!
//! Combines the statutory components of a [`PayrollTaxPolicy`] into a single
//! [`PayrollTaxResult`] for one employee and one pay period.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Money, PayrollTaxResult, ensure_money_input,
};

use super::policy::PayrollTaxPolicy;
use super::rounding::round_money;

/// A payroll tax result together with the audit trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditedPayrollTax {
    /// The deduction breakdown.
    pub result: PayrollTaxResult,
    /// Every calculation step and any warnings.
    pub audit_trace: AuditTrace,
}

/// Computes the statutory deduction breakdown for `gross_pay`.
///
/// `other_deductions` are non-statutory amounts the caller has already
/// worked out (loan repayments, salary advances); they are added to
/// `total_deductions` unchanged. Net pay is not clamped, so it is negative
/// when deductions exceed gross pay.
///
/// # Errors
///
/// Returns `InvalidInput` if either amount is negative, carries more than
/// two decimal places, or exceeds [`MAX_MONEY_INPUT`]. Validation happens
/// before any component is calculated.
///
/// [`MAX_MONEY_INPUT`]: crate::models::MAX_MONEY_INPUT
///
/// # Examples
///
/// ```
/// use payroll_tax_engine::calculation::compute_payroll_tax;
/// use payroll_tax_engine::config::kenya_2024;
/// use rust_decimal::Decimal;
///
/// let schedule = kenya_2024().unwrap();
/// let result = compute_payroll_tax(&schedule, Decimal::from(30000), Decimal::ZERO).unwrap();
///
/// assert_eq!(result.income_tax, Decimal::from(1500));
/// assert_eq!(result.health_levy, Decimal::from(900));
/// assert_eq!(result.pension_contribution, Decimal::from(1800));
/// assert_eq!(result.net_pay, Decimal::from(25800));
/// ```
pub fn compute_payroll_tax(
    policy: &dyn PayrollTaxPolicy,
    gross_pay: Money,
    other_deductions: Money,
) -> EngineResult<PayrollTaxResult> {
    compute_payroll_tax_with_audit(policy, gross_pay, other_deductions).map(|audited| audited.result)
}

/// Computes the statutory deduction breakdown and records an audit trace.
///
/// The steps are, in order: pension contribution, health levy, taxable
/// income, income tax and totals.
///
/// # Errors
///
/// Returns `InvalidInput` under the same conditions as [`compute_payroll_tax`].
pub fn compute_payroll_tax_with_audit(
    policy: &dyn PayrollTaxPolicy,
    gross_pay: Money,
    other_deductions: Money,
) -> EngineResult<AuditedPayrollTax> {
    let gross_pay = ensure_money_input("gross_pay", gross_pay)?;
    let other_deductions = ensure_money_input("other_deductions", other_deductions)?;

    let mut steps: Vec<AuditStep> = Vec::with_capacity(5);
    let mut warnings: Vec<AuditWarning> = Vec::new();

    let pension = policy.pension_contribution(gross_pay, 1)?;
    steps.push(pension.audit_step);

    let levy = policy.health_levy(gross_pay, 2)?;
    steps.push(levy.audit_step);
    if levy.fallback_applied {
        warnings.push(AuditWarning {
            code: "LEVY_TIER_FALLBACK".to_string(),
            message: format!(
                "Gross pay {} exceeds every health levy tier; the final tier amount {} was charged",
                gross_pay, levy.amount
            ),
            severity: "low".to_string(),
        });
    }

    let pension_deductible = policy.pension_deductible();
    let taxable_income = if pension_deductible {
        round_money(checked_sub("taxable_income", gross_pay, pension.amount)?.max(Decimal::ZERO))
    } else {
        gross_pay
    };
    steps.push(AuditStep {
        step_number: 3,
        rule_id: "taxable_income".to_string(),
        rule_name: "Taxable Income".to_string(),
        statutory_ref: policy.jurisdiction().to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.normalize().to_string(),
            "pension_contribution": pension.amount.normalize().to_string(),
            "pension_deductible": pension_deductible
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string()
        }),
        reasoning: if pension_deductible {
            format!(
                "${} gross - ${} pension = ${} taxable",
                gross_pay.normalize(),
                pension.amount.normalize(),
                taxable_income.normalize()
            )
        } else {
            format!(
                "Pension is not deductible - taxable income equals gross pay ${}",
                gross_pay.normalize()
            )
        },
    });

    let income_tax = policy.income_tax(taxable_income, 4)?;
    steps.push(income_tax.audit_step);

    let total_deductions = [levy.amount, pension.amount, other_deductions]
        .into_iter()
        .try_fold(income_tax.amount, |sum, amount| {
            checked_add("total_deductions", sum, amount)
        })?;
    let net_pay = round_money(checked_sub("net_pay", gross_pay, total_deductions)?);

    steps.push(AuditStep {
        step_number: 5,
        rule_id: "net_pay".to_string(),
        rule_name: "Total Deductions and Net Pay".to_string(),
        statutory_ref: policy.jurisdiction().to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.normalize().to_string(),
            "income_tax": income_tax.amount.normalize().to_string(),
            "health_levy": levy.amount.normalize().to_string(),
            "pension_contribution": pension.amount.normalize().to_string(),
            "other_deductions": other_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.normalize().to_string(),
            "net_pay": net_pay.normalize().to_string()
        }),
        reasoning: format!(
            "${} - (${} + ${} + ${} + ${}) = ${}",
            gross_pay.normalize(),
            income_tax.amount.normalize(),
            levy.amount.normalize(),
            pension.amount.normalize(),
            other_deductions.normalize(),
            net_pay.normalize()
        ),
    });

    if net_pay < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_PAY".to_string(),
            message: format!(
                "Total deductions {} exceed gross pay {}",
                total_deductions, gross_pay
            ),
            severity: "high".to_string(),
        });
    }

    debug!(
        jurisdiction = policy.jurisdiction(),
        gross_pay = %gross_pay,
        total_deductions = %total_deductions,
        net_pay = %net_pay,
        "Computed payroll tax"
    );

    Ok(AuditedPayrollTax {
        result: PayrollTaxResult {
            gross_pay,
            taxable_income,
            income_tax: income_tax.amount,
            health_levy: levy.amount,
            pension_contribution: pension.amount,
            other_deductions,
            total_deductions,
            net_pay,
        },
        audit_trace: AuditTrace { steps, warnings },
    })
}

fn checked_add(field: &str, a: Money, b: Money) -> EngineResult<Money> {
    a.checked_add(b).ok_or_else(|| overflow(field))
}

fn checked_sub(field: &str, a: Money, b: Money) -> EngineResult<Money> {
    a.checked_sub(b).ok_or_else(|| overflow(field))
}

fn overflow(field: &str) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: "amount is outside the representable range".to_string(),
    }
}

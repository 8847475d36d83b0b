//! Calculation result models for the Payroll Tax Engine.
//!
//! This module contains the [`PayrollTaxResult`] breakdown returned by the
//! engine, the audit trace types that explain how each figure was reached,
//! and the [`PayrollTaxCalculation`] envelope served over the API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

/// The statutory deduction breakdown for one gross pay figure.
///
/// This is the sole output of the engine. Every amount is rounded to two
/// decimal places, and `total_deductions` is the exact sum of the four
/// deduction components. `net_pay` may be negative when `other_deductions`
/// exceed what is left after statutory deductions; it is never clamped.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::PayrollTaxResult;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let result = PayrollTaxResult {
///     gross_pay: dec("30000.00"),
///     taxable_income: dec("30000.00"),
///     income_tax: dec("1500.00"),
///     health_levy: dec("900.00"),
///     pension_contribution: dec("1800.00"),
///     other_deductions: dec("0.00"),
///     total_deductions: dec("4200.00"),
///     net_pay: dec("25800.00"),
/// };
/// assert_eq!(result.statutory_deductions(), dec("4200.00"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTaxResult {
    /// Gross pay for the period as supplied by the caller.
    pub gross_pay: Money,
    /// Income subject to income tax.
    pub taxable_income: Money,
    /// Income tax after personal relief.
    pub income_tax: Money,
    /// Flat-tier health levy.
    pub health_levy: Money,
    /// Two-tier pension contribution.
    pub pension_contribution: Money,
    /// Caller-supplied non-statutory deductions (loans, advances).
    pub other_deductions: Money,
    /// `income_tax + health_levy + pension_contribution + other_deductions`.
    pub total_deductions: Money,
    /// `gross_pay - total_deductions`, rounded to two decimal places.
    pub net_pay: Money,
}

impl PayrollTaxResult {
    /// Returns the statutory part of the deductions, excluding `other_deductions`.
    pub fn statutory_deductions(&self) -> Money {
        self.income_tax + self.health_levy + self.pension_contribution
    }

    /// Returns true if deductions exceed gross pay.
    pub fn has_negative_net_pay(&self) -> bool {
        self.net_pay.is_sign_negative() && !self.net_pay.is_zero()
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or schedule for this rule.
    pub statutory_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate results the caller should look at but that are not
/// errors, such as a negative net pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The envelope returned by the API for one payroll tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTaxCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// Optional caller-supplied employee identifier, echoed back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// The jurisdiction whose schedule was applied.
    pub jurisdiction: String,
    /// The effective date of the schedule that was applied.
    pub schedule_effective_date: NaiveDate,
    /// The deduction breakdown.
    pub result: PayrollTaxResult,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_result(other_deductions: &str, total: &str, net: &str) -> PayrollTaxResult {
        PayrollTaxResult {
            gross_pay: dec("30000.00"),
            taxable_income: dec("30000.00"),
            income_tax: dec("1500.00"),
            health_levy: dec("900.00"),
            pension_contribution: dec("1800.00"),
            other_deductions: dec(other_deductions),
            total_deductions: dec(total),
            net_pay: dec(net),
        }
    }

    #[test]
    fn test_statutory_deductions_excludes_other_deductions() {
        let result = create_sample_result("500.00", "4700.00", "25300.00");
        assert_eq!(result.statutory_deductions(), dec("4200.00"));
    }

    #[test]
    fn test_has_negative_net_pay() {
        assert!(!create_sample_result("0.00", "4200.00", "25800.00").has_negative_net_pay());
        assert!(!create_sample_result("25800.00", "30000.00", "0.00").has_negative_net_pay());
        assert!(create_sample_result("30000.00", "34200.00", "-4200.00").has_negative_net_pay());
    }

    #[test]
    fn test_result_serializes_amounts_as_strings() {
        let result = create_sample_result("0.00", "4200.00", "25800.00");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"gross_pay\":\"30000.00\""));
        assert!(json.contains("\"income_tax\":\"1500.00\""));
        assert!(json.contains("\"net_pay\":\"25800.00\""));
    }

    #[test]
    fn test_result_deserialization() {
        let json = r#"{
            "gross_pay": "30000.00",
            "taxable_income": "30000.00",
            "income_tax": "1500.00",
            "health_levy": "900.00",
            "pension_contribution": "1800.00",
            "other_deductions": "0.00",
            "total_deductions": "4200.00",
            "net_pay": "25800.00"
        }"#;

        let result: PayrollTaxResult = serde_json::from_str(json).unwrap();
        assert_eq!(result, create_sample_result("0.00", "4200.00", "25800.00"));
    }

    #[test]
    fn test_calculation_omits_missing_employee_id() {
        let calculation = PayrollTaxCalculation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            employee_id: None,
            jurisdiction: "KE".to_string(),
            schedule_effective_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            result: create_sample_result("0.00", "4200.00", "25800.00"),
            audit_trace: AuditTrace::default(),
        };

        let json = serde_json::to_string(&calculation).unwrap();
        assert!(!json.contains("employee_id"));
        assert!(json.contains("\"schedule_effective_date\":\"2024-02-01\""));
    }
}

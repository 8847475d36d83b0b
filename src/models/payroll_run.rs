//! Payroll run models.
//!
//! A payroll run computes the statutory breakdown for every employee paid on
//! the same date. These types carry the per-employee lines and the run totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{Money, PayrollTaxResult};

/// The computed breakdown for one employee in a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunLine {
    /// The caller's identifier for the employee.
    pub employee_id: String,
    /// The deduction breakdown for this employee.
    pub result: PayrollTaxResult,
}

/// Column totals across all lines of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayrollRunTotals {
    /// Number of employees in the run.
    pub employee_count: usize,
    /// Sum of gross pay.
    pub gross_pay: Money,
    /// Sum of income tax.
    pub income_tax: Money,
    /// Sum of health levy.
    pub health_levy: Money,
    /// Sum of pension contributions.
    pub pension_contribution: Money,
    /// Sum of other deductions.
    pub other_deductions: Money,
    /// Sum of total deductions.
    pub total_deductions: Money,
    /// Sum of net pay.
    pub net_pay: Money,
}

impl PayrollRunTotals {
    /// Sums the columns of the given lines.
    ///
    /// Every line is already rounded, so the totals are exact.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a column sum leaves the representable range.
    pub fn from_lines(lines: &[PayrollRunLine]) -> EngineResult<Self> {
        lines
            .iter()
            .try_fold(PayrollRunTotals::default(), |acc, line| -> EngineResult<Self> {
                let r = &line.result;
                Ok(PayrollRunTotals {
                    employee_count: acc.employee_count + 1,
                    gross_pay: column_sum("gross_pay", acc.gross_pay, r.gross_pay)?,
                    income_tax: column_sum("income_tax", acc.income_tax, r.income_tax)?,
                    health_levy: column_sum("health_levy", acc.health_levy, r.health_levy)?,
                    pension_contribution: column_sum(
                        "pension_contribution",
                        acc.pension_contribution,
                        r.pension_contribution,
                    )?,
                    other_deductions: column_sum(
                        "other_deductions",
                        acc.other_deductions,
                        r.other_deductions,
                    )?,
                    total_deductions: column_sum(
                        "total_deductions",
                        acc.total_deductions,
                        r.total_deductions,
                    )?,
                    net_pay: column_sum("net_pay", acc.net_pay, r.net_pay)?,
                })
            })
    }
}

fn column_sum(column: &str, total: Money, amount: Money) -> EngineResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| EngineError::InvalidInput {
            field: column.to_string(),
            message: "run total is outside the representable range".to_string(),
        })
}

/// The result of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunResult {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// The jurisdiction whose schedule was applied.
    pub jurisdiction: String,
    /// The effective date of the schedule that was applied.
    pub schedule_effective_date: NaiveDate,
    /// One line per employee, in request order.
    pub lines: Vec<PayrollRunLine>,
    /// Column totals.
    pub totals: PayrollRunTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(employee_id: &str, gross: &str, tax: &str, net: &str) -> PayrollRunLine {
        let gross = dec(gross);
        let tax = dec(tax);
        let net = dec(net);
        PayrollRunLine {
            employee_id: employee_id.to_string(),
            result: PayrollTaxResult {
                gross_pay: gross,
                taxable_income: gross,
                income_tax: tax,
                health_levy: Decimal::ZERO,
                pension_contribution: Decimal::ZERO,
                other_deductions: Decimal::ZERO,
                total_deductions: tax,
                net_pay: net,
            },
        }
    }

    #[test]
    fn test_totals_of_empty_run_are_zero() {
        let totals = PayrollRunTotals::from_lines(&[]).unwrap();
        assert_eq!(totals.employee_count, 0);
        assert_eq!(totals.gross_pay, Decimal::ZERO);
        assert_eq!(totals.net_pay, Decimal::ZERO);
    }

    #[test]
    fn test_totals_sum_each_column() {
        let lines = vec![
            line("emp_001", "30000.00", "1500.00", "28500.00"),
            line("emp_002", "50000.00", "7383.35", "42616.65"),
        ];

        let totals = PayrollRunTotals::from_lines(&lines).unwrap();
        assert_eq!(totals.employee_count, 2);
        assert_eq!(totals.gross_pay, dec("80000.00"));
        assert_eq!(totals.income_tax, dec("8883.35"));
        assert_eq!(totals.total_deductions, dec("8883.35"));
        assert_eq!(totals.net_pay, dec("71116.65"));
    }

    #[test]
    fn test_totals_overflow_is_an_error() {
        let mut big = line("emp_001", "0", "0", "0");
        big.result.gross_pay = Decimal::MAX;
        let lines = vec![big.clone(), big];

        match PayrollRunTotals::from_lines(&lines) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "gross_pay"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}

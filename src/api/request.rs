//! Request types for the Payroll Tax Engine API.
//!
//! This module defines the JSON request structures for the `/payroll-tax`
//! and `/payroll-run` endpoints. Amounts may be sent as JSON strings or
//! numbers; strings are preferred because they keep exact cents.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body for the `/payroll-tax` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollTaxRequest {
    /// Jurisdiction code; the server default when omitted.
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// The pay date used to pick the schedule; today when omitted.
    #[serde(default)]
    pub pay_date: Option<NaiveDate>,
    /// Optional employee identifier, echoed in the response.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Gross pay for the period (basic salary plus allowances).
    pub gross_pay: Decimal,
    /// Non-statutory deductions already worked out by the caller.
    #[serde(default)]
    pub other_deductions: Decimal,
}

/// One employee in a `/payroll-run` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunEmployee {
    /// The caller's identifier for the employee.
    pub employee_id: String,
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Non-statutory deductions already worked out by the caller.
    #[serde(default)]
    pub other_deductions: Decimal,
}

/// Request body for the `/payroll-run` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunRequest {
    /// Jurisdiction code; the server default when omitted.
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// The pay date used to pick the schedule; today when omitted.
    #[serde(default)]
    pub pay_date: Option<NaiveDate>,
    /// Employees paid in this run.
    pub employees: Vec<PayrollRunEmployee>,
}

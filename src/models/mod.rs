//! Core data models for the Payroll Tax Engine.
//!
//! This module contains the value types produced and consumed by the engine.

mod calculation_result;
mod money;
mod payroll_run;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, PayrollTaxCalculation, PayrollTaxResult,
};
pub use money::{MAX_MONEY_INPUT, Money, ensure_money_input, ensure_non_negative};
pub use payroll_run::{PayrollRunLine, PayrollRunResult, PayrollRunTotals};

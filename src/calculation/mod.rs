//! Calculation logic for the Payroll Tax Engine.
//!
//! This module contains the three statutory calculator primitives (progressive
//! income tax bands, flat-amount levy tiers, and two-tier pension
//! contributions), the rounding policy they share, the jurisdiction policy
//! trait, and the aggregator that composes them into a payroll tax result.

mod levy;
mod payroll_tax;
mod pension;
mod policy;
mod progressive;
mod rounding;

pub use levy::{HealthLevyResult, LevyTable, LevyTier, calculate_health_levy};
pub use payroll_tax::{AuditedPayrollTax, compute_payroll_tax, compute_payroll_tax_with_audit};
pub use pension::{PensionContributionResult, PensionTiers, calculate_pension_contribution};
pub use policy::PayrollTaxPolicy;
pub use progressive::{
    BandPortion, IncomeTaxResult, ProgressiveTaxTable, TaxBand, calculate_income_tax,
};
pub use rounding::{MONEY_DECIMAL_PLACES, round_money};

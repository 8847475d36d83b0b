//! Jurisdiction policy abstraction.
//!
//! The aggregator never names a jurisdiction. It asks a [`PayrollTaxPolicy`]
//! for each statutory component, so a new statutory year is new schedule data
//! and a structurally different regime is a new implementation of the trait.

use crate::config::StatutorySchedule;
use crate::error::EngineResult;
use crate::models::Money;

use super::levy::{HealthLevyResult, calculate_health_levy};
use super::pension::{PensionContributionResult, calculate_pension_contribution};
use super::progressive::{IncomeTaxResult, calculate_income_tax};

/// The statutory rules of one jurisdiction for one period.
///
/// Implementations must be pure: the same inputs always produce the same
/// outputs, and no method may mutate shared state.
pub trait PayrollTaxPolicy: Send + Sync {
    /// The jurisdiction code (e.g. "KE").
    fn jurisdiction(&self) -> &str;

    /// Income tax on `taxable_income`, after any personal relief.
    fn income_tax(&self, taxable_income: Money, step_number: u32) -> EngineResult<IncomeTaxResult>;

    /// Flat health levy for `gross_pay`.
    fn health_levy(&self, gross_pay: Money, step_number: u32) -> EngineResult<HealthLevyResult>;

    /// Pension contribution on `gross_pay`.
    fn pension_contribution(
        &self,
        gross_pay: Money,
        step_number: u32,
    ) -> EngineResult<PensionContributionResult>;

    /// Whether the pension contribution is deducted before income tax.
    fn pension_deductible(&self) -> bool;
}

impl PayrollTaxPolicy for StatutorySchedule {
    fn jurisdiction(&self) -> &str {
        StatutorySchedule::jurisdiction(self)
    }

    fn income_tax(&self, taxable_income: Money, step_number: u32) -> EngineResult<IncomeTaxResult> {
        calculate_income_tax(taxable_income, StatutorySchedule::income_tax(self), step_number)
    }

    fn health_levy(&self, gross_pay: Money, step_number: u32) -> EngineResult<HealthLevyResult> {
        calculate_health_levy(gross_pay, StatutorySchedule::health_levy(self), step_number)
    }

    fn pension_contribution(
        &self,
        gross_pay: Money,
        step_number: u32,
    ) -> EngineResult<PensionContributionResult> {
        calculate_pension_contribution(gross_pay, self.pension(), step_number)
    }

    fn pension_deductible(&self) -> bool {
        StatutorySchedule::pension_deductible(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::kenya_2024;
    use rust_decimal::Decimal;

    #[test]
    fn test_statutory_schedule_is_a_policy_object() {
        let schedule = kenya_2024().unwrap();
        let policy: &dyn PayrollTaxPolicy = &schedule;

        assert_eq!(policy.jurisdiction(), "KE");
        assert!(!policy.pension_deductible());
        assert_eq!(
            policy.health_levy(Decimal::from(30000), 1).unwrap().amount,
            Decimal::from(900)
        );
    }

    #[test]
    fn test_policy_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatutorySchedule>();
    }
}

//! Configuration loading for the Payroll Tax Engine.
//!
//! Statutory schedules are data, not code: this module loads them from YAML
//! (or builds the Kenya schedule in code), validates their invariants once,
//! and hands out immutable [`StatutorySchedule`] values.

mod kenya;
mod loader;
mod types;

pub use kenya::{KENYA, kenya_2024, kenya_metadata};
pub use loader::ConfigLoader;
pub use types::{
    HealthLevyConfig, IncomeTaxConfig, Jurisdiction, JurisdictionMetadata, PayrollConfig,
    PensionConfig, ScheduleConfig, StatutorySchedule,
};

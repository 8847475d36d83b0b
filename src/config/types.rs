//! Configuration types for statutory schedules.
//!
//! The `*Config` structs mirror the YAML files one-to-one and carry no
//! guarantees. [`StatutorySchedule`] is the validated form the engine uses;
//! it can only be built from tables that already passed their invariants.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::calculation::{LevyTable, LevyTier, PensionTiers, ProgressiveTaxTable, TaxBand};
use crate::error::{EngineError, EngineResult};
use crate::models::Money;

/// Jurisdiction metadata from jurisdiction.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JurisdictionMetadata {
    /// The jurisdiction code (e.g., "KE").
    pub code: String,
    /// The full name of the jurisdiction.
    pub name: String,
    /// ISO 4217 currency code for all amounts.
    pub currency: String,
    /// URL of the revenue authority's published rates.
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Income tax section of a schedule file.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxConfig {
    /// Reference to the statute defining the bands.
    pub reference: String,
    /// Monthly personal relief credit.
    pub personal_relief: Money,
    /// Marginal bands in ascending order.
    pub bands: Vec<TaxBand>,
}

/// Health levy section of a schedule file.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthLevyConfig {
    /// Reference to the statute defining the tiers.
    pub reference: String,
    /// Flat-amount tiers in ascending order.
    pub tiers: Vec<LevyTier>,
}

/// Pension section of a schedule file.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionConfig {
    /// Reference to the statute defining the tiers.
    pub reference: String,
    /// Upper limit of tier I earnings.
    pub tier1_limit: Money,
    /// Upper limit of tier II earnings.
    pub tier2_limit: Money,
    /// Contribution rate shared by both tiers.
    pub rate: Decimal,
    /// Whether the contribution is deducted before income tax.
    #[serde(default)]
    pub deductible_from_taxable_income: bool,
}

/// One schedule file from the schedules directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// The date from which this schedule applies.
    pub effective_date: NaiveDate,
    /// Income tax bands and relief.
    pub income_tax: IncomeTaxConfig,
    /// Health levy tiers.
    pub health_levy: HealthLevyConfig,
    /// Pension tiers.
    pub pension: PensionConfig,
}

/// A validated statutory schedule for one jurisdiction from one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatutorySchedule {
    jurisdiction: String,
    effective_date: NaiveDate,
    income_tax: ProgressiveTaxTable,
    health_levy: LevyTable,
    pension: PensionTiers,
    pension_deductible: bool,
}

impl StatutorySchedule {
    /// Assembles a schedule from already-validated tables.
    pub fn new(
        jurisdiction: impl Into<String>,
        effective_date: NaiveDate,
        income_tax: ProgressiveTaxTable,
        health_levy: LevyTable,
        pension: PensionTiers,
        pension_deductible: bool,
    ) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            effective_date,
            income_tax,
            health_levy,
            pension,
            pension_deductible,
        }
    }

    /// Validates a parsed schedule file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvariantViolation` if any table breaks its invariants.
    pub fn from_config(jurisdiction: &str, config: ScheduleConfig) -> EngineResult<Self> {
        let income_tax = ProgressiveTaxTable::new(
            config.income_tax.bands,
            config.income_tax.personal_relief,
            config.income_tax.reference,
        )?;
        let health_levy = LevyTable::new(config.health_levy.tiers, config.health_levy.reference)?;
        let pension = PensionTiers::new(
            config.pension.tier1_limit,
            config.pension.tier2_limit,
            config.pension.rate,
            config.pension.reference,
        )?;

        Ok(Self::new(
            jurisdiction,
            config.effective_date,
            income_tax,
            health_levy,
            pension,
            config.pension.deductible_from_taxable_income,
        ))
    }

    /// Returns the jurisdiction code.
    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    /// Returns the date from which this schedule applies.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Returns the income tax band table.
    pub fn income_tax(&self) -> &ProgressiveTaxTable {
        &self.income_tax
    }

    /// Returns the health levy table.
    pub fn health_levy(&self) -> &LevyTable {
        &self.health_levy
    }

    /// Returns the pension tiers.
    pub fn pension(&self) -> &PensionTiers {
        &self.pension
    }

    /// Returns whether pension is deducted before income tax.
    pub fn pension_deductible(&self) -> bool {
        self.pension_deductible
    }
}

/// A jurisdiction and all of its statutory schedules.
#[derive(Debug, Clone)]
pub struct Jurisdiction {
    metadata: JurisdictionMetadata,
    /// Sorted oldest first.
    schedules: Vec<StatutorySchedule>,
}

impl Jurisdiction {
    /// Creates a jurisdiction, sorting its schedules by effective date.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvariantViolation` if there are no schedules or two
    /// schedules share an effective date.
    pub fn new(
        metadata: JurisdictionMetadata,
        schedules: Vec<StatutorySchedule>,
    ) -> EngineResult<Self> {
        let mut sorted = schedules;
        sorted.sort_by_key(|s| s.effective_date());

        if sorted.is_empty() {
            return Err(EngineError::invariant(
                "schedule",
                format!("jurisdiction {} has no schedules", metadata.code),
            ));
        }
        if let Some(pair) = sorted
            .windows(2)
            .find(|pair| pair[0].effective_date() == pair[1].effective_date())
        {
            return Err(EngineError::invariant(
                "schedule",
                format!(
                    "jurisdiction {} has two schedules effective {}",
                    metadata.code,
                    pair[0].effective_date()
                ),
            ));
        }

        Ok(Self {
            metadata,
            schedules: sorted,
        })
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns all schedules, oldest first.
    pub fn schedules(&self) -> &[StatutorySchedule] {
        &self.schedules
    }

    /// Returns the schedule in effect on `date`: the latest one whose
    /// effective date is on or before it.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleNotFound` if `date` precedes every schedule.
    pub fn schedule_for(&self, date: NaiveDate) -> EngineResult<&StatutorySchedule> {
        self.schedules
            .iter()
            .rev()
            .find(|s| s.effective_date() <= date)
            .ok_or_else(|| EngineError::ScheduleNotFound {
                jurisdiction: self.metadata.code.clone(),
                date,
            })
    }
}

/// The complete payroll tax configuration.
#[derive(Debug, Clone, Default)]
pub struct PayrollConfig {
    jurisdictions: HashMap<String, Jurisdiction>,
}

impl PayrollConfig {
    /// Creates a configuration from a list of jurisdictions keyed by code.
    ///
    /// Codes are matched case-insensitively.
    pub fn new(jurisdictions: Vec<Jurisdiction>) -> Self {
        Self {
            jurisdictions: jurisdictions
                .into_iter()
                .map(|j| (j.metadata().code.to_uppercase(), j))
                .collect(),
        }
    }

    /// Returns the jurisdiction with the given code.
    pub fn jurisdiction(&self, code: &str) -> Option<&Jurisdiction> {
        self.jurisdictions.get(&code.to_uppercase())
    }

    /// Returns all configured jurisdiction codes, sorted.
    pub fn jurisdiction_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.jurisdictions.keys().cloned().collect();
        codes.sort();
        codes
    }
}

//! Built-in Kenya statutory schedule.
//!
//! The same figures ship as `config/ke/schedules/2024-02-01.yaml`; this
//! factory lets callers compute without a configuration directory.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::{LevyTable, LevyTier, PensionTiers, ProgressiveTaxTable, TaxBand};
use crate::error::{EngineError, EngineResult};

use super::types::{JurisdictionMetadata, StatutorySchedule};

/// Jurisdiction code for Kenya.
pub const KENYA: &str = "KE";

/// Monthly PAYE bands (KES), lower bound and rate in basis points.
/// `None` marks the unbounded top band.
const PAYE_BANDS: [(i64, Option<i64>, i64); 5] = [
    (0, Some(24_000), 1000),
    (24_000, Some(32_333), 2500),
    (32_333, Some(500_000), 3000),
    (500_000, Some(800_000), 3250),
    (800_000, None, 3500),
];

const PERSONAL_RELIEF: i64 = 2_400;

/// NHIF monthly contribution by gross pay (KES).
const NHIF_TIERS: [(i64, Option<i64>, i64); 17] = [
    (0, Some(5_999), 150),
    (6_000, Some(7_999), 300),
    (8_000, Some(11_999), 400),
    (12_000, Some(14_999), 500),
    (15_000, Some(19_999), 600),
    (20_000, Some(24_999), 750),
    (25_000, Some(29_999), 850),
    (30_000, Some(34_999), 900),
    (35_000, Some(39_999), 950),
    (40_000, Some(44_999), 1_000),
    (45_000, Some(49_999), 1_100),
    (50_000, Some(59_999), 1_200),
    (60_000, Some(69_999), 1_300),
    (70_000, Some(79_999), 1_400),
    (80_000, Some(89_999), 1_500),
    (90_000, Some(99_999), 1_600),
    (100_000, None, 1_700),
];

/// NSSF lower and upper earnings limits, effective February 2024.
const NSSF_TIER1_LIMIT: i64 = 7_000;
const NSSF_TIER2_LIMIT: i64 = 36_000;
/// Employee share, 6%.
const NSSF_RATE_BASIS_POINTS: i64 = 600;

/// Returns the metadata for Kenya.
pub fn kenya_metadata() -> JurisdictionMetadata {
    JurisdictionMetadata {
        code: KENYA.to_string(),
        name: "Kenya".to_string(),
        currency: "KES".to_string(),
        source_url: Some("https://www.kra.go.ke/individual/filing-paying/types-of-taxes/paye".to_string()),
    }
}

/// Builds the Kenya schedule effective 1 February 2024.
///
/// Bands, tiers and limits are validated exactly as a loaded YAML schedule
/// would be.
///
/// # Errors
///
/// Returns `ConfigInvariantViolation` only if the constants above are edited
/// into an invalid table.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::config::kenya_2024;
/// use rust_decimal::Decimal;
///
/// let schedule = kenya_2024().unwrap();
/// assert_eq!(schedule.jurisdiction(), "KE");
/// assert_eq!(schedule.income_tax().personal_relief(), Decimal::from(2400));
/// ```
pub fn kenya_2024() -> EngineResult<StatutorySchedule> {
    let bands = PAYE_BANDS
        .iter()
        .map(|&(lower, upper, bps)| TaxBand {
            lower_bound: Decimal::from(lower),
            upper_bound: upper.map(Decimal::from),
            rate: Decimal::new(bps, 4),
        })
        .collect();
    let income_tax = ProgressiveTaxTable::new(
        bands,
        Decimal::from(PERSONAL_RELIEF),
        "Income Tax Act (Cap. 470), Third Schedule",
    )?;

    let tiers = NHIF_TIERS
        .iter()
        .map(|&(lower, upper, amount)| LevyTier {
            lower_bound: Decimal::from(lower),
            upper_bound: upper.map(Decimal::from),
            amount: Decimal::from(amount),
        })
        .collect();
    let health_levy = LevyTable::new(tiers, "NHIF Act 1998, Standard Contribution Rates")?;

    let pension = PensionTiers::new(
        Decimal::from(NSSF_TIER1_LIMIT),
        Decimal::from(NSSF_TIER2_LIMIT),
        Decimal::new(NSSF_RATE_BASIS_POINTS, 4),
        "NSSF Act 2013, Section 20",
    )?;

    let effective_date = NaiveDate::from_ymd_opt(2024, 2, 1).ok_or_else(|| {
        EngineError::invariant("schedule", "invalid effective date for Kenya 2024")
    })?;

    Ok(StatutorySchedule::new(
        KENYA,
        effective_date,
        income_tax,
        health_levy,
        pension,
        false,
    ))
}

//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! schedules from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::kenya::{kenya_2024, kenya_metadata};
use super::types::{
    Jurisdiction, JurisdictionMetadata, PayrollConfig, ScheduleConfig, StatutorySchedule,
};

/// Loads and provides access to statutory schedules.
///
/// The `ConfigLoader` reads one subdirectory per jurisdiction and validates
/// every schedule as it is loaded, so a malformed table stops the process at
/// startup rather than failing individual calculations.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── ke/
///     ├── jurisdiction.yaml     # Code, name, currency
///     └── schedules/
///         └── 2024-02-01.yaml   # Schedule effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_tax_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
/// let schedule = loader.schedule_for("KE", date).unwrap();
/// println!("Personal relief: {}", schedule.income_tax().personal_relief());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration root (e.g., "./config")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The directory, a jurisdiction.yaml or a schedules directory is missing
    /// - Any file contains invalid YAML
    /// - Any table violates its invariants
    /// - No jurisdiction subdirectory is found
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let entries = fs::read_dir(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let mut jurisdictions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: path_str.clone(),
            })?;

            let dir = entry.path();
            if dir.is_dir() {
                jurisdictions.push(Self::load_jurisdiction(&dir)?);
            }
        }

        if jurisdictions.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no jurisdiction directories found)", path_str),
            });
        }

        info!(
            path = %path_str,
            jurisdictions = jurisdictions.len(),
            "Loaded payroll tax configuration"
        );

        Ok(Self {
            config: PayrollConfig::new(jurisdictions),
        })
    }

    /// Returns a loader holding only the built-in Kenya schedule.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvariantViolation` if the built-in tables are invalid.
    pub fn builtin() -> EngineResult<Self> {
        let kenya = Jurisdiction::new(kenya_metadata(), vec![kenya_2024()?])?;
        Ok(Self {
            config: PayrollConfig::new(vec![kenya]),
        })
    }

    /// Loads one jurisdiction directory.
    fn load_jurisdiction(dir: &Path) -> EngineResult<Jurisdiction> {
        let metadata = Self::load_yaml::<JurisdictionMetadata>(&dir.join("jurisdiction.yaml"))?;
        let schedules = Self::load_schedules(&metadata.code, &dir.join("schedules"))?;

        info!(
            jurisdiction = %metadata.code,
            schedules = schedules.len(),
            "Loaded jurisdiction"
        );

        Jurisdiction::new(metadata, schedules)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and validates all schedule files from a schedules directory.
    fn load_schedules(
        jurisdiction: &str,
        schedules_dir: &Path,
    ) -> EngineResult<Vec<StatutorySchedule>> {
        let schedules_dir_str = schedules_dir.display().to_string();

        if !schedules_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: schedules_dir_str,
            });
        }

        let entries = fs::read_dir(schedules_dir).map_err(|_| EngineError::ConfigNotFound {
            path: schedules_dir_str.clone(),
        })?;

        let mut schedules = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: schedules_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let schedule_config = Self::load_yaml::<ScheduleConfig>(&path)?;
                debug!(
                    jurisdiction,
                    effective_date = %schedule_config.effective_date,
                    path = %path.display(),
                    "Validating schedule"
                );
                schedules.push(StatutorySchedule::from_config(jurisdiction, schedule_config)?);
            }
        }

        if schedules.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no schedule files found)", schedules_dir_str),
            });
        }

        Ok(schedules)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns all configured jurisdiction codes, sorted.
    pub fn jurisdiction_codes(&self) -> Vec<String> {
        self.config.jurisdiction_codes()
    }

    /// Gets a jurisdiction by its code.
    ///
    /// # Returns
    ///
    /// Returns the jurisdiction if found, or `JurisdictionNotFound` error.
    pub fn get_jurisdiction(&self, code: &str) -> EngineResult<&Jurisdiction> {
        self.config
            .jurisdiction(code)
            .ok_or_else(|| EngineError::JurisdictionNotFound {
                code: code.to_string(),
            })
    }

    /// Gets the schedule in effect for a jurisdiction on a given date.
    ///
    /// The most recent schedule effective on or before `date` is returned.
    ///
    /// # Returns
    ///
    /// Returns the schedule if found, or an error if:
    /// - The jurisdiction is not configured
    /// - No schedule is effective on the given date
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_tax_engine::config::ConfigLoader;
    /// use chrono::NaiveDate;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// let date = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
    /// let schedule = loader.schedule_for("KE", date)?;
    /// println!("Schedule effective {}", schedule.effective_date());
    /// # Ok::<(), payroll_tax_engine::error::EngineError>(())
    /// ```
    pub fn schedule_for(&self, code: &str, date: NaiveDate) -> EngineResult<&StatutorySchedule> {
        self.get_jurisdiction(code)?.schedule_for(date)
    }
}

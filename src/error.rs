//! Error types for the Payroll Tax Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading statutory schedules
//! and computing payroll deductions.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Payroll Tax Engine.
///
/// Every error is a programmer or configuration error. Nothing in the engine
/// performs I/O at calculation time, so none of these are retryable.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "gross_pay".to_string(),
///     message: "must not be negative (got -1)".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid input 'gross_pay': must not be negative (got -1)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A statutory table broke one of its structural invariants
    /// (gaps, overlaps, non-ascending bounds, out-of-range rates).
    #[error("Invalid {table} configuration: {message}")]
    ConfigInvariantViolation {
        /// The table that failed validation (e.g. "tax band").
        table: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// No jurisdiction with the given code has been configured.
    #[error("Jurisdiction not found: {code}")]
    JurisdictionNotFound {
        /// The jurisdiction code that was not found.
        code: String,
    },

    /// No statutory schedule is in effect for the given date.
    #[error("No statutory schedule for jurisdiction '{jurisdiction}' on date {date}")]
    ScheduleNotFound {
        /// The jurisdiction code.
        jurisdiction: String,
        /// The date for which the schedule was requested.
        date: NaiveDate,
    },

    /// A calculation input was outside its documented domain.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub(crate) fn invariant(table: &str, message: impl Into<String>) -> Self {
        EngineError::ConfigInvariantViolation {
            table: table.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/jurisdiction.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/jurisdiction.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/ke/schedules/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/ke/schedules/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invariant_violation_displays_table_and_message() {
        let error = EngineError::invariant("tax band", "band 2 does not start where band 1 ends");
        assert_eq!(
            error.to_string(),
            "Invalid tax band configuration: band 2 does not start where band 1 ends"
        );
    }

    #[test]
    fn test_jurisdiction_not_found_displays_code() {
        let error = EngineError::JurisdictionNotFound {
            code: "UG".to_string(),
        };
        assert_eq!(error.to_string(), "Jurisdiction not found: UG");
    }

    #[test]
    fn test_schedule_not_found_displays_jurisdiction_and_date() {
        let error = EngineError::ScheduleNotFound {
            jurisdiction: "KE".to_string(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No statutory schedule for jurisdiction 'KE' on date 2020-01-01"
        );
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::InvalidInput {
            field: "other_deductions".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid input 'other_deductions': must not be negative"
        );
    }

    #[test]
    fn test_engine_result_type_alias() {
        fn returns_ok() -> EngineResult<i32> {
            Ok(42)
        }

        fn returns_err() -> EngineResult<i32> {
            Err(EngineError::JurisdictionNotFound {
                code: "XX".to_string(),
            })
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }
}

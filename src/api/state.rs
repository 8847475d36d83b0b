//! Application state for the Payroll Tax Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// The loaded configuration is immutable, so handlers share it through an
/// `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded statutory schedules.
    config: Arc<ConfigLoader>,
    /// Jurisdiction used when a request does not name one.
    default_jurisdiction: Arc<str>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader, default_jurisdiction: impl Into<String>) -> Self {
        Self {
            config: Arc::new(config),
            default_jurisdiction: Arc::from(default_jurisdiction.into()),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the jurisdiction used when a request does not name one.
    pub fn default_jurisdiction(&self) -> &str {
        &self.default_jurisdiction
    }
}

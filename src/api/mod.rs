//! HTTP API module for the Payroll Tax Engine.
//!
//! This module provides the REST API endpoints the payroll-run service uses
//! to compute statutory deductions.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PayrollRunEmployee, PayrollRunRequest, PayrollTaxRequest};
pub use response::{ApiError, ApiErrorResponse, HealthResponse};
pub use state::AppState;

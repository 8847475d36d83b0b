//! HTTP request handlers for the Payroll Tax Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute_payroll_tax, compute_payroll_tax_with_audit};
use crate::config::StatutorySchedule;
use crate::error::EngineResult;
use crate::models::{PayrollRunLine, PayrollRunResult, PayrollRunTotals, PayrollTaxCalculation};

use super::request::{PayrollRunRequest, PayrollTaxRequest};
use super::response::{ApiError, ApiErrorResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll-tax", post(payroll_tax_handler))
        .route("/payroll-run", post(payroll_run_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        jurisdictions: state.config().jurisdiction_codes(),
    })
}

/// Handler for POST /payroll-tax.
///
/// Computes the statutory breakdown for one gross pay figure and returns it
/// with its audit trace.
async fn payroll_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollTaxRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll tax request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return ApiErrorResponse::bad_request(rejection_to_error(rejection, correlation_id))
                .into_response();
        }
    };

    let schedule = match resolve_schedule(&state, request.jurisdiction.as_deref(), request.pay_date)
    {
        Ok(schedule) => schedule,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Schedule lookup failed");
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response();
        }
    };

    let start_time = Instant::now();
    match compute_payroll_tax_with_audit(schedule, request.gross_pay, request.other_deductions) {
        Ok(audited) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                jurisdiction = schedule.jurisdiction(),
                employee_id = request.employee_id.as_deref().unwrap_or("-"),
                gross_pay = %audited.result.gross_pay,
                net_pay = %audited.result.net_pay,
                duration_us = duration.as_micros(),
                "Payroll tax computed"
            );

            let calculation = PayrollTaxCalculation {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                employee_id: request.employee_id,
                jurisdiction: schedule.jurisdiction().to_string(),
                schedule_effective_date: schedule.effective_date(),
                result: audited.result,
                audit_trace: audited.audit_trace,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(calculation),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll tax rejected");
            let api_error: ApiErrorResponse = err.into();
            api_error.into_response()
        }
    }
}

/// Handler for POST /payroll-run.
///
/// Computes every employee in the run against one schedule. A single invalid
/// employee rejects the whole run so that no partial run is persisted.
async fn payroll_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> Response {
    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, "Processing payroll run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return ApiErrorResponse::bad_request(rejection_to_error(rejection, run_id))
                .into_response();
        }
    };

    if request.employees.is_empty() {
        return ApiErrorResponse::bad_request(ApiError::validation_error(
            "employees must contain at least one employee",
        ))
        .into_response();
    }

    let schedule = match resolve_schedule(&state, request.jurisdiction.as_deref(), request.pay_date)
    {
        Ok(schedule) => schedule,
        Err(err) => {
            warn!(run_id = %run_id, error = %err, "Schedule lookup failed");
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response();
        }
    };

    let start_time = Instant::now();
    let mut lines = Vec::with_capacity(request.employees.len());
    for employee in request.employees {
        match compute_payroll_tax(schedule, employee.gross_pay, employee.other_deductions) {
            Ok(result) => lines.push(PayrollRunLine {
                employee_id: employee.employee_id,
                result,
            }),
            Err(err) => {
                warn!(
                    run_id = %run_id,
                    employee_id = %employee.employee_id,
                    error = %err,
                    "Payroll run rejected"
                );
                let mut response: ApiErrorResponse = err.into();
                response.error.message =
                    format!("Employee '{}': {}", employee.employee_id, response.error.message);
                return response.into_response();
            }
        }
    }

    let totals = match PayrollRunTotals::from_lines(&lines) {
        Ok(totals) => totals,
        Err(err) => {
            warn!(run_id = %run_id, error = %err, "Payroll run totals rejected");
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response();
        }
    };
    info!(
        run_id = %run_id,
        jurisdiction = schedule.jurisdiction(),
        employees = totals.employee_count,
        gross_pay = %totals.gross_pay,
        net_pay = %totals.net_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll run computed"
    );

    let result = PayrollRunResult {
        run_id,
        jurisdiction: schedule.jurisdiction().to_string(),
        schedule_effective_date: schedule.effective_date(),
        lines,
        totals,
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(result),
    )
        .into_response()
}

/// Picks the schedule for the requested (or default) jurisdiction on the
/// requested pay date (or today).
fn resolve_schedule<'a>(
    state: &'a AppState,
    jurisdiction: Option<&str>,
    pay_date: Option<NaiveDate>,
) -> EngineResult<&'a StatutorySchedule> {
    let code = jurisdiction.unwrap_or_else(|| state.default_jurisdiction());
    let date = pay_date.unwrap_or_else(|| Utc::now().date_naive());
    state.config().schedule_for(code, date)
}

/// Converts a JSON extraction failure into an API error body.
fn rejection_to_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

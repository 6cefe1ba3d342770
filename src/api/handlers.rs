//! HTTP request handlers for the levy engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::error::Error as _;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonDataError, JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::personal_allowance;
use crate::models::{PayrollRequest, VehicleImportRequest};

use super::request::{IncreaseCalculationRequest, TaxThresholdQuery};
use super::response::{
    ApiError, ApiErrorResponse, DataResponse, ImportResponse, JurisdictionSummary, TaxThreshold,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate-import", post(calculate_import_handler))
        .route("/calculate-salary", post(calculate_salary_handler))
        .route(
            "/calculate-salary-increase",
            post(calculate_salary_increase_handler),
        )
        .route("/tax-threshold", get(tax_threshold_handler))
        .route("/jurisdiction", get(jurisdiction_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a body rejection to a 400 response.
///
/// Well-formed JSON that does not fit the request type (missing field, wrong
/// type, negative count) is a validation error; anything else is malformed.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            match rejected_field(&err) {
                Some(field) => ApiError::validation_error(field, body_text),
                None => ApiError::new("VALIDATION_ERROR", body_text),
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
    };
    error_response(ApiErrorResponse::bad_request(error))
}

/// Names the request field a body deserialization error points at.
///
/// Nested fields are dotted and list entries indexed, e.g.
/// `current.gross_pay` or `taxable_allowances[1]`.
fn rejected_field(err: &JsonDataError) -> Option<String> {
    let error = err
        .source()?
        .source()?
        .downcast_ref::<serde_path_to_error::Error<serde_json::Error>>()?;

    let path = error.path().to_string();
    let parent = (path != "." && path != "?").then_some(path);
    let missing = error.inner().to_string();
    let missing = missing
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());

    match (parent, missing) {
        (Some(parent), Some(name)) => Some(format!("{}.{}", parent, name)),
        (Some(parent), None) => Some(parent),
        (None, Some(name)) => Some(name.to_string()),
        (None, None) => None,
    }
}

/// Handler for POST /calculate-import.
async fn calculate_import_handler(
    State(state): State<AppState>,
    payload: Result<Json<VehicleImportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing vehicle import request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match state.engine().compute_vehicle_import_with_trace(&request) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                fuel_type = %request.fuel_type,
                age_category = %request.age_category,
                engine_cc = request.engine_cc,
                total_cost = %outcome.result.total_cost,
                duration_us = start_time.elapsed().as_micros(),
                "Vehicle import calculation completed"
            );
            json_response(
                StatusCode::OK,
                ImportResponse::new(outcome.result, outcome.audit_trace),
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Vehicle import calculation failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /calculate-salary.
async fn calculate_salary_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match state.engine().compute_payroll_with_trace(&request) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                gross_pay = %outcome.result.gross_pay,
                net_pay = %outcome.result.net_pay,
                warnings = outcome.audit_trace.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Salary calculation completed"
            );
            json_response(
                StatusCode::OK,
                DataResponse::new(outcome.result, outcome.audit_trace),
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Salary calculation failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /calculate-salary-increase.
async fn calculate_salary_increase_handler(
    State(state): State<AppState>,
    payload: Result<Json<IncreaseCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary increase request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match state
        .engine()
        .project_increase_with_trace(&request.current, &request.increase)
    {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                increase_percentage = %request.increase.increase_percentage,
                taxable = request.increase.is_increase_taxable,
                monthly_difference = %outcome.result.monthly_difference,
                duration_us = start_time.elapsed().as_micros(),
                "Salary increase projection completed"
            );
            json_response(
                StatusCode::OK,
                DataResponse::new(outcome.result, outcome.audit_trace),
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Salary increase projection failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for GET /tax-threshold.
///
/// Feeds the salary form's live threshold display as dependents change.
async fn tax_threshold_handler(
    State(state): State<AppState>,
    query: Result<Query<TaxThresholdQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Invalid tax threshold query");
            return error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
                "num_children",
                rejection.body_text(),
            )));
        }
    };

    let payroll = state.engine().config().payroll();
    let allowance = personal_allowance(payroll, query.num_children);
    let threshold = TaxThreshold {
        num_children: query.num_children,
        paye_threshold: payroll.paye_threshold,
        child_allowance: allowance - payroll.paye_threshold,
        personal_allowance: allowance,
    };

    json_response(StatusCode::OK, DataResponse::untraced(threshold))
}

/// Handler for GET /jurisdiction.
async fn jurisdiction_handler(State(state): State<AppState>) -> Response {
    let config = state.engine().config();
    let summary = JurisdictionSummary {
        metadata: config.metadata().clone(),
        bracket_version: config.brackets().version().to_string(),
    };

    json_response(StatusCode::OK, DataResponse::untraced(summary))
}

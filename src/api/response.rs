//! Response types for the levy engine API.
//!
//! This module defines the success envelopes, the error response structure
//! and the mapping from engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use rust_decimal::Decimal;

use crate::config::JurisdictionMetadata;
use crate::error::EngineError;
use crate::models::{AuditTrace, VehicleImportResult};

/// Success body for `/calculate-import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Always `true`.
    pub success: bool,
    /// The tax breakdown in base currency.
    pub calculations: VehicleImportResult,
    /// The same breakdown divided by the request's exchange rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_currency: Option<VehicleImportResult>,
    /// The rules applied.
    pub audit_trace: AuditTrace,
}

impl ImportResponse {
    /// Wraps a vehicle import result.
    pub fn new(calculations: VehicleImportResult, audit_trace: AuditTrace) -> Self {
        Self {
            success: true,
            quote_currency: calculations.in_quote_currency(),
            calculations,
            audit_trace,
        }
    }
}

/// Success body for the payroll endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// The calculation result.
    pub data: T,
    /// The rules applied, when the endpoint runs a calculation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_trace: Option<AuditTrace>,
}

impl<T> DataResponse<T> {
    /// Wraps a calculation result and its trace.
    pub fn new(data: T, audit_trace: AuditTrace) -> Self {
        Self {
            success: true,
            data,
            audit_trace: Some(audit_trace),
        }
    }

    /// Wraps a lookup result that has no trace.
    pub fn untraced(data: T) -> Self {
        Self {
            success: true,
            data,
            audit_trace: None,
        }
    }
}

/// Body of `/tax-threshold`: the personal allowance for a dependents count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxThreshold {
    /// Number of dependent children.
    pub num_children: u32,
    /// Base tax-free threshold.
    pub paye_threshold: Decimal,
    /// Dependents component.
    pub child_allowance: Decimal,
    /// Threshold plus dependents component.
    pub personal_allowance: Decimal,
}

/// Body of `/jurisdiction`: which rate set the server is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionSummary {
    /// Jurisdiction metadata.
    #[serde(flatten)]
    pub metadata: JurisdictionMetadata,
    /// Version of the vehicle duty schedule.
    pub bracket_version: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `false`.
    pub success: bool,
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    #[serde(rename = "error")]
    pub message: String,
    /// The offending request field, for validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            field: None,
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error naming the offending field.
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::new("VALIDATION_ERROR", message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying the given error.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::ConfigInvalid { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::Validation { field, message } => {
                ApiErrorResponse::bad_request(ApiError::validation_error(field, message))
            }
            EngineError::UnsupportedConfiguration { dimension, .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError {
                    field: Some(dimension),
                    ..ApiError::new("UNSUPPORTED_CONFIGURATION", message)
                },
            },
            EngineError::Precondition { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("PRECONDITION_FAILED", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"error\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
        assert!(!json.contains("field"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_validation_error_maps_to_400_with_field() {
        let api_error: ApiErrorResponse =
            EngineError::validation("cif_value", "must not be negative").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
        assert_eq!(api_error.error.field.as_deref(), Some("cif_value"));
        assert_eq!(api_error.error.message, "must not be negative");
    }

    #[test]
    fn test_unsupported_configuration_maps_to_422() {
        let api_error: ApiErrorResponse = EngineError::UnsupportedConfiguration {
            dimension: "engine_cc".to_string(),
            value: "1900".to_string(),
            message: "gap".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "UNSUPPORTED_CONFIGURATION");
        assert_eq!(api_error.error.field.as_deref(), Some("engine_cc"));
    }

    #[test]
    fn test_precondition_maps_to_422() {
        let api_error: ApiErrorResponse = EngineError::Precondition {
            message: "no baseline salary computed".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "PRECONDITION_FAILED");
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "payroll.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
        assert!(api_error.error.details.unwrap().contains("payroll.yaml"));
    }
}

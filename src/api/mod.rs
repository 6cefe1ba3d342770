//! HTTP API module for the levy engine.
//!
//! This module exposes the vehicle import, salary and salary increase
//! calculators as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{IncreaseCalculationRequest, TaxThresholdQuery};
pub use response::{
    ApiError, DataResponse, ImportResponse, JurisdictionSummary, TaxThreshold,
};
pub use state::AppState;

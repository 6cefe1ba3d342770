//! The engine facade.
//!
//! [`LevyEngine`] owns a loaded [`LevyConfig`] and exposes the three
//! calculators as methods, so callers do not have to pick the right slice of
//! configuration for each one.

use std::path::Path;

use crate::calculation::{
    IncreaseOutcome, PayrollOutcome, VehicleDutyOutcome, compute_payroll, compute_vehicle_import,
    project_increase,
};
use crate::config::{ConfigLoader, LevyConfig};
use crate::error::EngineResult;
use crate::models::{
    IncreaseRequest, IncreaseResult, PayrollRequest, PayrollResult, VehicleImportRequest,
    VehicleImportResult,
};

/// A jurisdiction's calculators bound to its configuration.
///
/// The engine holds no mutable state; share it behind an `Arc` to serve
/// concurrent requests.
///
/// # Example
///
/// ```
/// use levy_engine::engine::LevyEngine;
/// use levy_engine::models::PayrollRequest;
/// use rust_decimal::Decimal;
///
/// let engine = LevyEngine::load("config/gy_2024").unwrap();
/// let result = engine
///     .compute_payroll(&PayrollRequest {
///         basic_salary: Decimal::new(150_000, 0),
///         ..Default::default()
///     })
///     .unwrap();
/// assert_eq!(result.nis_contribution, Decimal::new(8_400, 0));
/// ```
#[derive(Debug, Clone)]
pub struct LevyEngine {
    config: LevyConfig,
}

impl LevyEngine {
    /// Creates an engine from validated configuration.
    pub fn new(config: LevyConfig) -> Self {
        Self { config }
    }

    /// Loads configuration from a directory and creates an engine from it.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Ok(Self::new(ConfigLoader::load(path)?.into_config()))
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &LevyConfig {
        &self.config
    }

    /// Calculates the taxes owed on a vehicle import.
    pub fn compute_vehicle_import(
        &self,
        request: &VehicleImportRequest,
    ) -> EngineResult<VehicleImportResult> {
        self.compute_vehicle_import_with_trace(request)
            .map(|outcome| outcome.result)
    }

    /// Calculates the taxes owed on a vehicle import, with the audit trace.
    pub fn compute_vehicle_import_with_trace(
        &self,
        request: &VehicleImportRequest,
    ) -> EngineResult<VehicleDutyOutcome> {
        compute_vehicle_import(request, self.config.brackets())
    }

    /// Calculates the monthly payroll breakdown.
    pub fn compute_payroll(&self, request: &PayrollRequest) -> EngineResult<PayrollResult> {
        self.compute_payroll_with_trace(request)
            .map(|outcome| outcome.result)
    }

    /// Calculates the monthly payroll breakdown, with the audit trace.
    pub fn compute_payroll_with_trace(
        &self,
        request: &PayrollRequest,
    ) -> EngineResult<PayrollOutcome> {
        compute_payroll(request, self.config.payroll())
    }

    /// Projects a salary change onto a computed payroll result.
    pub fn project_increase(
        &self,
        current: &PayrollResult,
        increase: &IncreaseRequest,
    ) -> EngineResult<IncreaseResult> {
        self.project_increase_with_trace(current, increase)
            .map(|outcome| outcome.result)
    }

    /// Projects a salary change, with the audit trace.
    pub fn project_increase_with_trace(
        &self,
        current: &PayrollResult,
        increase: &IncreaseRequest,
    ) -> EngineResult<IncreaseOutcome> {
        project_increase(current, increase, self.config.payroll())
    }
}

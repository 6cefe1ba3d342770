//! Core data models for the levy engine.
//!
//! This module contains the request and result records the engines consume
//! and produce, plus the audit trace records.

mod audit;
mod increase;
mod payroll;
mod vehicle;

pub use audit::{AuditStep, AuditTrace, AuditWarning, Severity};
pub use increase::{IncreaseRequest, IncreaseResult};
pub use payroll::{PayrollRequest, PayrollResult};
pub use vehicle::{
    AgeCategory, FuelType, PlateType, Propulsion, VehicleImportRequest, VehicleImportResult,
};

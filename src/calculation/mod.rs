//! Calculation logic for the levy engine.
//!
//! This module contains the pure calculation functions: bracket resolution,
//! monetary rounding, vehicle import duty, monthly payroll and salary
//! increase projection. Every function takes its configuration by
//! reference and returns a result together with an audit trace.

mod bracket;
mod payroll_tax;
mod rounding;
mod salary_increase;
mod vehicle_duty;

pub use bracket::{Tiered, resolve_tier};
pub use payroll_tax::{PayrollOutcome, compute_payroll, personal_allowance};
pub use rounding::{MAX_MONETARY_AMOUNT, MONEY_DECIMAL_PLACES, round_money};
pub use salary_increase::{IncreaseOutcome, project_increase};
pub use vehicle_duty::{VehicleDutyOutcome, compute_vehicle_import};

//! Levy Engine: vehicle import duty and payroll tax calculation
//!
//! This crate resolves tiered, rule-based tax schedules: duty, excise and VAT
//! on imported vehicles keyed by engine size, fuel type and age, and monthly
//! payroll deductions (NIS, PAYE, insurance) with gratuity and salary increase
//! projection. Rates and brackets are loaded from versioned YAML files.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

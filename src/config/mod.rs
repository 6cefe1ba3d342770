//! Configuration loading and management for the levy engine.
//!
//! This module loads a jurisdiction's payroll parameters and vehicle duty
//! bracket schedule from YAML files and checks their invariants.
//!
//! # Example
//!
//! ```no_run
//! use levy_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/gy_2024").unwrap();
//! println!("Loaded jurisdiction: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BracketTable, BracketTableConfig, JurisdictionConfig, JurisdictionMetadata, LevyConfig,
    VehicleDutyBracket,
};

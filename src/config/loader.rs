//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a
//! jurisdiction's rate set from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    BracketTable, BracketTableConfig, JurisdictionConfig, JurisdictionMetadata, LevyConfig,
};

/// Loads and provides access to a jurisdiction's configuration.
///
/// # Directory Structure
///
/// ```text
/// config/gy_2024/
/// ├── jurisdiction.yaml   # Jurisdiction metadata and version
/// ├── payroll.yaml        # PAYE, NIS, insurance and gratuity parameters
/// └── vehicle_duty.yaml   # Vehicle duty bracket schedule
/// ```
///
/// Every file is validated on load, so a loaded configuration is safe to
/// share read-only between concurrent calculations.
///
/// # Example
///
/// ```no_run
/// use levy_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/gy_2024").unwrap();
/// println!("Loaded rate set: {}", loader.metadata().version);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LevyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - A rate, cap or bracket breaks an invariant (`ConfigInvalid`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let payroll = Self::load_yaml::<JurisdictionConfig>(&path.join("payroll.yaml"))?;
        let table_config =
            Self::load_yaml::<BracketTableConfig>(&path.join("vehicle_duty.yaml"))?;
        let brackets = BracketTable::new(table_config)?;

        let config = LevyConfig::new(metadata, payroll, brackets)?;
        debug!(
            jurisdiction = %config.metadata().code,
            version = %config.metadata().version,
            bracket_version = %config.brackets().version(),
            "Configuration loaded"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &LevyConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> LevyConfig {
        self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        self.config.metadata()
    }

    /// Returns the payroll tax parameters.
    pub fn payroll(&self) -> &JurisdictionConfig {
        self.config.payroll()
    }

    /// Returns the vehicle duty schedule.
    pub fn brackets(&self) -> &BracketTable {
        self.config.brackets()
    }
}

//! Error types for the levy engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engines and the configuration loader can report.

use thiserror::Error;

/// The main error type for the levy engine.
///
/// Engine calls either return a complete result or one of these variants;
/// nothing is coerced to zero on the way.
///
/// # Example
///
/// ```
/// use levy_engine::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "cif_value".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid field 'cif_value': must not be negative");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but breaks one of its invariants.
    #[error("Invalid configuration '{path}': {message}")]
    ConfigInvalid {
        /// The file or configuration key at fault.
        path: String,
        /// Which invariant was broken.
        message: String,
    },

    /// A request field is negative, out of range or not recognised.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field name.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A well-formed request falls outside every configured bracket.
    #[error("No configured bracket for {dimension} '{value}': {message}")]
    UnsupportedConfiguration {
        /// The request dimension that could not be matched (e.g. "fuel_type").
        dimension: String,
        /// The value of that dimension.
        value: String,
        /// Additional context about the lookup.
        message: String,
    },

    /// An operation was called before its prerequisite was computed.
    #[error("Precondition failed: {message}")]
    Precondition {
        /// A description of the missing prerequisite.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_config_invalid_displays_path_and_message() {
        let error = EngineError::ConfigInvalid {
            path: "payroll.nis_rate".to_string(),
            message: "rate must be between 0 and 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration 'payroll.nis_rate': rate must be between 0 and 1"
        );
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::validation("basic_salary", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid field 'basic_salary': must not be negative"
        );
    }

    #[test]
    fn test_unsupported_configuration_names_dimension() {
        let error = EngineError::UnsupportedConfiguration {
            dimension: "fuel_type".to_string(),
            value: "electric".to_string(),
            message: "no bracket group for age category 'under_4y'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No configured bracket for fuel_type 'electric': no bracket group for age category 'under_4y'"
        );
    }

    #[test]
    fn test_precondition_displays_message() {
        let error = EngineError::Precondition {
            message: "no baseline salary computed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Precondition failed: no baseline salary computed"
        );
    }

    #[test]
    fn test_validation_and_unsupported_are_distinguishable() {
        let validation = EngineError::validation("fuel_type", "unknown");
        let unsupported = EngineError::UnsupportedConfiguration {
            dimension: "fuel_type".to_string(),
            value: "electric".to_string(),
            message: String::new(),
        };
        assert_ne!(validation, unsupported);
        assert!(matches!(validation, EngineError::Validation { .. }));
        assert!(matches!(
            unsupported,
            EngineError::UnsupportedConfiguration { .. }
        ));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_precondition() -> EngineResult<()> {
            Err(EngineError::Precondition {
                message: "test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_precondition()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}

//! Audit trace models for the levy engine.
//!
//! Every engine call records the rules it applied as a sequence of
//! [`AuditStep`]s. The trace holds no clock readings or random ids, so two
//! identical calls produce identical traces.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The configuration key the rule read its parameters from.
    pub config_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// How much attention a warning deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A statutory cap applied as designed.
    Info,
    /// A figure was clamped or came out negative.
    Warning,
}

/// A warning generated during calculation.
///
/// Warnings flag caps and clamps that changed a figure without making the
/// calculation fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level, `info` or `warning` on the wire.
    pub severity: Severity,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use levy_engine::models::AuditTrace;
///
/// let mut trace = AuditTrace::default();
/// trace.record(
///     "gross_pay",
///     "Gross Pay",
///     "request",
///     serde_json::json!({ "basic_salary": "150000" }),
///     serde_json::json!({ "gross_pay": "150000" }),
///     "150000 + 0 = 150000",
/// );
/// assert_eq!(trace.steps[0].step_number, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Appends a step, numbering it after the steps already recorded.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        config_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            config_ref: config_ref.to_string(),
            input,
            output,
            reasoning: reasoning.into(),
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>, severity: Severity) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message: message.into(),
            severity,
        });
    }

    /// Appends every step and warning of `other`, renumbering its steps.
    pub fn extend(&mut self, other: AuditTrace) {
        for step in other.steps {
            let step_number = self.steps.len() as u32 + 1;
            self.steps.push(AuditStep {
                step_number,
                ..step
            });
        }
        self.warnings.extend(other.warnings);
    }

    /// Returns true if a warning with the given code was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

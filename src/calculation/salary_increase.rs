//! Salary increase projection.
//!
//! Projects a percentage change onto a baseline [`PayrollResult`] and
//! reports the difference.
//!
//! A taxable increase is treated as new basic salary. A tax-free increase is
//! added on top of the baseline result as given: gross and net pay both rise
//! by the increase, while NIS, insurance, chargeable income and PAYE stay
//! where they were.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::JurisdictionConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, IncreaseRequest, IncreaseResult, PayrollRequest, PayrollResult, Severity,
};

use super::payroll_tax::compute_payroll;
use super::rounding::{MAX_MONETARY_AMOUNT, check_amount, round_money};

/// The result of a salary increase projection, with its audit trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseOutcome {
    /// The projected payroll and differences.
    pub result: IncreaseResult,
    /// The rules applied, including the nested payroll calculation.
    pub audit_trace: AuditTrace,
}

/// Projects a percentage change onto a computed salary.
///
/// # Arguments
///
/// * `current` - The baseline payroll result
/// * `increase` - The percentage change and its tax treatment
/// * `config` - The jurisdiction's payroll parameters
///
/// # Returns
///
/// An [`IncreaseOutcome`], or:
/// - `Precondition` if the baseline has no positive gross pay
/// - `Validation` if `current_gross_pay` does not match the baseline, the
///   percentage is below -100, or a baseline or projected amount is above
///   [`MAX_MONETARY_AMOUNT`]
///
/// # Examples
///
/// ```
/// use levy_engine::calculation::{compute_payroll, project_increase};
/// use levy_engine::config::ConfigLoader;
/// use levy_engine::models::{IncreaseRequest, PayrollRequest};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/gy_2024").unwrap();
/// let current = compute_payroll(
///     &PayrollRequest { basic_salary: Decimal::new(150_000, 0), ..Default::default() },
///     loader.payroll(),
/// )
/// .unwrap()
/// .result;
///
/// let increase = IncreaseRequest {
///     current_gross_pay: current.gross_pay,
///     increase_percentage: Decimal::new(10, 0),
///     is_increase_taxable: true,
///     num_children: 0,
/// };
///
/// let outcome = project_increase(&current, &increase, loader.payroll()).unwrap();
/// assert_eq!(outcome.result.new_gross_pay, Decimal::new(165_000, 0));
/// assert_eq!(outcome.result.monthly_difference, Decimal::new(10_620, 0));
/// ```
pub fn project_increase(
    current: &PayrollResult,
    increase: &IncreaseRequest,
    config: &JurisdictionConfig,
) -> EngineResult<IncreaseOutcome> {
    if current.gross_pay <= Decimal::ZERO {
        return Err(EngineError::Precondition {
            message: "no baseline salary computed".to_string(),
        });
    }
    validate_baseline(current)?;
    if increase.current_gross_pay != current.gross_pay {
        return Err(EngineError::validation(
            "current_gross_pay",
            format!(
                "{} does not match the baseline gross pay of {}",
                increase.current_gross_pay, current.gross_pay
            ),
        ));
    }
    if increase.increase_percentage < -Decimal::ONE_HUNDRED {
        return Err(EngineError::validation(
            "increase_percentage",
            "must not be below -100",
        ));
    }

    let multiplier = Decimal::ONE + increase.increase_percentage / Decimal::ONE_HUNDRED;
    let new_gross = current
        .gross_pay
        .checked_mul(multiplier)
        .filter(|gross| *gross <= MAX_MONETARY_AMOUNT)
        .ok_or_else(|| {
            EngineError::validation(
                "increase_percentage",
                format!(
                    "out of range, projected gross pay must not exceed {}",
                    MAX_MONETARY_AMOUNT
                ),
            )
        })?;

    let mut trace = AuditTrace::default();
    trace.record(
        "new_gross_pay",
        "Projected Gross Pay",
        "request.increase_percentage",
        serde_json::json!({
            "current_gross_pay": current.gross_pay.to_string(),
            "increase_percentage": increase.increase_percentage.normalize().to_string(),
            "is_increase_taxable": increase.is_increase_taxable
        }),
        serde_json::json!({ "new_gross_pay": new_gross.normalize().to_string() }),
        format!(
            "${} x (1 + {}/100) = ${}",
            current.gross_pay.normalize(),
            increase.increase_percentage.normalize(),
            new_gross.normalize()
        ),
    );

    let projected = if increase.is_increase_taxable {
        let outcome = compute_payroll(&salary_only(new_gross, increase.num_children), config)?;
        trace.extend(outcome.audit_trace);
        outcome.result
    } else {
        add_untaxed(current, round_money(new_gross), config, &mut trace)
    };

    let increase_amount = projected.gross_pay - current.gross_pay;
    let monthly_difference = projected.net_pay - current.net_pay;
    let result = IncreaseResult::new(&projected, increase_amount, monthly_difference);

    trace.record(
        "increase_difference",
        "Increase Difference",
        "request.current_gross_pay",
        serde_json::json!({
            "current_net_pay": current.net_pay.to_string(),
            "new_net_pay": projected.net_pay.to_string()
        }),
        serde_json::json!({
            "increase_amount": result.increase_amount.to_string(),
            "monthly_difference": result.monthly_difference.to_string(),
            "annual_difference": result.annual_difference.to_string()
        }),
        format!(
            "Net pay changes by ${} per month, ${} per year",
            result.monthly_difference.normalize(),
            result.annual_difference.normalize()
        ),
    );

    Ok(IncreaseOutcome {
        result,
        audit_trace: trace,
    })
}

/// Bounds the baseline figures the projection does arithmetic on.
fn validate_baseline(current: &PayrollResult) -> EngineResult<()> {
    check_amount("current.gross_pay", current.gross_pay)?;
    check_amount("current.net_pay", current.net_pay.abs())?;
    check_amount("current.voluntary_deductions", current.voluntary_deductions)
}

/// A request carrying only basic salary and dependents.
fn salary_only(basic_salary: Decimal, num_children: u32) -> PayrollRequest {
    PayrollRequest {
        basic_salary,
        num_children,
        ..Default::default()
    }
}

/// Lifts the baseline to `new_gross` without touching its deductions.
///
/// NIS, insurance, chargeable income and PAYE are carried over from
/// `baseline` as computed, so net pay moves by exactly the increase.
fn add_untaxed(
    baseline: &PayrollResult,
    new_gross: Decimal,
    config: &JurisdictionConfig,
    trace: &mut AuditTrace,
) -> PayrollResult {
    let delta = new_gross - baseline.gross_pay;
    let net_pay = baseline.net_pay + delta;
    let monthly_gratuity = round_money(new_gross * config.gratuity_monthly_fraction);

    if net_pay < Decimal::ZERO {
        trace.warn(
            "NEGATIVE_NET_PAY",
            format!(
                "Tax-free reduction leaves net pay at ${}",
                net_pay.normalize()
            ),
            Severity::Warning,
        );
    }

    trace.record(
        "tax_free_increase",
        "Tax-Free Increase",
        "request.is_increase_taxable",
        serde_json::json!({
            "baseline_gross_pay": baseline.gross_pay.to_string(),
            "baseline_net_pay": baseline.net_pay.to_string(),
            "baseline_chargeable_income": baseline.chargeable_income.to_string(),
            "baseline_paye_tax": baseline.paye_tax.to_string(),
            "increase": delta.to_string()
        }),
        serde_json::json!({
            "new_gross_pay": new_gross.to_string(),
            "new_net_pay": net_pay.to_string(),
            "new_monthly_gratuity": monthly_gratuity.to_string()
        }),
        format!(
            "${} added untaxed; deductions stay at ${}",
            delta.normalize(),
            baseline.total_deductions.normalize()
        ),
    );

    PayrollResult {
        gross_pay: new_gross,
        net_pay,
        take_home_pay: net_pay - baseline.voluntary_deductions,
        monthly_gratuity,
        semi_annual_gratuity: monthly_gratuity * Decimal::from(6),
        annual_gratuity: monthly_gratuity * Decimal::from(12),
        ..baseline.clone()
    }
}

//! Monthly payroll calculation.
//!
//! Computes gross pay, NIS, insurance, PAYE, net pay and gratuity for one
//! month of income.
//!
//! ## Order of operations
//!
//! 1. Split overtime and second-job income at their exemption caps
//! 2. Sum gross pay
//! 3. Personal allowance = threshold + children × child allowance
//! 4. NIS on gross pay up to the NIS ceiling
//! 5. Insurance premium, clamped to the percentage and absolute maxima
//! 6. Chargeable income = taxable income − allowance − NIS − insurance, floored at zero
//! 7. PAYE at the flat rate
//! 8. Net pay, gratuity and voluntary deductions
//!
//! Intermediate values keep full precision. Each reported component is
//! rounded once, and the totals are summed from the rounded components.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::JurisdictionConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, PayrollRequest, PayrollResult, Severity};

use super::rounding::{check_amount, round_money};

/// Months in a semi-annual gratuity period.
const SEMI_ANNUAL_MONTHS: u32 = 6;

/// Months in an annual gratuity period.
const ANNUAL_MONTHS: u32 = 12;

/// The result of a payroll calculation, with its audit trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollOutcome {
    /// The payroll breakdown.
    pub result: PayrollResult,
    /// The rules applied to reach it.
    pub audit_trace: AuditTrace,
}

/// Returns the tax-free threshold for the given number of dependents.
///
/// # Examples
///
/// ```
/// use levy_engine::calculation::personal_allowance;
/// use levy_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/gy_2024").unwrap();
/// assert_eq!(personal_allowance(loader.payroll(), 0), Decimal::new(130_000, 0));
/// assert_eq!(personal_allowance(loader.payroll(), 2), Decimal::new(150_000, 0));
/// ```
pub fn personal_allowance(config: &JurisdictionConfig, num_children: u32) -> Decimal {
    config.paye_threshold + child_allowance(config, num_children)
}

fn child_allowance(config: &JurisdictionConfig, num_children: u32) -> Decimal {
    Decimal::from(num_children) * config.child_allowance_per_dependent
}

/// Splits an amount at an exemption cap into (tax-free, taxable).
fn split_at_cap(amount: Decimal, cap: Decimal) -> (Decimal, Decimal) {
    let tax_free = amount.min(cap);
    let taxable = (amount - tax_free).max(Decimal::ZERO);
    (tax_free, taxable)
}

/// Calculates the monthly payroll breakdown.
///
/// # Arguments
///
/// * `request` - The month's income, dependents and deductions
/// * `config` - The jurisdiction's payroll parameters
///
/// # Returns
///
/// A [`PayrollOutcome`] whose result satisfies
/// `net_pay == gross_pay - total_deductions` exactly, or a `Validation`
/// error if a monetary input is negative or above
/// [`MAX_MONETARY_AMOUNT`](super::MAX_MONETARY_AMOUNT), or the insurance plan
/// id is not configured.
///
/// # Examples
///
/// ```
/// use levy_engine::calculation::compute_payroll;
/// use levy_engine::config::ConfigLoader;
/// use levy_engine::models::PayrollRequest;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/gy_2024").unwrap();
/// let request = PayrollRequest {
///     basic_salary: Decimal::new(150_000, 0),
///     ..Default::default()
/// };
///
/// let outcome = compute_payroll(&request, loader.payroll()).unwrap();
/// assert_eq!(outcome.result.paye_tax, Decimal::new(2_900, 0));
/// assert_eq!(outcome.result.net_pay, Decimal::new(138_700, 0));
/// ```
pub fn compute_payroll(
    request: &PayrollRequest,
    config: &JurisdictionConfig,
) -> EngineResult<PayrollOutcome> {
    validate_request(request)?;

    let mut trace = AuditTrace::default();

    // Step 1: exemption caps
    let (overtime_tax_free, overtime_taxable) =
        split_at_cap(request.overtime_amount, config.overtime_exemption_cap);
    let (second_job_tax_free, second_job_taxable) =
        split_at_cap(request.second_job_income, config.second_job_exemption_cap);

    if !request.overtime_amount.is_zero() || !request.second_job_income.is_zero() {
        trace.record(
            "exemption_caps",
            "Overtime and Second Job Exemptions",
            "payroll.overtime_exemption_cap",
            serde_json::json!({
                "overtime_amount": request.overtime_amount.normalize().to_string(),
                "overtime_exemption_cap": config.overtime_exemption_cap.normalize().to_string(),
                "second_job_income": request.second_job_income.normalize().to_string(),
                "second_job_exemption_cap": config.second_job_exemption_cap.normalize().to_string()
            }),
            serde_json::json!({
                "overtime_tax_free": overtime_tax_free.normalize().to_string(),
                "overtime_taxable": overtime_taxable.normalize().to_string(),
                "second_job_tax_free": second_job_tax_free.normalize().to_string(),
                "second_job_taxable": second_job_taxable.normalize().to_string()
            }),
            format!(
                "Overtime ${} tax-free, ${} taxable; second job ${} tax-free, ${} taxable",
                overtime_tax_free.normalize(),
                overtime_taxable.normalize(),
                second_job_tax_free.normalize(),
                second_job_taxable.normalize()
            ),
        );
    }

    // Step 2: gross pay
    let taxable_allowances = request.total_taxable_allowances();
    let non_taxable_allowances = request.total_non_taxable_allowances();
    let gross_pay = request.basic_salary
        + taxable_allowances
        + non_taxable_allowances
        + request.overtime_amount
        + request.second_job_income;

    trace.record(
        "gross_pay",
        "Gross Pay",
        "request",
        serde_json::json!({
            "basic_salary": request.basic_salary.normalize().to_string(),
            "taxable_allowances": taxable_allowances.normalize().to_string(),
            "non_taxable_allowances": non_taxable_allowances.normalize().to_string(),
            "overtime_amount": request.overtime_amount.normalize().to_string(),
            "second_job_income": request.second_job_income.normalize().to_string()
        }),
        serde_json::json!({ "gross_pay": gross_pay.normalize().to_string() }),
        format!("Gross pay ${}", gross_pay.normalize()),
    );

    // Step 3: personal allowance
    let child_allowance = child_allowance(config, request.num_children);
    let personal_allowance = config.paye_threshold + child_allowance;

    trace.record(
        "personal_allowance",
        "Personal Allowance",
        "payroll.paye_threshold",
        serde_json::json!({
            "paye_threshold": config.paye_threshold.normalize().to_string(),
            "num_children": request.num_children,
            "child_allowance_per_dependent": config.child_allowance_per_dependent.normalize().to_string()
        }),
        serde_json::json!({
            "child_allowance": child_allowance.normalize().to_string(),
            "personal_allowance": personal_allowance.normalize().to_string()
        }),
        format!(
            "${} + {} x ${} = ${}",
            config.paye_threshold.normalize(),
            request.num_children,
            config.child_allowance_per_dependent.normalize(),
            personal_allowance.normalize()
        ),
    );

    // Step 4: NIS
    let insurable_earnings = gross_pay.min(config.nis_cap);
    let nis_contribution = insurable_earnings * config.nis_rate;

    if gross_pay > config.nis_cap {
        trace.warn(
            "NIS_CAP_REACHED",
            format!(
                "Gross pay ${} exceeds the NIS ceiling of ${}; contribution capped",
                gross_pay.normalize(),
                config.nis_cap.normalize()
            ),
            Severity::Info,
        );
    }

    trace.record(
        "nis_contribution",
        "NIS Contribution",
        "payroll.nis_rate",
        serde_json::json!({
            "gross_pay": gross_pay.normalize().to_string(),
            "nis_cap": config.nis_cap.normalize().to_string(),
            "nis_rate": config.nis_rate.normalize().to_string()
        }),
        serde_json::json!({ "nis_contribution": nis_contribution.normalize().to_string() }),
        format!(
            "min(${}, ${}) x {} = ${}",
            gross_pay.normalize(),
            config.nis_cap.normalize(),
            config.nis_rate.normalize(),
            nis_contribution.normalize()
        ),
    );

    // Step 5: insurance
    let insurance_deduction = insurance_deduction(request, config, gross_pay, &mut trace)?;

    // Step 6: chargeable income
    let taxable_income_before_allowance =
        request.basic_salary + taxable_allowances + overtime_taxable + second_job_taxable;
    let chargeable_income = (taxable_income_before_allowance
        - personal_allowance
        - nis_contribution
        - insurance_deduction)
        .max(Decimal::ZERO);

    trace.record(
        "chargeable_income",
        "Chargeable Income",
        "payroll.paye_threshold",
        serde_json::json!({
            "taxable_income_before_allowance": taxable_income_before_allowance.normalize().to_string(),
            "personal_allowance": personal_allowance.normalize().to_string(),
            "nis_contribution": nis_contribution.normalize().to_string(),
            "insurance_deduction": insurance_deduction.normalize().to_string()
        }),
        serde_json::json!({ "chargeable_income": chargeable_income.normalize().to_string() }),
        format!(
            "max(0, ${} - ${} - ${} - ${}) = ${}",
            taxable_income_before_allowance.normalize(),
            personal_allowance.normalize(),
            nis_contribution.normalize(),
            insurance_deduction.normalize(),
            chargeable_income.normalize()
        ),
    );

    // Step 7: PAYE
    let paye_tax = chargeable_income * config.paye_rate;

    trace.record(
        "paye_tax",
        "PAYE Income Tax",
        "payroll.paye_rate",
        serde_json::json!({
            "chargeable_income": chargeable_income.normalize().to_string(),
            "paye_rate": config.paye_rate.normalize().to_string()
        }),
        serde_json::json!({ "paye_tax": paye_tax.normalize().to_string() }),
        format!(
            "${} x {} = ${}",
            chargeable_income.normalize(),
            config.paye_rate.normalize(),
            paye_tax.normalize()
        ),
    );

    // Step 8: totals from rounded components
    let gross_pay = round_money(gross_pay);
    let nis_contribution = round_money(nis_contribution);
    let insurance_deduction = round_money(insurance_deduction);
    let paye_tax = round_money(paye_tax);
    let total_deductions = nis_contribution + insurance_deduction + paye_tax;
    let net_pay = gross_pay - total_deductions;

    let monthly_gratuity = round_money(gross_pay * config.gratuity_monthly_fraction);
    let semi_annual_gratuity = monthly_gratuity * Decimal::from(SEMI_ANNUAL_MONTHS);
    let annual_gratuity = monthly_gratuity * Decimal::from(ANNUAL_MONTHS);

    let voluntary_deductions =
        round_money(request.loan_deduction) + round_money(request.gpsu_deduction);
    let take_home_pay = net_pay - voluntary_deductions;

    if take_home_pay < Decimal::ZERO {
        trace.warn(
            "NEGATIVE_TAKE_HOME",
            format!(
                "Voluntary deductions of ${} exceed net pay of ${}",
                voluntary_deductions.normalize(),
                net_pay.normalize()
            ),
            Severity::Warning,
        );
    }

    trace.record(
        "net_pay",
        "Net Pay",
        "payroll.gratuity_monthly_fraction",
        serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "total_deductions": total_deductions.to_string(),
            "voluntary_deductions": voluntary_deductions.to_string()
        }),
        serde_json::json!({
            "net_pay": net_pay.to_string(),
            "take_home_pay": take_home_pay.to_string(),
            "monthly_gratuity": monthly_gratuity.to_string()
        }),
        format!(
            "${} gross - ${} deductions = ${} net",
            gross_pay.normalize(),
            total_deductions.normalize(),
            net_pay.normalize()
        ),
    );

    let result = PayrollResult {
        gross_pay,
        taxable_income_before_allowance: round_money(taxable_income_before_allowance),
        personal_allowance: round_money(personal_allowance),
        child_allowance: round_money(child_allowance),
        chargeable_income: round_money(chargeable_income),
        nis_contribution,
        insurance_deduction,
        paye_tax,
        total_deductions,
        net_pay,
        voluntary_deductions,
        take_home_pay,
        monthly_gratuity,
        semi_annual_gratuity,
        annual_gratuity,
        overtime_tax_free: round_money(overtime_tax_free),
        overtime_taxable: round_money(overtime_taxable),
        second_job_tax_free: round_money(second_job_tax_free),
        second_job_taxable: round_money(second_job_taxable),
    };

    Ok(PayrollOutcome {
        result,
        audit_trace: trace,
    })
}

fn validate_request(request: &PayrollRequest) -> EngineResult<()> {
    check_amount("basic_salary", request.basic_salary)?;
    for (i, amount) in request.taxable_allowances.iter().enumerate() {
        check_amount(&format!("taxable_allowances[{}]", i), *amount)?;
    }
    for (i, amount) in request.non_taxable_allowances.iter().enumerate() {
        check_amount(&format!("non_taxable_allowances[{}]", i), *amount)?;
    }
    check_amount("overtime_amount", request.overtime_amount)?;
    check_amount("second_job_income", request.second_job_income)?;
    check_amount("custom_insurance_premium", request.custom_insurance_premium)?;
    check_amount("loan_deduction", request.loan_deduction)?;
    check_amount("gpsu_deduction", request.gpsu_deduction)?;
    Ok(())
}

/// Resolves the plan premium and clamps it to the configured maxima.
fn insurance_deduction(
    request: &PayrollRequest,
    config: &JurisdictionConfig,
    gross_pay: Decimal,
    trace: &mut AuditTrace,
) -> EngineResult<Decimal> {
    let Some(plan_id) = request.insurance_plan_id.as_deref() else {
        return Ok(Decimal::ZERO);
    };

    let premium = if config.is_custom_plan(plan_id) {
        request.custom_insurance_premium
    } else {
        *config.insurance_plan_rates.get(plan_id).ok_or_else(|| {
            EngineError::validation(
                "insurance_plan_id",
                format!("unknown insurance plan '{}'", plan_id),
            )
        })?
    };

    let percentage_limit = gross_pay * config.insurance_max_percentage_of_gross;
    let deduction = premium
        .min(percentage_limit)
        .min(config.insurance_max_absolute);

    if deduction < premium {
        trace.warn(
            "INSURANCE_CAPPED",
            format!(
                "Insurance premium ${} clamped to ${}",
                premium.normalize(),
                deduction.normalize()
            ),
            Severity::Warning,
        );
    }

    trace.record(
        "insurance_deduction",
        "Insurance Deduction",
        "payroll.insurance_plan_rates",
        serde_json::json!({
            "insurance_plan_id": plan_id,
            "premium": premium.normalize().to_string(),
            "max_percentage_of_gross": config.insurance_max_percentage_of_gross.normalize().to_string(),
            "max_absolute": config.insurance_max_absolute.normalize().to_string()
        }),
        serde_json::json!({ "insurance_deduction": deduction.normalize().to_string() }),
        format!(
            "Plan {}: min(${}, ${}, ${}) = ${}",
            plan_id,
            premium.normalize(),
            percentage_limit.normalize(),
            config.insurance_max_absolute.normalize(),
            deduction.normalize()
        ),
    );

    Ok(deduction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_config() -> JurisdictionConfig {
        let mut plans = BTreeMap::new();
        plans.insert("1".to_string(), dec("0"));
        plans.insert("2".to_string(), dec("5000"));
        plans.insert("4".to_string(), dec("12000"));

        JurisdictionConfig {
            paye_threshold: dec("130000"),
            paye_rate: dec("0.25"),
            child_allowance_per_dependent: dec("10000"),
            overtime_exemption_cap: dec("50000"),
            second_job_exemption_cap: dec("50000"),
            nis_rate: dec("0.056"),
            nis_cap: dec("280000"),
            insurance_plan_rates: plans,
            custom_insurance_plan_id: "5".to_string(),
            insurance_max_percentage_of_gross: dec("0.10"),
            insurance_max_absolute: dec("50000"),
            gratuity_monthly_fraction: dec("0.225"),
        }
    }

    fn basic(amount: &str) -> PayrollRequest {
        PayrollRequest {
            basic_salary: dec(amount),
            ..Default::default()
        }
    }

    /// PT-001: 150,000 basic, no extras
    #[test]
    fn test_basic_salary_scenario() {
        let config = create_test_config();
        let result = compute_payroll(&basic("150000"), &config).unwrap().result;

        assert_eq!(result.gross_pay, dec("150000"));
        assert_eq!(result.nis_contribution, dec("8400"));
        assert_eq!(result.insurance_deduction, dec("0"));
        assert_eq!(result.personal_allowance, dec("130000"));
        assert_eq!(result.chargeable_income, dec("11600"));
        assert_eq!(result.paye_tax, dec("2900"));
        assert_eq!(result.total_deductions, dec("11300"));
        assert_eq!(result.net_pay, dec("138700"));
        assert_eq!(result.take_home_pay, dec("138700"));
        assert_eq!(result.monthly_gratuity, dec("33750"));
        assert_eq!(result.semi_annual_gratuity, dec("202500"));
        assert_eq!(result.annual_gratuity, dec("405000"));
    }

    #[test]
    fn test_income_below_allowance_pays_no_paye() {
        let config = create_test_config();
        let result = compute_payroll(&basic("100000"), &config).unwrap().result;

        assert_eq!(result.chargeable_income, dec("0"));
        assert_eq!(result.paye_tax, dec("0"));
        assert_eq!(result.nis_contribution, dec("5600"));
        assert_eq!(result.net_pay, dec("94400"));
    }

    #[test]
    fn test_children_raise_personal_allowance() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.num_children = 1;

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.child_allowance, dec("10000"));
        assert_eq!(result.personal_allowance, dec("140000"));
        // 150,000 - 140,000 - 8,400 = 1,600
        assert_eq!(result.chargeable_income, dec("1600"));
        assert_eq!(result.paye_tax, dec("400"));
    }

    #[test]
    fn test_zero_children_allowance_equals_threshold() {
        let config = create_test_config();
        assert_eq!(personal_allowance(&config, 0), config.paye_threshold);
        assert_eq!(personal_allowance(&config, 3), dec("160000"));
    }

    #[test]
    fn test_nis_capped_above_ceiling() {
        let config = create_test_config();
        let outcome = compute_payroll(&basic("400000"), &config).unwrap();

        // 280,000 x 0.056
        assert_eq!(outcome.result.nis_contribution, dec("15680"));
        assert!(outcome.audit_trace.has_warning("NIS_CAP_REACHED"));
    }

    #[test]
    fn test_nis_at_ceiling_has_no_warning() {
        let config = create_test_config();
        let outcome = compute_payroll(&basic("280000"), &config).unwrap();

        assert_eq!(outcome.result.nis_contribution, dec("15680"));
        assert!(!outcome.audit_trace.has_warning("NIS_CAP_REACHED"));
    }

    #[test]
    fn test_overtime_split_at_cap() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.overtime_amount = dec("60000");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.overtime_tax_free, dec("50000"));
        assert_eq!(result.overtime_taxable, dec("10000"));
        assert_eq!(result.gross_pay, dec("210000"));
        assert_eq!(result.taxable_income_before_allowance, dec("160000"));
        // 160,000 - 130,000 - 11,760 = 18,240
        assert_eq!(result.nis_contribution, dec("11760"));
        assert_eq!(result.chargeable_income, dec("18240"));
        assert_eq!(result.paye_tax, dec("4560"));
    }

    #[test]
    fn test_overtime_below_cap_is_fully_tax_free() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.overtime_amount = dec("20000");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.overtime_tax_free, dec("20000"));
        assert_eq!(result.overtime_taxable, dec("0"));
        assert_eq!(result.taxable_income_before_allowance, dec("150000"));
    }

    #[test]
    fn test_second_job_split_at_cap() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.second_job_income = dec("75000");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.second_job_tax_free, dec("50000"));
        assert_eq!(result.second_job_taxable, dec("25000"));
        assert_eq!(result.taxable_income_before_allowance, dec("175000"));
    }

    #[test]
    fn test_non_taxable_allowances_raise_gross_only() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.taxable_allowances = vec![dec("5000"), dec("3000")];
        request.non_taxable_allowances = vec![dec("10000")];

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.gross_pay, dec("168000"));
        assert_eq!(result.taxable_income_before_allowance, dec("158000"));
    }

    #[test]
    fn test_fixed_insurance_plan() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.insurance_plan_id = Some("2".to_string());

        let outcome = compute_payroll(&request, &config).unwrap();

        assert_eq!(outcome.result.insurance_deduction, dec("5000"));
        // 150,000 - 130,000 - 8,400 - 5,000 = 6,600
        assert_eq!(outcome.result.chargeable_income, dec("6600"));
        assert_eq!(outcome.result.paye_tax, dec("1650"));
        assert!(!outcome.audit_trace.has_warning("INSURANCE_CAPPED"));
    }

    #[test]
    fn test_custom_insurance_premium() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.insurance_plan_id = Some("5".to_string());
        request.custom_insurance_premium = dec("7500");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.insurance_deduction, dec("7500"));
    }

    #[test]
    fn test_insurance_clamped_to_percentage_of_gross() {
        let config = create_test_config();
        let mut request = basic("60000");
        request.insurance_plan_id = Some("4".to_string());

        let outcome = compute_payroll(&request, &config).unwrap();

        // 10% of 60,000 = 6,000 < 12,000 premium
        assert_eq!(outcome.result.insurance_deduction, dec("6000"));
        assert!(outcome.audit_trace.has_warning("INSURANCE_CAPPED"));
    }

    #[test]
    fn test_insurance_clamped_to_absolute_maximum() {
        let config = create_test_config();
        let mut request = basic("1000000");
        request.insurance_plan_id = Some("5".to_string());
        request.custom_insurance_premium = dec("80000");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.insurance_deduction, dec("50000"));
    }

    #[test]
    fn test_unknown_insurance_plan_is_rejected() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.insurance_plan_id = Some("9".to_string());

        match compute_payroll(&request, &config) {
            Err(EngineError::Validation { field, message }) => {
                assert_eq!(field, "insurance_plan_id");
                assert!(message.contains("'9'"));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_allowance_reports_index() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.taxable_allowances = vec![dec("1000"), dec("-5")];

        match compute_payroll(&request, &config) {
            Err(EngineError::Validation { field, .. }) => {
                assert_eq!(field, "taxable_allowances[1]")
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_basic_salary_is_rejected() {
        let config = create_test_config();

        match compute_payroll(&basic("-1"), &config) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "basic_salary"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_amount_beyond_decimal_headroom_is_rejected() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.non_taxable_allowances = vec![dec("1"), Decimal::MAX];

        match compute_payroll(&request, &config) {
            Err(EngineError::Validation { field, message }) => {
                assert_eq!(field, "non_taxable_allowances[1]");
                assert!(message.contains("out of range"));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_largest_accepted_salary_computes() {
        let config = create_test_config();
        let mut request = basic("1000000000000000");
        request.overtime_amount = dec("1000000000000000");
        request.second_job_income = dec("1000000000000000");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.gross_pay, dec("3000000000000000"));
        assert_eq!(result.net_pay, result.gross_pay - result.total_deductions);
    }

    #[test]
    fn test_voluntary_deductions_reduce_take_home_only() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.loan_deduction = dec("10000");
        request.gpsu_deduction = dec("1500");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.net_pay, dec("138700"));
        assert_eq!(result.voluntary_deductions, dec("11500"));
        assert_eq!(result.take_home_pay, dec("127200"));
    }

    #[test]
    fn test_net_pay_identity_holds_with_fractional_amounts() {
        let config = create_test_config();
        let mut request = basic("123456.789");
        request.taxable_allowances = vec![dec("1111.115")];
        request.overtime_amount = dec("55555.555");

        let result = compute_payroll(&request, &config).unwrap().result;

        assert_eq!(result.net_pay, result.gross_pay - result.total_deductions);
        assert_eq!(result.total_deductions, result.statutory_deductions());
        assert_eq!(result.annual_gratuity, result.monthly_gratuity * dec("12"));
    }

    #[test]
    fn test_zero_salary_yields_zero_breakdown() {
        let config = create_test_config();
        let result = compute_payroll(&basic("0"), &config).unwrap().result;

        assert_eq!(result.gross_pay, dec("0"));
        assert_eq!(result.total_deductions, dec("0"));
        assert_eq!(result.net_pay, dec("0"));
    }

    #[test]
    fn test_audit_trace_order() {
        let config = create_test_config();
        let mut request = basic("150000");
        request.insurance_plan_id = Some("2".to_string());

        let trace = compute_payroll(&request, &config).unwrap().audit_trace;
        let rule_ids: Vec<&str> = trace.steps.iter().map(|s| s.rule_id.as_str()).collect();

        assert_eq!(
            rule_ids,
            vec![
                "gross_pay",
                "personal_allowance",
                "nis_contribution",
                "insurance_deduction",
                "chargeable_income",
                "paye_tax",
                "net_pay"
            ]
        );
        assert_eq!(trace.steps.last().unwrap().step_number, 7);
    }
}

//! Payroll models.
//!
//! This module defines the monthly payroll request and the full breakdown
//! the payroll engine returns for it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monthly payroll computation request.
///
/// Field names follow the salary form: the legacy `insurance_type` and
/// `insurance_premium` names are accepted as aliases.
///
/// # Example
///
/// ```
/// use levy_engine::models::PayrollRequest;
/// use rust_decimal::Decimal;
///
/// let request = PayrollRequest {
///     basic_salary: Decimal::new(150_000, 0),
///     num_children: 2,
///     ..Default::default()
/// };
/// assert_eq!(request.total_taxable_allowances(), Decimal::ZERO);
/// assert!(request.insurance_plan_id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Allowances that form part of the PAYE base, in form order.
    #[serde(default)]
    pub taxable_allowances: Vec<Decimal>,
    /// Allowances excluded from the PAYE base, in form order.
    #[serde(default)]
    pub non_taxable_allowances: Vec<Decimal>,
    /// Overtime pay for the month.
    #[serde(default)]
    pub overtime_amount: Decimal,
    /// Income from a second job.
    #[serde(default)]
    pub second_job_income: Decimal,
    /// Number of dependent children.
    #[serde(default)]
    pub num_children: u32,
    /// Insurance plan id; `None` means no coverage.
    #[serde(default, alias = "insurance_type")]
    pub insurance_plan_id: Option<String>,
    /// Premium used when the plan id is the configured custom plan.
    #[serde(default, alias = "insurance_premium")]
    pub custom_insurance_premium: Decimal,
    /// Voluntary loan repayment taken from net pay.
    #[serde(default)]
    pub loan_deduction: Decimal,
    /// Voluntary union dues taken from net pay.
    #[serde(default)]
    pub gpsu_deduction: Decimal,
}

impl PayrollRequest {
    /// Sum of the taxable allowances.
    pub fn total_taxable_allowances(&self) -> Decimal {
        self.taxable_allowances.iter().copied().sum()
    }

    /// Sum of the non-taxable allowances.
    pub fn total_non_taxable_allowances(&self) -> Decimal {
        self.non_taxable_allowances.iter().copied().sum()
    }
}

/// The complete monthly payroll breakdown.
///
/// Every amount is rounded to two decimal places. `total_deductions` and
/// `net_pay` are derived from the rounded components, so
/// `net_pay == gross_pay - total_deductions` holds exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Basic salary plus every allowance, overtime and second-job income.
    pub gross_pay: Decimal,
    /// Income subject to PAYE before the personal allowance is applied.
    pub taxable_income_before_allowance: Decimal,
    /// Tax-free threshold including the dependents component.
    pub personal_allowance: Decimal,
    /// The dependents component of the personal allowance.
    #[serde(default)]
    pub child_allowance: Decimal,
    /// Income on which PAYE is charged.
    pub chargeable_income: Decimal,
    /// National insurance contribution.
    pub nis_contribution: Decimal,
    /// Health insurance premium deducted, after clamping.
    pub insurance_deduction: Decimal,
    /// Income tax withheld.
    pub paye_tax: Decimal,
    /// NIS plus insurance plus PAYE.
    pub total_deductions: Decimal,
    /// Gross pay minus statutory deductions.
    pub net_pay: Decimal,
    /// Loan and union deductions taken after tax.
    #[serde(default)]
    pub voluntary_deductions: Decimal,
    /// Net pay minus voluntary deductions.
    #[serde(default)]
    pub take_home_pay: Decimal,
    /// Gratuity accrued per month.
    pub monthly_gratuity: Decimal,
    /// Gratuity accrued over six months.
    pub semi_annual_gratuity: Decimal,
    /// Gratuity accrued over twelve months.
    pub annual_gratuity: Decimal,
    /// Overtime below the exemption cap.
    pub overtime_tax_free: Decimal,
    /// Overtime above the exemption cap.
    pub overtime_taxable: Decimal,
    /// Second-job income below the exemption cap.
    pub second_job_tax_free: Decimal,
    /// Second-job income above the exemption cap.
    pub second_job_taxable: Decimal,
}

impl PayrollResult {
    /// Sum of NIS, insurance and PAYE as reported.
    pub fn statutory_deductions(&self) -> Decimal {
        self.nis_contribution + self.insurance_deduction + self.paye_tax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_full_request() {
        let json = r#"{
            "basic_salary": "150000",
            "taxable_allowances": ["10000", "5000.50"],
            "non_taxable_allowances": ["2500"],
            "overtime_amount": "60000",
            "second_job_income": "0",
            "num_children": 2,
            "insurance_plan_id": "2",
            "custom_insurance_premium": "0",
            "loan_deduction": "12000",
            "gpsu_deduction": "1500"
        }"#;

        let request: PayrollRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.basic_salary, dec("150000"));
        assert_eq!(request.total_taxable_allowances(), dec("15000.50"));
        assert_eq!(request.total_non_taxable_allowances(), dec("2500"));
        assert_eq!(request.num_children, 2);
        assert_eq!(request.insurance_plan_id.as_deref(), Some("2"));
        assert_eq!(request.loan_deduction, dec("12000"));
    }

    #[test]
    fn test_deserialize_legacy_insurance_aliases() {
        let json = r#"{
            "basic_salary": "200000",
            "insurance_type": "5",
            "insurance_premium": "7500"
        }"#;

        let request: PayrollRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.insurance_plan_id.as_deref(), Some("5"));
        assert_eq!(request.custom_insurance_premium, dec("7500"));
        assert!(request.taxable_allowances.is_empty());
        assert_eq!(request.overtime_amount, Decimal::ZERO);
    }

    #[test]
    fn test_negative_children_is_rejected() {
        let json = r#"{ "basic_salary": "200000", "num_children": -1 }"#;
        let result: Result<PayrollRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_salary_is_rejected() {
        let json = r#"{ "basic_salary": "lots" }"#;
        let result: Result<PayrollRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_statutory_deductions_sum() {
        let result = PayrollResult {
            gross_pay: dec("150000"),
            taxable_income_before_allowance: dec("150000"),
            personal_allowance: dec("130000"),
            child_allowance: dec("0"),
            chargeable_income: dec("11600"),
            nis_contribution: dec("8400"),
            insurance_deduction: dec("0"),
            paye_tax: dec("2900"),
            total_deductions: dec("11300"),
            net_pay: dec("138700"),
            voluntary_deductions: dec("0"),
            take_home_pay: dec("138700"),
            monthly_gratuity: dec("33750"),
            semi_annual_gratuity: dec("202500"),
            annual_gratuity: dec("405000"),
            overtime_tax_free: dec("0"),
            overtime_taxable: dec("0"),
            second_job_tax_free: dec("0"),
            second_job_taxable: dec("0"),
        };

        assert_eq!(result.statutory_deductions(), result.total_deductions);
    }
}

//! Salary increase models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollResult;

/// A request to project a percentage change onto a computed salary.
///
/// `current_gross_pay` must be the `gross_pay` of the [`PayrollResult`]
/// the projection is made against. The legacy form name
/// `current_salary` is accepted as an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseRequest {
    /// Gross pay of the baseline payroll result.
    #[serde(alias = "current_salary")]
    pub current_gross_pay: Decimal,
    /// Percentage change; `-100` removes the whole salary.
    pub increase_percentage: Decimal,
    /// Whether the increase is subject to PAYE.
    pub is_increase_taxable: bool,
    /// Number of dependent children.
    #[serde(default)]
    pub num_children: u32,
}

/// The projected payroll after an increase, with the differences to the
/// baseline.
///
/// Every field of the projected [`PayrollResult`] is carried with a `new_`
/// prefix so the increase panel can bind to it next to the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseResult {
    /// Projected gross pay.
    pub new_gross_pay: Decimal,
    /// Projected income subject to PAYE before allowance.
    pub new_taxable_income_before_allowance: Decimal,
    /// Projected personal allowance.
    pub new_personal_allowance: Decimal,
    /// Projected dependents component of the allowance.
    pub new_child_allowance: Decimal,
    /// Projected chargeable income.
    pub new_chargeable_income: Decimal,
    /// Projected NIS contribution.
    pub new_nis_contribution: Decimal,
    /// Projected insurance deduction.
    pub new_insurance_deduction: Decimal,
    /// Projected PAYE.
    pub new_paye_tax: Decimal,
    /// Projected statutory deductions.
    pub new_total_deductions: Decimal,
    /// Projected net pay.
    pub new_net_pay: Decimal,
    /// Projected voluntary deductions.
    pub new_voluntary_deductions: Decimal,
    /// Projected take-home pay.
    pub new_take_home_pay: Decimal,
    /// Projected monthly gratuity.
    pub new_monthly_gratuity: Decimal,
    /// Projected semi-annual gratuity.
    pub new_semi_annual_gratuity: Decimal,
    /// Projected annual gratuity.
    pub new_annual_gratuity: Decimal,
    /// Projected tax-free overtime.
    pub new_overtime_tax_free: Decimal,
    /// Projected taxable overtime.
    pub new_overtime_taxable: Decimal,
    /// Projected tax-free second-job income.
    pub new_second_job_tax_free: Decimal,
    /// Projected taxable second-job income.
    pub new_second_job_taxable: Decimal,
    /// New gross minus baseline gross.
    pub increase_amount: Decimal,
    /// New net pay minus baseline net pay.
    pub monthly_difference: Decimal,
    /// Twelve times the monthly difference.
    pub annual_difference: Decimal,
}

impl IncreaseResult {
    /// Builds the prefixed record from a projected payroll result.
    pub fn new(
        projected: &PayrollResult,
        increase_amount: Decimal,
        monthly_difference: Decimal,
    ) -> Self {
        Self {
            new_gross_pay: projected.gross_pay,
            new_taxable_income_before_allowance: projected.taxable_income_before_allowance,
            new_personal_allowance: projected.personal_allowance,
            new_child_allowance: projected.child_allowance,
            new_chargeable_income: projected.chargeable_income,
            new_nis_contribution: projected.nis_contribution,
            new_insurance_deduction: projected.insurance_deduction,
            new_paye_tax: projected.paye_tax,
            new_total_deductions: projected.total_deductions,
            new_net_pay: projected.net_pay,
            new_voluntary_deductions: projected.voluntary_deductions,
            new_take_home_pay: projected.take_home_pay,
            new_monthly_gratuity: projected.monthly_gratuity,
            new_semi_annual_gratuity: projected.semi_annual_gratuity,
            new_annual_gratuity: projected.annual_gratuity,
            new_overtime_tax_free: projected.overtime_tax_free,
            new_overtime_taxable: projected.overtime_taxable,
            new_second_job_tax_free: projected.second_job_tax_free,
            new_second_job_taxable: projected.second_job_taxable,
            increase_amount,
            monthly_difference,
            annual_difference: monthly_difference * Decimal::from(12),
        }
    }

    /// Returns the projected figures as a plain [`PayrollResult`].
    ///
    /// Useful for chaining a further projection onto this one.
    pub fn projected(&self) -> PayrollResult {
        PayrollResult {
            gross_pay: self.new_gross_pay,
            taxable_income_before_allowance: self.new_taxable_income_before_allowance,
            personal_allowance: self.new_personal_allowance,
            child_allowance: self.new_child_allowance,
            chargeable_income: self.new_chargeable_income,
            nis_contribution: self.new_nis_contribution,
            insurance_deduction: self.new_insurance_deduction,
            paye_tax: self.new_paye_tax,
            total_deductions: self.new_total_deductions,
            net_pay: self.new_net_pay,
            voluntary_deductions: self.new_voluntary_deductions,
            take_home_pay: self.new_take_home_pay,
            monthly_gratuity: self.new_monthly_gratuity,
            semi_annual_gratuity: self.new_semi_annual_gratuity,
            annual_gratuity: self.new_annual_gratuity,
            overtime_tax_free: self.new_overtime_tax_free,
            overtime_taxable: self.new_overtime_taxable,
            second_job_tax_free: self.new_second_job_tax_free,
            second_job_taxable: self.new_second_job_taxable,
        }
    }
}

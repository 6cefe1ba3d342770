//! Request types for the levy engine API.
//!
//! The vehicle and payroll endpoints take the model records directly. This
//! module defines the envelopes that do not map onto a single record.

use serde::{Deserialize, Serialize};

use crate::models::{IncreaseRequest, PayrollResult};

/// Request body for the `/calculate-salary-increase` endpoint.
///
/// The baseline result travels under `current`; the increase fields sit at
/// the top level, as the increase form posts them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncreaseCalculationRequest {
    /// The payroll result the increase is projected onto.
    pub current: PayrollResult,
    /// The percentage change and its tax treatment.
    #[serde(flatten)]
    pub increase: IncreaseRequest,
}

/// Query parameters for the `/tax-threshold` endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TaxThresholdQuery {
    /// Number of dependent children.
    #[serde(default)]
    pub num_children: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn current_json() -> serde_json::Value {
        serde_json::json!({
            "gross_pay": "150000",
            "taxable_income_before_allowance": "150000",
            "personal_allowance": "130000",
            "chargeable_income": "11600",
            "nis_contribution": "8400",
            "insurance_deduction": "0",
            "paye_tax": "2900",
            "total_deductions": "11300",
            "net_pay": "138700",
            "monthly_gratuity": "33750",
            "semi_annual_gratuity": "202500",
            "annual_gratuity": "405000",
            "overtime_tax_free": "0",
            "overtime_taxable": "0",
            "second_job_tax_free": "0",
            "second_job_taxable": "0"
        })
    }

    #[test]
    fn test_deserialize_increase_request() {
        let json = serde_json::json!({
            "current": current_json(),
            "current_gross_pay": "150000",
            "increase_percentage": "10",
            "is_increase_taxable": true,
            "num_children": 1
        });

        let request: IncreaseCalculationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.current.net_pay, Decimal::from_str("138700").unwrap());
        assert_eq!(request.increase.increase_percentage, Decimal::from(10));
        assert!(request.increase.is_increase_taxable);
        assert_eq!(request.increase.num_children, 1);
    }

    #[test]
    fn test_deserialize_increase_request_with_form_names() {
        let json = serde_json::json!({
            "current": current_json(),
            "current_salary": "150000",
            "increase_percentage": "5",
            "is_increase_taxable": false
        });

        let request: IncreaseCalculationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(
            request.increase.current_gross_pay,
            Decimal::from_str("150000").unwrap()
        );
        assert_eq!(request.increase.num_children, 0);
    }

    #[test]
    fn test_missing_current_fails() {
        let json = serde_json::json!({
            "current_gross_pay": "150000",
            "increase_percentage": "10",
            "is_increase_taxable": true
        });

        assert!(serde_json::from_value::<IncreaseCalculationRequest>(json).is_err());
    }
}

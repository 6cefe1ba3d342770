//! Configuration types for the levy engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the invariant checks
//! run on them before an engine may use them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AgeCategory, FuelType};

/// Metadata about the jurisdiction and the version of its schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short jurisdiction code (e.g., "GY").
    pub code: String,
    /// The human-readable name of the jurisdiction.
    pub name: String,
    /// Version label of this rate set.
    pub version: String,
    /// Date from which this rate set applies.
    pub effective_date: NaiveDate,
    /// ISO currency code amounts are expressed in.
    pub currency: String,
}

/// Payroll tax parameters for one jurisdiction.
///
/// Rates are fractions in `[0, 1]`; caps, thresholds and premiums are
/// non-negative amounts in base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionConfig {
    /// Monthly income exempt from PAYE before the dependents component.
    pub paye_threshold: Decimal,
    /// Flat PAYE rate on chargeable income.
    pub paye_rate: Decimal,
    /// Addition to the personal allowance per dependent child.
    pub child_allowance_per_dependent: Decimal,
    /// Overtime up to this amount is exempt from PAYE.
    pub overtime_exemption_cap: Decimal,
    /// Second-job income up to this amount is exempt from PAYE.
    pub second_job_exemption_cap: Decimal,
    /// NIS contribution rate.
    pub nis_rate: Decimal,
    /// Ceiling on the gross pay NIS is charged on.
    pub nis_cap: Decimal,
    /// Fixed monthly premium per insurance plan id.
    pub insurance_plan_rates: BTreeMap<String, Decimal>,
    /// Plan id signalling that the request's custom premium applies.
    pub custom_insurance_plan_id: String,
    /// Insurance deduction may not exceed this fraction of gross pay.
    pub insurance_max_percentage_of_gross: Decimal,
    /// Insurance deduction may not exceed this amount.
    pub insurance_max_absolute: Decimal,
    /// Fraction of gross pay accrued as gratuity each month.
    pub gratuity_monthly_fraction: Decimal,
}

impl JurisdictionConfig {
    /// Checks the rate, cap and threshold invariants.
    ///
    /// # Example
    ///
    /// ```
    /// use levy_engine::config::JurisdictionConfig;
    /// use rust_decimal::Decimal;
    /// use std::collections::BTreeMap;
    ///
    /// let mut config = JurisdictionConfig {
    ///     paye_threshold: Decimal::new(130_000, 0),
    ///     paye_rate: Decimal::new(25, 2),
    ///     child_allowance_per_dependent: Decimal::new(10_000, 0),
    ///     overtime_exemption_cap: Decimal::new(50_000, 0),
    ///     second_job_exemption_cap: Decimal::new(50_000, 0),
    ///     nis_rate: Decimal::new(56, 3),
    ///     nis_cap: Decimal::new(280_000, 0),
    ///     insurance_plan_rates: BTreeMap::new(),
    ///     custom_insurance_plan_id: "5".to_string(),
    ///     insurance_max_percentage_of_gross: Decimal::new(10, 2),
    ///     insurance_max_absolute: Decimal::new(50_000, 0),
    ///     gratuity_monthly_fraction: Decimal::new(225, 3),
    /// };
    /// assert!(config.validate().is_ok());
    ///
    /// config.paye_rate = Decimal::new(125, 2);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        check_non_negative("payroll.paye_threshold", self.paye_threshold)?;
        check_rate("payroll.paye_rate", self.paye_rate)?;
        check_non_negative(
            "payroll.child_allowance_per_dependent",
            self.child_allowance_per_dependent,
        )?;
        check_non_negative("payroll.overtime_exemption_cap", self.overtime_exemption_cap)?;
        check_non_negative(
            "payroll.second_job_exemption_cap",
            self.second_job_exemption_cap,
        )?;
        check_rate("payroll.nis_rate", self.nis_rate)?;
        check_non_negative("payroll.nis_cap", self.nis_cap)?;
        for (plan_id, premium) in &self.insurance_plan_rates {
            check_non_negative(&format!("payroll.insurance_plan_rates.{}", plan_id), *premium)?;
        }
        if self.insurance_plan_rates.contains_key(&self.custom_insurance_plan_id) {
            return Err(EngineError::ConfigInvalid {
                path: "payroll.custom_insurance_plan_id".to_string(),
                message: format!(
                    "custom plan id '{}' is also listed as a fixed-rate plan",
                    self.custom_insurance_plan_id
                ),
            });
        }
        check_rate(
            "payroll.insurance_max_percentage_of_gross",
            self.insurance_max_percentage_of_gross,
        )?;
        check_non_negative("payroll.insurance_max_absolute", self.insurance_max_absolute)?;
        check_rate(
            "payroll.gratuity_monthly_fraction",
            self.gratuity_monthly_fraction,
        )?;
        Ok(())
    }

    /// Returns true if `plan_id` selects the custom premium.
    pub fn is_custom_plan(&self, plan_id: &str) -> bool {
        plan_id == self.custom_insurance_plan_id
    }
}

/// One engine-size range of a vehicle duty schedule.
///
/// The range is inclusive on both ends; `engine_cc_max: None` means the
/// range is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDutyBracket {
    /// Age category this bracket belongs to.
    pub regime: AgeCategory,
    /// Fuel type this bracket belongs to.
    pub fuel_type: FuelType,
    /// Smallest engine size in the range.
    pub engine_cc_min: u32,
    /// Largest engine size in the range, if bounded.
    #[serde(default)]
    pub engine_cc_max: Option<u32>,
    /// Import duty rate on the CIF value.
    pub duty_rate: Decimal,
    /// Excise rate. May exceed 1.
    pub excise_rate: Decimal,
    /// Fixed excise fee, used by the older-vehicle regime.
    #[serde(default)]
    pub excise_fixed_fee: Decimal,
}

/// The vehicle duty schedule as written in `vehicle_duty.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTableConfig {
    /// Version label of the schedule.
    pub version: String,
    /// VAT rate applied to vehicles under four years old.
    pub vat_rate: Decimal,
    /// Flat environmental tax charged on electric vehicles.
    pub electric_environmental_tax: Decimal,
    /// Every bracket, in any order.
    pub brackets: Vec<VehicleDutyBracket>,
}

/// A validated vehicle duty schedule, grouped by (age category, fuel type).
///
/// Within each group the ranges are sorted, start at 0cc, are contiguous,
/// and only the last one is open-ended, so every engine size matches
/// exactly one range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    version: String,
    vat_rate: Decimal,
    electric_environmental_tax: Decimal,
    groups: BTreeMap<(AgeCategory, FuelType), Vec<VehicleDutyBracket>>,
}

impl BracketTable {
    /// Groups and validates a raw schedule.
    ///
    /// Returns `ConfigInvalid` if any group has a gap, an overlap, a
    /// bounded last range, or a negative rate or fee.
    pub fn new(config: BracketTableConfig) -> EngineResult<Self> {
        check_rate("vehicle_duty.vat_rate", config.vat_rate)?;
        check_non_negative(
            "vehicle_duty.electric_environmental_tax",
            config.electric_environmental_tax,
        )?;

        let mut groups: BTreeMap<(AgeCategory, FuelType), Vec<VehicleDutyBracket>> =
            BTreeMap::new();
        for bracket in config.brackets {
            groups
                .entry((bracket.regime, bracket.fuel_type))
                .or_default()
                .push(bracket);
        }

        for ((regime, fuel_type), brackets) in groups.iter_mut() {
            brackets.sort_by_key(|b| b.engine_cc_min);
            validate_group(&format!("vehicle_duty.brackets[{}/{}]", regime, fuel_type), brackets)?;
        }

        Ok(Self {
            version: config.version,
            vat_rate: config.vat_rate,
            electric_environmental_tax: config.electric_environmental_tax,
            groups,
        })
    }

    /// Returns the version label of the schedule.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the VAT rate.
    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    /// Returns the flat environmental tax for electric vehicles.
    pub fn electric_environmental_tax(&self) -> Decimal {
        self.electric_environmental_tax
    }

    /// Returns the ascending ranges for an (age category, fuel type) pair.
    pub fn group(&self, regime: AgeCategory, fuel_type: FuelType) -> Option<&[VehicleDutyBracket]> {
        self.groups.get(&(regime, fuel_type)).map(Vec::as_slice)
    }

    /// Returns every (age category, fuel type) pair that has a schedule.
    pub fn regimes(&self) -> impl Iterator<Item = (AgeCategory, FuelType)> + '_ {
        self.groups.keys().copied()
    }
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevyConfig {
    metadata: JurisdictionMetadata,
    payroll: JurisdictionConfig,
    brackets: BracketTable,
}

impl LevyConfig {
    /// Creates a new LevyConfig from its validated component parts.
    pub fn new(
        metadata: JurisdictionMetadata,
        payroll: JurisdictionConfig,
        brackets: BracketTable,
    ) -> EngineResult<Self> {
        payroll.validate()?;
        Ok(Self {
            metadata,
            payroll,
            brackets,
        })
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns the payroll tax parameters.
    pub fn payroll(&self) -> &JurisdictionConfig {
        &self.payroll
    }

    /// Returns the vehicle duty schedule.
    pub fn brackets(&self) -> &BracketTable {
        &self.brackets
    }
}

fn validate_group(path: &str, brackets: &[VehicleDutyBracket]) -> EngineResult<()> {
    let invalid = |message: String| EngineError::ConfigInvalid {
        path: path.to_string(),
        message,
    };

    let first = brackets
        .first()
        .ok_or_else(|| invalid("group has no brackets".to_string()))?;
    if first.engine_cc_min != 0 {
        return Err(invalid(format!(
            "first range starts at {}cc instead of 0cc",
            first.engine_cc_min
        )));
    }

    for (index, bracket) in brackets.iter().enumerate() {
        check_non_negative(path, bracket.duty_rate)?;
        check_non_negative(path, bracket.excise_rate)?;
        check_non_negative(path, bracket.excise_fixed_fee)?;

        let is_last = index + 1 == brackets.len();
        match (bracket.engine_cc_max, is_last) {
            (None, true) => {}
            (None, false) => {
                return Err(invalid(format!(
                    "open-ended range starting at {}cc is not the last range",
                    bracket.engine_cc_min
                )));
            }
            (Some(max), true) => {
                return Err(invalid(format!(
                    "last range ends at {}cc but must be open-ended",
                    max
                )));
            }
            (Some(max), false) => {
                if max < bracket.engine_cc_min {
                    return Err(invalid(format!(
                        "range {}-{}cc ends before it starts",
                        bracket.engine_cc_min, max
                    )));
                }
                let next_min = brackets[index + 1].engine_cc_min;
                if Some(next_min) != max.checked_add(1) {
                    return Err(invalid(format!(
                        "range ending at {}cc is followed by a range starting at {}cc",
                        max, next_min
                    )));
                }
            }
        }
    }

    Ok(())
}

fn check_rate(path: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(EngineError::ConfigInvalid {
            path: path.to_string(),
            message: format!("rate {} must be between 0 and 1", value),
        });
    }
    Ok(())
}

fn check_non_negative(path: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::ConfigInvalid {
            path: path.to_string(),
            message: format!("amount {} must not be negative", value),
        });
    }
    Ok(())
}

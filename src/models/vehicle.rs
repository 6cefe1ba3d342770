//! Vehicle import models.
//!
//! This module defines the request and result records for the vehicle
//! import duty calculator, along with the enumerations that select a
//! bracket group.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::round_money;

/// The fuel a combustion vehicle burns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    /// Petrol engine.
    Gasoline,
    /// Diesel engine.
    Diesel,
    /// Battery electric. Has no engine-size brackets of its own.
    Electric,
}

impl FuelType {
    /// Returns the wire name of the fuel type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age category of an imported vehicle, which selects the tax regime.
///
/// The legacy form values `new` and `old` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeCategory {
    /// Less than four years old: duty, excise and VAT apply.
    #[serde(rename = "under_4y", alias = "new")]
    Under4Years,
    /// Four years or older: fixed-fee excise only.
    #[serde(rename = "4y_or_older", alias = "old")]
    FourYearsOrOlder,
}

impl AgeCategory {
    /// Returns the wire name of the age category.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeCategory::Under4Years => "under_4y",
            AgeCategory::FourYearsOrOlder => "4y_or_older",
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the vehicle is propelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propulsion {
    /// Internal combustion engine; taxed by engine-size bracket.
    #[default]
    Combustion,
    /// Electric drive; flat environmental tax only.
    Electric,
}

/// Registration plate class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateType {
    /// Private use.
    #[default]
    #[serde(alias = "P")]
    Private,
    /// Hire or commercial use.
    #[serde(alias = "H")]
    Hire,
}

/// A vehicle import declaration to be taxed.
///
/// # Example
///
/// ```
/// use levy_engine::models::{AgeCategory, FuelType, VehicleImportRequest};
///
/// let json = r#"{
///     "cif_value": "1000000",
///     "engine_cc": 1700,
///     "fuel_type": "gasoline",
///     "age_category": "under_4y",
///     "exchange_rate": "208.50"
/// }"#;
/// let request: VehicleImportRequest = serde_json::from_str(json).unwrap();
/// assert_eq!(request.fuel_type, FuelType::Gasoline);
/// assert_eq!(request.age_category, AgeCategory::Under4Years);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleImportRequest {
    /// Cost, insurance and freight value in base currency.
    pub cif_value: Decimal,
    /// Engine displacement in cubic centimetres. Ignored for electric vehicles.
    #[serde(default)]
    pub engine_cc: u32,
    /// Fuel type of the engine.
    pub fuel_type: FuelType,
    /// Age category of the vehicle.
    #[serde(alias = "vehicle_age")]
    pub age_category: AgeCategory,
    /// Propulsion kind.
    #[serde(default)]
    pub propulsion: Propulsion,
    /// Registration plate class.
    #[serde(default)]
    pub plate_type: PlateType,
    /// Base-currency units per quote-currency unit, for display.
    pub exchange_rate: Decimal,
}

/// The tax breakdown for a vehicle import.
///
/// All amounts are in base currency, rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleImportResult {
    /// The declared CIF value.
    pub base_cost: Decimal,
    /// Import duty.
    pub custom_duty: Decimal,
    /// Flat environmental tax.
    pub environmental_tax: Decimal,
    /// Excise tax.
    pub excise_tax: Decimal,
    /// Value added tax.
    pub vat: Decimal,
    /// CIF value plus every tax.
    pub total_cost: Decimal,
    /// The exchange rate supplied with the request, echoed for display.
    pub exchange_rate: Decimal,
}

impl VehicleImportResult {
    /// Sum of every tax component, excluding the CIF value.
    pub fn total_taxes(&self) -> Decimal {
        self.custom_duty + self.environmental_tax + self.excise_tax + self.vat
    }

    /// Returns a copy with every amount divided by the exchange rate, or
    /// `None` if a converted amount does not fit in a `Decimal`.
    ///
    /// This is a display helper; engine output stays in base currency.
    ///
    /// # Example
    ///
    /// ```
    /// use levy_engine::models::VehicleImportResult;
    /// use rust_decimal::Decimal;
    ///
    /// let result = VehicleImportResult {
    ///     base_cost: Decimal::new(200_000, 0),
    ///     custom_duty: Decimal::ZERO,
    ///     environmental_tax: Decimal::ZERO,
    ///     excise_tax: Decimal::new(100_000, 0),
    ///     vat: Decimal::ZERO,
    ///     total_cost: Decimal::new(300_000, 0),
    ///     exchange_rate: Decimal::new(200, 0),
    /// };
    /// let quoted = result.in_quote_currency().unwrap();
    /// assert_eq!(quoted.total_cost, Decimal::new(1500, 0));
    /// ```
    pub fn in_quote_currency(&self) -> Option<VehicleImportResult> {
        let convert =
            |amount: Decimal| amount.checked_div(self.exchange_rate).map(round_money);
        Some(VehicleImportResult {
            base_cost: convert(self.base_cost)?,
            custom_duty: convert(self.custom_duty)?,
            environmental_tax: convert(self.environmental_tax)?,
            excise_tax: convert(self.excise_tax)?,
            vat: convert(self.vat)?,
            total_cost: convert(self.total_cost)?,
            exchange_rate: self.exchange_rate,
        })
    }
}

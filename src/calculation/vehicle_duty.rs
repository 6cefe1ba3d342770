//! Vehicle import duty calculation.
//!
//! This module resolves a vehicle import declaration against the bracket
//! schedule and produces the duty, excise, environmental tax and VAT owed.
//!
//! ## Regimes
//!
//! **Under four years:**
//! - duty = CIF × duty rate
//! - excise = (CIF + duty) × excise rate
//! - VAT = (CIF + duty + excise) × VAT rate
//!
//! **Four years or older:**
//! - excise = (CIF + fixed fee) × excise rate + fixed fee
//! - no duty, no VAT
//!
//! **Electric:** a flat environmental tax, plus VAT on the CIF value when
//! under four years. Engine size is ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BracketTable, VehicleDutyBracket};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AgeCategory, AuditTrace, PlateType, Propulsion, VehicleImportRequest, VehicleImportResult,
};

use super::bracket::resolve_tier;
use super::rounding::{check_amount, round_money};

/// The result of a vehicle import calculation, with its audit trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDutyOutcome {
    /// The tax breakdown.
    pub result: VehicleImportResult,
    /// The rules applied to reach it.
    pub audit_trace: AuditTrace,
}

/// Unrounded tax components.
#[derive(Debug, Clone, Copy, Default)]
struct DutyBreakdown {
    custom_duty: Decimal,
    environmental_tax: Decimal,
    excise_tax: Decimal,
    vat: Decimal,
}

/// Calculates the taxes owed on a vehicle import.
///
/// # Arguments
///
/// * `request` - The import declaration
/// * `table` - The bracket schedule to resolve the engine size against
///
/// # Returns
///
/// A [`VehicleDutyOutcome`] with every amount rounded to cents, or:
/// - `Validation` if `cif_value` is negative or above
///   [`MAX_MONETARY_AMOUNT`](super::MAX_MONETARY_AMOUNT), `exchange_rate` is
///   not positive or too small to convert the total, or an older vehicle is
///   declared with a hire plate
/// - `UnsupportedConfiguration` if the schedule has no bracket for the
///   vehicle's fuel type, age category or engine size
///
/// # Examples
///
/// ```
/// use levy_engine::calculation::compute_vehicle_import;
/// use levy_engine::config::ConfigLoader;
/// use levy_engine::models::{AgeCategory, FuelType, PlateType, Propulsion, VehicleImportRequest};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/gy_2024").unwrap();
/// let request = VehicleImportRequest {
///     cif_value: Decimal::new(1_000_000, 0),
///     engine_cc: 1700,
///     fuel_type: FuelType::Gasoline,
///     age_category: AgeCategory::Under4Years,
///     propulsion: Propulsion::Combustion,
///     plate_type: PlateType::Private,
///     exchange_rate: Decimal::new(20850, 2),
/// };
///
/// let outcome = compute_vehicle_import(&request, loader.brackets()).unwrap();
/// assert_eq!(outcome.result.total_cost, Decimal::new(1_818_300, 0));
/// ```
pub fn compute_vehicle_import(
    request: &VehicleImportRequest,
    table: &BracketTable,
) -> EngineResult<VehicleDutyOutcome> {
    validate_request(request)?;

    let mut trace = AuditTrace::default();
    let cif = request.cif_value;

    let breakdown = match request.propulsion {
        Propulsion::Electric => electric_breakdown(request, table, &mut trace),
        Propulsion::Combustion => {
            let bracket = lookup_bracket(request, table, &mut trace)?;
            match request.age_category {
                AgeCategory::Under4Years => {
                    recent_vehicle_breakdown(cif, bracket, table.vat_rate(), &mut trace)
                }
                AgeCategory::FourYearsOrOlder => older_vehicle_breakdown(cif, bracket, &mut trace),
            }
        }
    };

    let total = cif
        + breakdown.custom_duty
        + breakdown.environmental_tax
        + breakdown.excise_tax
        + breakdown.vat;

    let result = VehicleImportResult {
        base_cost: round_money(cif),
        custom_duty: round_money(breakdown.custom_duty),
        environmental_tax: round_money(breakdown.environmental_tax),
        excise_tax: round_money(breakdown.excise_tax),
        vat: round_money(breakdown.vat),
        total_cost: round_money(total),
        exchange_rate: request.exchange_rate,
    };
    if result.in_quote_currency().is_none() {
        return Err(EngineError::validation(
            "exchange_rate",
            "out of range, total cost cannot be converted at this rate",
        ));
    }

    trace.record(
        "total_cost",
        "Total Landed Cost",
        "request.cif_value",
        serde_json::json!({
            "cif_value": cif.normalize().to_string(),
            "custom_duty": breakdown.custom_duty.normalize().to_string(),
            "environmental_tax": breakdown.environmental_tax.normalize().to_string(),
            "excise_tax": breakdown.excise_tax.normalize().to_string(),
            "vat": breakdown.vat.normalize().to_string()
        }),
        serde_json::json!({
            "total_cost": result.total_cost.to_string()
        }),
        format!(
            "${} CIF + ${} taxes = ${}",
            cif.normalize(),
            result.total_taxes().normalize(),
            result.total_cost.normalize()
        ),
    );

    Ok(VehicleDutyOutcome {
        result,
        audit_trace: trace,
    })
}

fn validate_request(request: &VehicleImportRequest) -> EngineResult<()> {
    check_amount("cif_value", request.cif_value)?;
    if request.exchange_rate <= Decimal::ZERO {
        return Err(EngineError::validation(
            "exchange_rate",
            "must be greater than zero",
        ));
    }
    if request.age_category == AgeCategory::FourYearsOrOlder && request.plate_type == PlateType::Hire
    {
        return Err(EngineError::validation(
            "plate_type",
            "vehicles 4 years or older can only be registered with private plates",
        ));
    }
    Ok(())
}

/// Finds the bracket for a combustion vehicle, failing loudly on any gap.
fn lookup_bracket<'a>(
    request: &VehicleImportRequest,
    table: &'a BracketTable,
    trace: &mut AuditTrace,
) -> EngineResult<&'a VehicleDutyBracket> {
    let group = table
        .group(request.age_category, request.fuel_type)
        .ok_or_else(|| EngineError::UnsupportedConfiguration {
            dimension: "fuel_type".to_string(),
            value: request.fuel_type.to_string(),
            message: format!(
                "no bracket group for age category '{}'",
                request.age_category
            ),
        })?;

    let bracket = resolve_tier(group, request.engine_cc).ok_or_else(|| {
        EngineError::UnsupportedConfiguration {
            dimension: "engine_cc".to_string(),
            value: request.engine_cc.to_string(),
            message: format!(
                "no {} {} bracket covers this engine size",
                request.age_category, request.fuel_type
            ),
        }
    })?;

    let range = match bracket.engine_cc_max {
        Some(max) => format!("{}-{}cc", bracket.engine_cc_min, max),
        None => format!("{}cc and above", bracket.engine_cc_min),
    };

    debug!(
        fuel_type = %request.fuel_type,
        age_category = %request.age_category,
        engine_cc = request.engine_cc,
        bracket = %range,
        "Resolved vehicle duty bracket"
    );

    trace.record(
        "bracket_lookup",
        "Bracket Lookup",
        "vehicle_duty.brackets",
        serde_json::json!({
            "engine_cc": request.engine_cc,
            "fuel_type": request.fuel_type.as_str(),
            "age_category": request.age_category.as_str()
        }),
        serde_json::json!({
            "engine_cc_min": bracket.engine_cc_min,
            "engine_cc_max": bracket.engine_cc_max,
            "duty_rate": bracket.duty_rate.normalize().to_string(),
            "excise_rate": bracket.excise_rate.normalize().to_string(),
            "excise_fixed_fee": bracket.excise_fixed_fee.normalize().to_string()
        }),
        format!(
            "{}cc {} vehicle ({}) falls in the {} bracket",
            request.engine_cc, request.fuel_type, request.age_category, range
        ),
    );

    Ok(bracket)
}

fn recent_vehicle_breakdown(
    cif: Decimal,
    bracket: &VehicleDutyBracket,
    vat_rate: Decimal,
    trace: &mut AuditTrace,
) -> DutyBreakdown {
    let custom_duty = cif * bracket.duty_rate;
    trace.record(
        "custom_duty",
        "Custom Duty",
        "vehicle_duty.brackets.duty_rate",
        serde_json::json!({
            "cif_value": cif.normalize().to_string(),
            "duty_rate": bracket.duty_rate.normalize().to_string()
        }),
        serde_json::json!({ "custom_duty": custom_duty.normalize().to_string() }),
        format!(
            "${} x {} = ${}",
            cif.normalize(),
            bracket.duty_rate.normalize(),
            custom_duty.normalize()
        ),
    );

    let excise_base = cif + custom_duty;
    let excise_tax = bracket.excise_rate * excise_base;
    trace.record(
        "excise_tax",
        "Excise Tax",
        "vehicle_duty.brackets.excise_rate",
        serde_json::json!({
            "excise_base": excise_base.normalize().to_string(),
            "excise_rate": bracket.excise_rate.normalize().to_string()
        }),
        serde_json::json!({ "excise_tax": excise_tax.normalize().to_string() }),
        format!(
            "(${} CIF + ${} duty) x {} = ${}",
            cif.normalize(),
            custom_duty.normalize(),
            bracket.excise_rate.normalize(),
            excise_tax.normalize()
        ),
    );

    let vat_base = cif + custom_duty + excise_tax;
    let vat = vat_rate * vat_base;
    trace.record(
        "vat",
        "Value Added Tax",
        "vehicle_duty.vat_rate",
        serde_json::json!({
            "vat_base": vat_base.normalize().to_string(),
            "vat_rate": vat_rate.normalize().to_string()
        }),
        serde_json::json!({ "vat": vat.normalize().to_string() }),
        format!(
            "${} x {} = ${}",
            vat_base.normalize(),
            vat_rate.normalize(),
            vat.normalize()
        ),
    );

    DutyBreakdown {
        custom_duty,
        environmental_tax: Decimal::ZERO,
        excise_tax,
        vat,
    }
}

fn older_vehicle_breakdown(
    cif: Decimal,
    bracket: &VehicleDutyBracket,
    trace: &mut AuditTrace,
) -> DutyBreakdown {
    let fee = bracket.excise_fixed_fee;
    let excise_tax = (cif + fee) * bracket.excise_rate + fee;

    trace.record(
        "excise_tax",
        "Excise Tax (4 Years or Older)",
        "vehicle_duty.brackets.excise_rate",
        serde_json::json!({
            "cif_value": cif.normalize().to_string(),
            "excise_rate": bracket.excise_rate.normalize().to_string(),
            "excise_fixed_fee": fee.normalize().to_string()
        }),
        serde_json::json!({
            "excise_tax": excise_tax.normalize().to_string(),
            "custom_duty": "0",
            "vat": "0"
        }),
        format!(
            "(${} + ${}) x {} + ${} = ${}; no duty or VAT for vehicles 4 years or older",
            cif.normalize(),
            fee.normalize(),
            bracket.excise_rate.normalize(),
            fee.normalize(),
            excise_tax.normalize()
        ),
    );

    DutyBreakdown {
        excise_tax,
        ..DutyBreakdown::default()
    }
}

fn electric_breakdown(
    request: &VehicleImportRequest,
    table: &BracketTable,
    trace: &mut AuditTrace,
) -> DutyBreakdown {
    let environmental_tax = table.electric_environmental_tax();
    let vat = match request.age_category {
        AgeCategory::Under4Years => request.cif_value * table.vat_rate(),
        AgeCategory::FourYearsOrOlder => Decimal::ZERO,
    };

    trace.record(
        "electric_vehicle",
        "Electric Vehicle",
        "vehicle_duty.electric_environmental_tax",
        serde_json::json!({
            "cif_value": request.cif_value.normalize().to_string(),
            "age_category": request.age_category.as_str(),
            "engine_cc_ignored": request.engine_cc
        }),
        serde_json::json!({
            "environmental_tax": environmental_tax.normalize().to_string(),
            "vat": vat.normalize().to_string()
        }),
        format!(
            "Electric propulsion: no duty or excise; flat environmental tax ${}, VAT ${}",
            environmental_tax.normalize(),
            vat.normalize()
        ),
    );

    DutyBreakdown {
        environmental_tax,
        vat,
        ..DutyBreakdown::default()
    }
}

//! Generic bracket resolution.
//!
//! A tiered schedule is an ascending list of inclusive ranges. Every lookup
//! in the engine goes through [`resolve_tier`], so adding a bracket is a
//! configuration change rather than a new branch.

use crate::config::VehicleDutyBracket;

/// A range in a tiered schedule.
///
/// Both bounds are inclusive. An upper bound of `None` is open-ended.
pub trait Tiered {
    /// Smallest value in the range.
    fn lower_bound(&self) -> u32;

    /// Largest value in the range, if bounded.
    fn upper_bound(&self) -> Option<u32>;

    /// Returns true if `value` falls within the range.
    fn contains(&self, value: u32) -> bool {
        value >= self.lower_bound() && self.upper_bound().is_none_or(|max| value <= max)
    }
}

impl Tiered for VehicleDutyBracket {
    fn lower_bound(&self) -> u32 {
        self.engine_cc_min
    }

    fn upper_bound(&self) -> Option<u32> {
        self.engine_cc_max
    }
}

/// Returns the first tier, scanning in order, that contains `value`.
///
/// # Examples
///
/// ```
/// use levy_engine::calculation::{Tiered, resolve_tier};
///
/// struct Band(u32, Option<u32>);
///
/// impl Tiered for Band {
///     fn lower_bound(&self) -> u32 { self.0 }
///     fn upper_bound(&self) -> Option<u32> { self.1 }
/// }
///
/// let bands = [Band(0, Some(1500)), Band(1501, None)];
/// assert_eq!(resolve_tier(&bands, 1500).unwrap().0, 0);
/// assert_eq!(resolve_tier(&bands, 1501).unwrap().0, 1501);
/// ```
pub fn resolve_tier<T: Tiered>(tiers: &[T], value: u32) -> Option<&T> {
    tiers.iter().find(|tier| tier.contains(value))
}

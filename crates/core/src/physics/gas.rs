//! Breathing gas consumption and cylinder depletion
//!
//! One simulated second stands for one minute of diving, so rates expressed
//! per minute are applied per tick second without conversion.
//!
//! Consumption at depth scales with absolute pressure:
//!
//! pressure drop (bar per simulated second) = ATA × RMV / cylinder volume
//!
//! Every function clamps its result at zero; callers are expected to replace
//! NaN inputs with zero before calling.

use crate::core_types::units::{Bar, Liters, LitersPerMinute, Meters, Minutes, Percent};
use crate::physics::pressure::{absolute_pressure_ata, ambient_pressure};

/// Combined gas consumption of both divers at depth (L/min)
///
/// (rate1 + rate2) × ambient pressure
#[inline]
#[must_use]
pub fn total_air_consumption(
    rate1: LitersPerMinute,
    rate2: LitersPerMinute,
    depth: Meters,
) -> LitersPerMinute {
    (rate1 + rate2) * *ambient_pressure(depth)
}

/// Simple remaining dive time estimate from cylinder fill percentages
///
/// (average fill / total air used) × 10. Zero when nothing is being consumed.
#[must_use]
pub fn remaining_dive_time(
    cylinder1: Percent,
    cylinder2: Percent,
    total_air_used: LitersPerMinute,
) -> Minutes {
    if *total_air_used <= 0.0 || total_air_used.is_nan() {
        return Minutes::ZERO;
    }
    let average = (*cylinder1 + *cylinder2) / 2.0;
    Minutes::new(average / *total_air_used * 10.0).non_negative()
}

/// Remaining dive time from cylinder pressure at the current depth
///
/// (pressure × cylinder volume) / (ATA × RMV)
///
/// # Arguments
/// * `remaining` - Current cylinder pressure
/// * `depth` - Current depth
/// * `rmv` - Respiratory minute volume at the surface
/// * `cylinder_volume` - Water capacity of the cylinder
#[must_use]
pub fn remaining_dive_time_realistic(
    remaining: Bar,
    depth: Meters,
    rmv: LitersPerMinute,
    cylinder_volume: Liters,
) -> Minutes {
    if *remaining <= 0.0 || remaining.is_nan() {
        return Minutes::ZERO;
    }
    let consumption_at_depth = absolute_pressure_ata(depth) * *rmv;
    if consumption_at_depth <= 0.0 {
        return Minutes::ZERO;
    }
    let gas_available = *remaining * *cylinder_volume;
    Minutes::new(gas_available / consumption_at_depth).non_negative()
}

/// Cylinder pressure lost per simulated second at depth (bar/s)
#[inline]
#[must_use]
pub fn pressure_drop_per_second(
    depth: Meters,
    rmv: LitersPerMinute,
    cylinder_volume: Liters,
) -> Bar {
    if *cylinder_volume <= 0.0 {
        return Bar::ZERO;
    }
    Bar::new(absolute_pressure_ata(depth) * *rmv / *cylinder_volume).non_negative()
}

/// Cylinder pressure after breathing for `elapsed_seconds` at `depth`
///
/// max(0, current - drop × elapsed)
#[must_use]
pub fn cylinder_pressure_after_tick(
    current: Bar,
    depth: Meters,
    elapsed_seconds: f64,
    rmv: LitersPerMinute,
    cylinder_volume: Liters,
) -> Bar {
    let drop = pressure_drop_per_second(depth, rmv, cylinder_volume) * elapsed_seconds.max(0.0);
    (current - drop).non_negative()
}

/// Convert cylinder pressure to a fill percentage of `max_pressure`
#[inline]
#[must_use]
pub fn pressure_to_volume_percent(pressure: Bar, max_pressure: Bar) -> Percent {
    if *max_pressure <= 0.0 {
        return Percent::ZERO;
    }
    Percent::new(*pressure / *max_pressure * 100.0).non_negative()
}

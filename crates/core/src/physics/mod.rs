//! Dive physics formulas
//!
//! Pure, deterministic functions of scalar inputs. No state and no side
//! effects; every result is clamped so pressures, volumes and times are never
//! negative.

pub mod gas;
pub mod pressure;
pub mod profile;
pub mod zones;

pub use gas::{
    cylinder_pressure_after_tick, pressure_drop_per_second, pressure_to_volume_percent,
    remaining_dive_time, remaining_dive_time_realistic, total_air_consumption,
};
pub use pressure::{
    absolute_pressure_ata, ambient_pressure, diver_pressure, umbilical_pressure, UmbilicalModel,
    LINE_LOSS_FACTOR,
};
pub use profile::ScriptedProfile;
pub use zones::{
    cylinder_pressure_zone, cylinder_volume_zone, diver_depth_zone, diver_pressure_zone,
    umbilical_pressure_zone, Zone, ZoneBands,
};

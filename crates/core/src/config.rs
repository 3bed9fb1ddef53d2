//! Simulation configuration
//!
//! Every tunable constant of a session lives here with its default. A config
//! is handed to [`DiveSimulation::new`](crate::DiveSimulation::new) and can be
//! loaded from any serde format by the host application.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::alerts::alarm::AlarmThresholds;
use crate::core_types::units::{Bar, Liters, LitersPerMinute, Percent};
use crate::error::ConfigError;
use crate::physics::{ScriptedProfile, UmbilicalModel};

/// Most decimals a tick may round to; f64 carries about 15 significant digits
pub const MAX_ROUNDING_DECIMALS: u32 = 15;

/// Thresholds that raise operator alerts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Cylinder fill at or below which the low-cylinder warning is raised
    pub low_cylinder_volume: Percent,
    /// Umbilical pressure at or below which the low-pressure warning is raised
    pub low_umbilical_pressure: Bar,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_cylinder_volume: Percent::new(20.0),
            low_umbilical_pressure: Bar::new(10.0),
        }
    }
}

/// Breathing gas and cylinder parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasModel {
    /// Respiratory minute volume at the surface used by the scripted profile
    pub rmv: LitersPerMinute,
    /// Water capacity of each cylinder
    pub cylinder_volume: Liters,
    /// Pressure of a full cylinder
    pub max_cylinder_pressure: Bar,
}

impl Default for GasModel {
    fn default() -> Self {
        Self {
            rmv: LitersPerMinute::new(15.0),
            cylinder_volume: Liters::new(50.0),
            max_cylinder_pressure: Bar::new(200.0),
        }
    }
}

/// Instant pressure losses applied by the leak drill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeakProfile {
    /// Drop in umbilical supply pressure
    pub umbilical_drop: Bar,
    /// Drop in pressure at diver 1
    pub diver1_drop: Bar,
}

impl Default for LeakProfile {
    fn default() -> Self {
        Self {
            umbilical_drop: Bar::new(5.0),
            diver1_drop: Bar::new(10.0),
        }
    }
}

/// Configuration of one simulation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Real time between auto-mode ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Entries kept in each history before the oldest is dropped
    pub history_capacity: usize,
    /// Lifetime of a warning alert before it dismisses itself (milliseconds)
    pub alert_dismiss_ms: u64,
    /// Decimal places kept on gauge values written by a tick
    pub tick_rounding_decimals: u32,
    pub thresholds: AlertThresholds,
    pub alarms: AlarmThresholds,
    pub gas: GasModel,
    pub umbilical: UmbilicalModel,
    pub leak: LeakProfile,
    pub profile: ScriptedProfile,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            history_capacity: 60,
            alert_dismiss_ms: 10_000,
            tick_rounding_decimals: 2,
            thresholds: AlertThresholds::default(),
            alarms: AlarmThresholds::default(),
            gas: GasModel::default(),
            umbilical: UmbilicalModel::default(),
            leak: LeakProfile::default(),
            profile: ScriptedProfile::default(),
        }
    }
}

impl SimulationConfig {
    /// Tick interval as a `Duration`
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Warning alert lifetime as a `Duration`
    #[must_use]
    pub fn alert_dismiss_after(&self) -> Duration {
        Duration::from_millis(self.alert_dismiss_ms)
    }

    /// Check values that would make the simulation divide by zero or stall
    ///
    /// # Errors
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "tick_interval_ms",
            });
        }
        if self.alert_dismiss_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "alert_dismiss_ms",
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                name: "history_capacity",
            });
        }
        if self.tick_rounding_decimals > MAX_ROUNDING_DECIMALS {
            return Err(ConfigError::TooLarge {
                name: "tick_rounding_decimals",
                value: u64::from(self.tick_rounding_decimals),
                max: u64::from(MAX_ROUNDING_DECIMALS),
            });
        }
        if self.profile.stage_seconds == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "profile.stage_seconds",
            });
        }
        let positive = [
            ("gas.rmv", *self.gas.rmv),
            ("gas.cylinder_volume", *self.gas.cylinder_volume),
            ("gas.max_cylinder_pressure", *self.gas.max_cylinder_pressure),
            ("profile.step", *self.profile.step),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }
}

//! Per-tick physics strategies
//!
//! Both strategies read the same [`StrategyInputs`] and produce a complete
//! [`StateDelta`]; the state validates the delta before writing any of it, so
//! a faulty tick leaves the gauges untouched.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SimulationConfig;
use crate::core_types::units::{Bar, LitersPerMinute, Meters, Minutes, Percent};
use crate::error::TickError;
use crate::physics::{
    absolute_pressure_ata, ambient_pressure, cylinder_pressure_after_tick, diver_pressure,
    pressure_to_volume_percent, remaining_dive_time_realistic, umbilical_pressure,
};
use crate::simulation::gauges::Gauge;

/// Gauge readings a strategy starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyInputs {
    pub depth: Meters,
    pub diver1_depth: Meters,
    pub diver2_depth: Meters,
    pub diver1_rate: LitersPerMinute,
    pub diver2_rate: LitersPerMinute,
    pub cylinder1_pressure: Bar,
    pub cylinder2_pressure: Bar,
}

/// Every value one tick writes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    pub depth: Meters,
    pub diver1_depth: Meters,
    pub diver2_depth: Meters,
    pub umbilical_pressure: Bar,
    pub diver1_pressure: Bar,
    pub diver2_pressure: Bar,
    pub cylinder1_pressure: Bar,
    pub cylinder2_pressure: Bar,
    pub cylinder1_volume: Percent,
    pub cylinder2_volume: Percent,
    pub ambient_pressure: Bar,
    pub total_air_used: LitersPerMinute,
    pub gas_time_remaining: Minutes,
}

impl StateDelta {
    /// Gauge writes of this delta
    #[must_use]
    pub fn gauge_values(&self) -> [(Gauge, f64); 10] {
        [
            (Gauge::Depth, *self.depth),
            (Gauge::Diver1Depth, *self.diver1_depth),
            (Gauge::Diver2Depth, *self.diver2_depth),
            (Gauge::UmbilicalPressure, *self.umbilical_pressure),
            (Gauge::Diver1Pressure, *self.diver1_pressure),
            (Gauge::Diver2Pressure, *self.diver2_pressure),
            (Gauge::Cylinder1Pressure, *self.cylinder1_pressure),
            (Gauge::Cylinder2Pressure, *self.cylinder2_pressure),
            (Gauge::Cylinder1Volume, *self.cylinder1_volume),
            (Gauge::Cylinder2Volume, *self.cylinder2_volume),
        ]
    }

    /// Reject the delta if any value is NaN or infinite
    ///
    /// # Errors
    /// Returns the first non-finite gauge or derived value.
    pub fn validate(&self) -> Result<(), TickError> {
        let bad_gauge = self.gauge_values().into_iter().find(|(_, v)| !v.is_finite());
        if let Some((gauge, value)) = bad_gauge {
            return Err(TickError::NonFiniteGauge { gauge, value });
        }
        let derived = [
            ("ambient_pressure", *self.ambient_pressure),
            ("total_air_used", *self.total_air_used),
            ("gas_time_remaining", *self.gas_time_remaining),
        ];
        if let Some((metric, value)) = derived.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(TickError::NonFiniteDerived { metric, value });
        }
        Ok(())
    }

    /// Same delta with every value rounded to `decimals`
    #[must_use]
    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            depth: self.depth.rounded(decimals),
            diver1_depth: self.diver1_depth.rounded(decimals),
            diver2_depth: self.diver2_depth.rounded(decimals),
            umbilical_pressure: self.umbilical_pressure.rounded(decimals),
            diver1_pressure: self.diver1_pressure.rounded(decimals),
            diver2_pressure: self.diver2_pressure.rounded(decimals),
            cylinder1_pressure: self.cylinder1_pressure.rounded(decimals),
            cylinder2_pressure: self.cylinder2_pressure.rounded(decimals),
            cylinder1_volume: self.cylinder1_volume.rounded(decimals),
            cylinder2_volume: self.cylinder2_volume.rounded(decimals),
            ambient_pressure: self.ambient_pressure.rounded(decimals),
            total_air_used: self.total_air_used.rounded(decimals),
            gas_time_remaining: self.gas_time_remaining.rounded(decimals),
        }
    }
}

/// Physics update used by an auto-mode tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsStrategy {
    /// Depths stay under operator control; each diver drains their own
    /// cylinder at their own depth and consumption rate
    ///
    /// Diver pressures take the line loss at each diver's own depth rather
    /// than the site depth, so a diver moved with the depth slider reads the
    /// pressure delivered where they are.
    Simple,
    /// Depth follows the scripted profile; both divers share it and breathe
    /// at the configured RMV
    ScriptedProfile,
}

impl PhysicsStrategy {
    /// Strategy selected by the realistic-profile flag
    #[must_use]
    pub fn from_flag(use_realistic_profile: bool) -> Self {
        if use_realistic_profile {
            PhysicsStrategy::ScriptedProfile
        } else {
            PhysicsStrategy::Simple
        }
    }

    /// Compute the next state from `inputs`
    ///
    /// `elapsed` is active session time and only drives the profile schedule.
    /// Each tick stands for one tick interval of breathing.
    #[must_use]
    pub fn advance(
        self,
        inputs: &StrategyInputs,
        elapsed: Duration,
        config: &SimulationConfig,
    ) -> StateDelta {
        match self {
            PhysicsStrategy::Simple => advance_simple(inputs, config),
            PhysicsStrategy::ScriptedProfile => advance_scripted(inputs, elapsed, config),
        }
    }
}

fn advance_scripted(
    inputs: &StrategyInputs,
    elapsed: Duration,
    config: &SimulationConfig,
) -> StateDelta {
    let gas = &config.gas;
    let seconds = config.tick_interval().as_secs_f64();
    let depth = config.profile.depth_at(elapsed);

    let breathe = |pressure| {
        cylinder_pressure_after_tick(pressure, depth, seconds, gas.rmv, gas.cylinder_volume)
    };
    let cylinder1_pressure = breathe(inputs.cylinder1_pressure);
    let cylinder2_pressure = breathe(inputs.cylinder2_pressure);

    let umbilical = umbilical_pressure(config.umbilical, depth);
    let diver = diver_pressure(umbilical, depth);
    let average_pressure = (cylinder1_pressure + cylinder2_pressure) / 2.0;

    StateDelta {
        depth,
        diver1_depth: depth,
        diver2_depth: depth,
        umbilical_pressure: umbilical,
        diver1_pressure: diver,
        diver2_pressure: diver,
        cylinder1_pressure,
        cylinder2_pressure,
        cylinder1_volume: pressure_to_volume_percent(cylinder1_pressure, gas.max_cylinder_pressure),
        cylinder2_volume: pressure_to_volume_percent(cylinder2_pressure, gas.max_cylinder_pressure),
        ambient_pressure: ambient_pressure(depth),
        total_air_used: gas.rmv * absolute_pressure_ata(depth),
        gas_time_remaining: remaining_dive_time_realistic(
            average_pressure,
            depth,
            gas.rmv,
            gas.cylinder_volume,
        ),
    }
}

fn advance_simple(inputs: &StrategyInputs, config: &SimulationConfig) -> StateDelta {
    let gas = &config.gas;
    let seconds = config.tick_interval().as_secs_f64();

    let cylinder1_pressure = cylinder_pressure_after_tick(
        inputs.cylinder1_pressure,
        inputs.diver1_depth,
        seconds,
        inputs.diver1_rate,
        gas.cylinder_volume,
    );
    let cylinder2_pressure = cylinder_pressure_after_tick(
        inputs.cylinder2_pressure,
        inputs.diver2_depth,
        seconds,
        inputs.diver2_rate,
        gas.cylinder_volume,
    );

    let umbilical = umbilical_pressure(config.umbilical, inputs.depth);
    let consumption1 = inputs.diver1_rate * absolute_pressure_ata(inputs.diver1_depth);
    let consumption2 = inputs.diver2_rate * absolute_pressure_ata(inputs.diver2_depth);

    let average_pressure = (cylinder1_pressure + cylinder2_pressure) / 2.0;
    let average_depth = (inputs.diver1_depth + inputs.diver2_depth) / 2.0;
    let average_rate = (inputs.diver1_rate + inputs.diver2_rate) / 2.0;

    StateDelta {
        depth: inputs.depth,
        diver1_depth: inputs.diver1_depth,
        diver2_depth: inputs.diver2_depth,
        umbilical_pressure: umbilical,
        diver1_pressure: diver_pressure(umbilical, inputs.diver1_depth),
        diver2_pressure: diver_pressure(umbilical, inputs.diver2_depth),
        cylinder1_pressure,
        cylinder2_pressure,
        cylinder1_volume: pressure_to_volume_percent(cylinder1_pressure, gas.max_cylinder_pressure),
        cylinder2_volume: pressure_to_volume_percent(cylinder2_pressure, gas.max_cylinder_pressure),
        ambient_pressure: ambient_pressure(inputs.depth),
        total_air_used: (consumption1 + consumption2) / 2.0,
        gas_time_remaining: remaining_dive_time_realistic(
            average_pressure,
            average_depth,
            average_rate,
            gas.cylinder_volume,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn inputs() -> StrategyInputs {
        StrategyInputs {
            depth: Meters::new(20.0),
            diver1_depth: Meters::new(20.0),
            diver2_depth: Meters::ZERO,
            diver1_rate: LitersPerMinute::new(15.0),
            diver2_rate: LitersPerMinute::new(25.0),
            cylinder1_pressure: Bar::new(200.0),
            cylinder2_pressure: Bar::new(200.0),
        }
    }

    #[test]
    fn test_flag_selects_strategy() {
        assert_eq!(PhysicsStrategy::from_flag(true), PhysicsStrategy::ScriptedProfile);
        assert_eq!(PhysicsStrategy::from_flag(false), PhysicsStrategy::Simple);
    }

    #[test]
    fn test_simple_uses_each_divers_depth_and_rate() {
        let cfg = SimulationConfig::default();
        let delta = PhysicsStrategy::Simple.advance(&inputs(), Duration::from_secs(3), &cfg);
        // Diver 1: 3 ATA × 15 / 50 = 0.9 bar; diver 2: 1 ATA × 25 / 50 = 0.5 bar
        assert_abs_diff_eq!(*delta.cylinder1_pressure, 199.1, epsilon = 1e-9);
        assert_abs_diff_eq!(*delta.cylinder2_pressure, 199.5, epsilon = 1e-9);
        assert_eq!(delta.depth, Meters::new(20.0));
        // (45 + 25) / 2
        assert_abs_diff_eq!(*delta.total_air_used, 35.0, epsilon = 1e-9);
        // Linear supply at 20 m: 12 bar; diver 1 loses 10 bar of line loss
        assert_abs_diff_eq!(*delta.umbilical_pressure, 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(*delta.diver1_pressure, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(*delta.diver2_pressure, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_simple_diver_pressure_uses_diver_depth_not_site_depth() {
        let cfg = SimulationConfig::default();
        let inputs = StrategyInputs {
            depth: Meters::ZERO,
            diver1_depth: Meters::new(30.0),
            ..inputs()
        };
        let delta = PhysicsStrategy::Simple.advance(&inputs, Duration::ZERO, &cfg);
        // Supply sized for the surface site: 10 bar, minus 15 bar line loss at 30 m
        assert_abs_diff_eq!(*delta.umbilical_pressure, 10.0, epsilon = 1e-9);
        assert_eq!(delta.diver1_pressure, Bar::ZERO);
        assert_abs_diff_eq!(*delta.diver2_pressure, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scripted_follows_profile_depth() {
        let cfg = SimulationConfig::default();
        let delta =
            PhysicsStrategy::ScriptedProfile.advance(&inputs(), Duration::from_secs(25), &cfg);
        assert_eq!(delta.depth, Meters::new(20.0));
        assert_eq!(delta.diver1_depth, delta.diver2_depth);
        assert_abs_diff_eq!(*delta.cylinder1_pressure, 199.1, epsilon = 1e-9);
        assert_abs_diff_eq!(*delta.cylinder1_volume, 99.55, epsilon = 1e-9);
        assert_abs_diff_eq!(*delta.total_air_used, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(*delta.ambient_pressure, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_validate_reports_non_finite_gauge() {
        let cfg = SimulationConfig::default();
        let mut delta = PhysicsStrategy::Simple.advance(&inputs(), Duration::ZERO, &cfg);
        assert_eq!(delta.validate(), Ok(()));
        delta.cylinder2_volume = Percent::new(f64::INFINITY);
        assert!(matches!(
            delta.validate(),
            Err(TickError::NonFiniteGauge {
                gauge: Gauge::Cylinder2Volume,
                ..
            })
        ));
    }

    #[test]
    fn test_rounding_applies_to_every_value() {
        let cfg = SimulationConfig::default();
        let delta = PhysicsStrategy::Simple.advance(&inputs(), Duration::ZERO, &cfg).rounded(2);
        assert_eq!(*delta.gas_time_remaining, (*delta.gas_time_remaining * 100.0).round() / 100.0);
    }
}

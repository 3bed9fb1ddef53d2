//! The simulation state container
//!
//! [`SimulationState`] owns every mutable value of a session: mode and run
//! flags, the session clock, the twelve scalar gauges, derived metrics,
//! chart histories and the alert board. Only its own methods mutate it.
//!
//! Invariants held after every public method returns:
//! - every gauge lies inside its [`GaugeRange`](crate::simulation::gauges::GaugeRange)
//! - derived metrics are consistent with the gauges (except inside a tick,
//!   between the advance and recompute steps)
//! - histories hold at most the configured capacity

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::alerts::alarm::{AlarmConditions, AlarmInputs};
use crate::alerts::board::{Alert, AlertBoard, AlertId, AlertKind};
use crate::alerts::LEAK_MESSAGE;
use crate::config::SimulationConfig;
use crate::core_types::time::Timestamp;
use crate::core_types::units::{round_to, Bar, LitersPerMinute, Meters, Minutes, Percent};
use crate::error::TickError;
use crate::physics::{
    ambient_pressure, cylinder_pressure_after_tick, cylinder_pressure_zone, cylinder_volume_zone,
    diver_depth_zone, diver_pressure_zone, pressure_to_volume_percent, remaining_dive_time,
    remaining_dive_time_realistic, total_air_consumption, umbilical_pressure_zone, Zone,
};
use crate::simulation::gauges::{CylinderSelection, Diver, Gauge};
use crate::simulation::history::History;
use crate::simulation::session::SessionClock;
use crate::simulation::strategy::{PhysicsStrategy, StateDelta, StrategyInputs};

/// Who controls the gauges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Operator sets gauges directly; no ticks
    #[default]
    Manual,
    /// Ticks drive the gauges while running
    Auto,
}

/// Mode and run flag, the inputs of the tick scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFlags {
    pub mode: Mode,
    pub is_running: bool,
}

impl RunFlags {
    /// Ticks apply only in auto mode while running
    #[must_use]
    pub fn ticks_enabled(&self) -> bool {
        self.mode == Mode::Auto && self.is_running
    }
}

// ============================================================================
// GAUGES
// ============================================================================

/// The twelve scalar gauges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauges {
    pub depth: Meters,
    pub diver1_depth: Meters,
    pub diver2_depth: Meters,
    pub diver1_rate: LitersPerMinute,
    pub diver2_rate: LitersPerMinute,
    pub umbilical_pressure: Bar,
    pub diver1_pressure: Bar,
    pub diver2_pressure: Bar,
    pub cylinder1_volume: Percent,
    pub cylinder2_volume: Percent,
    pub cylinder1_pressure: Bar,
    pub cylinder2_pressure: Bar,
}

impl Default for Gauges {
    fn default() -> Self {
        let mut gauges = Self {
            depth: Meters::ZERO,
            diver1_depth: Meters::ZERO,
            diver2_depth: Meters::ZERO,
            diver1_rate: LitersPerMinute::ZERO,
            diver2_rate: LitersPerMinute::ZERO,
            umbilical_pressure: Bar::ZERO,
            diver1_pressure: Bar::ZERO,
            diver2_pressure: Bar::ZERO,
            cylinder1_volume: Percent::ZERO,
            cylinder2_volume: Percent::ZERO,
            cylinder1_pressure: Bar::ZERO,
            cylinder2_pressure: Bar::ZERO,
        };
        for gauge in Gauge::ALL {
            gauges.write(gauge, gauge.initial());
        }
        gauges
    }
}

impl Gauges {
    /// Raw reading of one gauge
    #[must_use]
    pub fn get(&self, gauge: Gauge) -> f64 {
        match gauge {
            Gauge::Depth => *self.depth,
            Gauge::Diver1Depth => *self.diver1_depth,
            Gauge::Diver2Depth => *self.diver2_depth,
            Gauge::Diver1Rate => *self.diver1_rate,
            Gauge::Diver2Rate => *self.diver2_rate,
            Gauge::UmbilicalPressure => *self.umbilical_pressure,
            Gauge::Diver1Pressure => *self.diver1_pressure,
            Gauge::Diver2Pressure => *self.diver2_pressure,
            Gauge::Cylinder1Volume => *self.cylinder1_volume,
            Gauge::Cylinder2Volume => *self.cylinder2_volume,
            Gauge::Cylinder1Pressure => *self.cylinder1_pressure,
            Gauge::Cylinder2Pressure => *self.cylinder2_pressure,
        }
    }

    // Unchecked; callers clamp
    fn write(&mut self, gauge: Gauge, value: f64) {
        match gauge {
            Gauge::Depth => self.depth = Meters::new(value),
            Gauge::Diver1Depth => self.diver1_depth = Meters::new(value),
            Gauge::Diver2Depth => self.diver2_depth = Meters::new(value),
            Gauge::Diver1Rate => self.diver1_rate = LitersPerMinute::new(value),
            Gauge::Diver2Rate => self.diver2_rate = LitersPerMinute::new(value),
            Gauge::UmbilicalPressure => self.umbilical_pressure = Bar::new(value),
            Gauge::Diver1Pressure => self.diver1_pressure = Bar::new(value),
            Gauge::Diver2Pressure => self.diver2_pressure = Bar::new(value),
            Gauge::Cylinder1Volume => self.cylinder1_volume = Percent::new(value),
            Gauge::Cylinder2Volume => self.cylinder2_volume = Percent::new(value),
            Gauge::Cylinder1Pressure => self.cylinder1_pressure = Bar::new(value),
            Gauge::Cylinder2Pressure => self.cylinder2_pressure = Bar::new(value),
        }
    }
}

/// Metrics computed from the gauges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    /// 1 + depth / 10
    pub ambient_pressure: Bar,
    /// Both divers' consumption scaled to depth
    pub total_air_used: LitersPerMinute,
    /// Simple estimate from cylinder fill
    pub remaining_dive_time: Minutes,
    /// Pressure-based estimate written by the last tick
    pub gas_time_remaining: Minutes,
}

/// Colour zone of every zoned gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeZones {
    pub umbilical_pressure: Zone,
    pub diver1_pressure: Zone,
    pub diver2_pressure: Zone,
    pub diver1_depth: Zone,
    pub diver2_depth: Zone,
    pub cylinder1_volume: Zone,
    pub cylinder2_volume: Zone,
    pub cylinder1_pressure: Zone,
    pub cylinder2_pressure: Zone,
}

impl GaugeZones {
    #[must_use]
    pub fn classify(g: &Gauges) -> Self {
        Self {
            umbilical_pressure: umbilical_pressure_zone(g.umbilical_pressure),
            diver1_pressure: diver_pressure_zone(g.diver1_pressure),
            diver2_pressure: diver_pressure_zone(g.diver2_pressure),
            diver1_depth: diver_depth_zone(g.diver1_depth),
            diver2_depth: diver_depth_zone(g.diver2_depth),
            cylinder1_volume: cylinder_volume_zone(g.cylinder1_volume),
            cylinder2_volume: cylinder_volume_zone(g.cylinder2_volume),
            cylinder1_pressure: cylinder_pressure_zone(g.cylinder1_pressure),
            cylinder2_pressure: cylinder_pressure_zone(g.cylinder2_pressure),
        }
    }
}

/// Read-only copy of the whole state handed to consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub taken_at: Timestamp,
    pub mode: Mode,
    pub is_running: bool,
    pub session_start_time: Option<Timestamp>,
    /// Active session time in milliseconds, pauses excluded
    pub elapsed_ms: u64,
    pub use_realistic_profile: bool,
    pub selected_cylinder: CylinderSelection,
    pub gauges: Gauges,
    pub derived: Derived,
    pub zones: GaugeZones,
    pub alarms: AlarmConditions,
    pub history: History,
    pub alerts: Vec<Alert>,
}

// ============================================================================
// STATE
// ============================================================================

/// Mutable state of one simulation session
#[derive(Debug)]
pub struct SimulationState {
    config: SimulationConfig,
    mode: Mode,
    is_running: bool,
    session: SessionClock,
    use_realistic_profile: bool,
    selected_cylinder: CylinderSelection,
    gauges: Gauges,
    derived: Derived,
    history: History,
    alerts: AlertBoard,
}

impl SimulationState {
    /// Fresh state with initial gauges and consistent derived metrics
    ///
    /// The config is taken as is; [`SimulationConfig::validate`] is the
    /// caller's job.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let mut state = Self {
            mode: Mode::default(),
            is_running: false,
            session: SessionClock::default(),
            use_realistic_profile: true,
            selected_cylinder: CylinderSelection::default(),
            gauges: Gauges::default(),
            derived: Derived {
                ambient_pressure: Bar::ZERO,
                total_air_used: LitersPerMinute::ZERO,
                remaining_dive_time: Minutes::ZERO,
                gas_time_remaining: Minutes::ZERO,
            },
            history: History::new(config.history_capacity),
            alerts: AlertBoard::new(config.alert_dismiss_after()),
            config,
        };
        state.reset_derived();
        state
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    #[must_use]
    pub fn flags(&self) -> RunFlags {
        RunFlags {
            mode: self.mode,
            is_running: self.is_running,
        }
    }

    #[must_use]
    pub fn session_start_time(&self) -> Option<Timestamp> {
        self.session.start_time()
    }

    #[must_use]
    pub fn use_realistic_profile(&self) -> bool {
        self.use_realistic_profile
    }

    #[must_use]
    pub fn selected_cylinder(&self) -> CylinderSelection {
        self.selected_cylinder
    }

    #[must_use]
    pub fn gauge(&self, gauge: Gauge) -> f64 {
        self.gauges.get(gauge)
    }

    #[must_use]
    pub fn gauges(&self) -> &Gauges {
        &self.gauges
    }

    #[must_use]
    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn alerts(&self) -> &AlertBoard {
        &self.alerts
    }

    pub(crate) fn alerts_mut(&mut self) -> &mut AlertBoard {
        &mut self.alerts
    }

    /// Active session time, pauses excluded
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Duration {
        self.session.elapsed(now)
    }

    /// Alarm severities for the current readings, ignoring the run flag
    #[must_use]
    pub fn alarm_conditions(&self) -> AlarmConditions {
        let inputs = AlarmInputs {
            cylinder1_pressure: self.gauges.cylinder1_pressure,
            cylinder2_pressure: self.gauges.cylinder2_pressure,
            umbilical_pressure: self.gauges.umbilical_pressure,
            remaining_dive_time: self.derived.remaining_dive_time,
        };
        AlarmConditions::evaluate(&inputs, &self.config.alarms)
    }

    /// Consistent copy of every field
    #[must_use]
    pub fn snapshot(&self, now: Timestamp) -> SimulationSnapshot {
        let alarms = if self.is_running {
            self.alarm_conditions()
        } else {
            AlarmConditions::default()
        };
        SimulationSnapshot {
            taken_at: now,
            mode: self.mode,
            is_running: self.is_running,
            session_start_time: self.session.start_time(),
            elapsed_ms: u64::try_from(self.elapsed(now).as_millis()).unwrap_or(u64::MAX),
            use_realistic_profile: self.use_realistic_profile,
            selected_cylinder: self.selected_cylinder,
            gauges: self.gauges,
            derived: self.derived,
            zones: GaugeZones::classify(&self.gauges),
            alarms,
            history: self.history.clone(),
            alerts: self.alerts.alerts().to_vec(),
        }
    }

    // ------------------------------------------------------------------------
    // Gauge mutation
    // ------------------------------------------------------------------------

    /// Clamp `value` into the gauge's range and store it
    ///
    /// Non-finite values count as zero before clamping. Derived metrics are
    /// not recomputed. Returns the stored value.
    pub fn set_scalar(&mut self, gauge: Gauge, value: f64) -> f64 {
        let stored = gauge.range().clamp(value);
        self.gauges.write(gauge, stored);
        stored
    }

    /// Recompute derived metrics from the gauges with the simple formulas
    ///
    /// Idempotent. The pressure-based `gas_time_remaining` is left alone.
    pub fn recompute_derived(&mut self) {
        let g = &self.gauges;
        let ambient = ambient_pressure(g.depth);
        let total = total_air_consumption(g.diver1_rate, g.diver2_rate, g.depth);
        self.derived.ambient_pressure = ambient;
        self.derived.total_air_used = total;
        self.derived.remaining_dive_time =
            remaining_dive_time(g.cylinder1_volume, g.cylinder2_volume, total);
    }

    fn reset_derived(&mut self) {
        self.recompute_derived();
        let gas = &self.config.gas;
        let g = &self.gauges;
        let average_pressure = (g.cylinder1_pressure + g.cylinder2_pressure) / 2.0;
        self.derived.gas_time_remaining =
            remaining_dive_time_realistic(average_pressure, g.depth, gas.rmv, gas.cylinder_volume);
    }

    /// Consumption-rate control for one diver; clamped, derived recomputed
    pub fn set_diver_rate(&mut self, diver: Diver, rate: f64) -> f64 {
        let stored = self.set_scalar(diver.rate_gauge(), rate);
        self.recompute_derived();
        stored
    }

    /// Move one diver to `new_depth`, charging the gas the move costs
    ///
    /// Each metre travelled costs one simulated minute of breathing at the
    /// mean of the old and new depth, drawn from that diver's cylinder at the
    /// configured RMV. Returns the stored depth.
    pub fn change_diver_depth(&mut self, diver: Diver, new_depth: f64) -> f64 {
        let depth_gauge = diver.depth_gauge();
        let old = self.gauge(depth_gauge);
        let new = depth_gauge.range().clamp(new_depth);
        let travelled = (new - old).abs();

        if travelled > 0.0 {
            let gas = self.config.gas;
            let decimals = self.config.tick_rounding_decimals;
            let mean_depth = Meters::new((old + new) / 2.0);
            let pressure_gauge = diver.cylinder_pressure_gauge();
            let pressure = cylinder_pressure_after_tick(
                Bar::new(self.gauge(pressure_gauge)),
                mean_depth,
                travelled,
                gas.rmv,
                gas.cylinder_volume,
            );
            let stored = self.set_scalar(pressure_gauge, round_to(*pressure, decimals));
            let volume = pressure_to_volume_percent(Bar::new(stored), gas.max_cylinder_pressure);
            self.set_scalar(diver.cylinder_volume_gauge(), round_to(*volume, decimals));
            debug!(?diver, from = old, to = new, cylinder_pressure = stored, "diver depth changed");
        }

        self.set_scalar(depth_gauge, new);
        self.recompute_derived();
        new
    }

    // ------------------------------------------------------------------------
    // Tick pipeline steps
    // ------------------------------------------------------------------------

    /// Apply one physics step
    ///
    /// No-op (`Ok(None)`) unless in auto mode and running. The delta is
    /// rounded and validated before any gauge is written.
    ///
    /// # Errors
    /// Returns [`TickError`] when the strategy produced a non-finite value;
    /// the state is left unchanged.
    pub fn advance_tick(&mut self, now: Timestamp) -> Result<Option<StateDelta>, TickError> {
        if !self.flags().ticks_enabled() {
            return Ok(None);
        }

        let g = &self.gauges;
        let inputs = StrategyInputs {
            depth: g.depth,
            diver1_depth: g.diver1_depth,
            diver2_depth: g.diver2_depth,
            diver1_rate: g.diver1_rate,
            diver2_rate: g.diver2_rate,
            cylinder1_pressure: g.cylinder1_pressure,
            cylinder2_pressure: g.cylinder2_pressure,
        };
        let elapsed = self.elapsed(now);
        let strategy = PhysicsStrategy::from_flag(self.use_realistic_profile);

        let delta = strategy
            .advance(&inputs, elapsed, &self.config)
            .rounded(self.config.tick_rounding_decimals);
        delta.validate()?;

        for (gauge, value) in delta.gauge_values() {
            self.set_scalar(gauge, value);
        }
        self.derived.ambient_pressure = delta.ambient_pressure;
        self.derived.total_air_used = delta.total_air_used;
        self.derived.gas_time_remaining = delta.gas_time_remaining;

        debug!(
            ?strategy,
            elapsed_ms = elapsed.as_millis() as u64,
            depth = *delta.depth,
            cylinder1 = *delta.cylinder1_pressure,
            cylinder2 = *delta.cylinder2_pressure,
            "tick advanced"
        );
        Ok(Some(delta))
    }

    /// Record the current depth and umbilical pressure
    pub fn append_history(&mut self, now: Timestamp) {
        self.history
            .push(self.gauges.depth, self.gauges.umbilical_pressure, now);
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Leak drill: instant supply loss plus a critical alert
    ///
    /// Returns the alert id, or `None` if the leak alert was already active.
    pub fn trigger_leak(&mut self, now: Timestamp) -> Option<AlertId> {
        let leak = self.config.leak;
        let umbilical = (self.gauges.umbilical_pressure - leak.umbilical_drop).non_negative();
        let diver1 = (self.gauges.diver1_pressure - leak.diver1_drop).non_negative();
        self.set_scalar(Gauge::UmbilicalPressure, *umbilical);
        self.set_scalar(Gauge::Diver1Pressure, *diver1);
        self.recompute_derived();

        info!(umbilical = *umbilical, diver1 = *diver1, "air leak triggered");
        self.alerts.add(AlertKind::Critical, LEAK_MESSAGE, now)
    }

    /// Restore every gauge and derived metric to its initial value
    ///
    /// Clears histories, alerts (with their deadlines) and the session clock,
    /// and stops the run. Mode, profile flag and cylinder selection are kept.
    pub fn reset_all_gauges(&mut self) {
        self.gauges = Gauges::default();
        self.reset_derived();
        self.history.clear();
        self.alerts.clear_all();
        self.session.clear();
        self.is_running = false;
        info!(mode = ?self.mode, "gauges reset");
    }

    /// Full session reset: gauges plus profile flag and cylinder selection
    pub fn reset_simulation(&mut self) {
        self.reset_all_gauges();
        self.use_realistic_profile = true;
        self.selected_cylinder = CylinderSelection::default();
    }

    /// Start or resume; the start instant is only recorded once per session
    pub fn start_simulation(&mut self, now: Timestamp) {
        let resumed = self.session.is_paused();
        self.session.start(now);
        self.is_running = true;
        info!(
            resumed,
            start = ?self.session.start_time(),
            elapsed_ms = self.elapsed(now).as_millis() as u64,
            "simulation running"
        );
    }

    /// Stop ticking; the session clock freezes until the next start
    pub fn pause_simulation(&mut self, now: Timestamp) {
        self.session.pause(now);
        self.is_running = false;
        info!(elapsed_ms = self.elapsed(now).as_millis() as u64, "simulation paused");
    }

    /// Switch mode; any change stops the run
    ///
    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: Mode, now: Timestamp) -> bool {
        if mode == self.mode {
            return false;
        }
        if self.is_running {
            self.pause_simulation(now);
        }
        info!(from = ?self.mode, to = ?mode, "mode changed");
        self.mode = mode;
        true
    }

    /// Choose which cylinder the metrics view highlights; no physics effect
    pub fn set_selected_cylinder(&mut self, selection: CylinderSelection) {
        self.selected_cylinder = selection;
    }

    /// Choose between the scripted profile and the simple strategy
    pub fn set_realistic_profile(&mut self, enabled: bool) {
        self.use_realistic_profile = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn t(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn state() -> SimulationState {
        SimulationState::new(SimulationConfig::default())
    }

    #[test]
    fn test_initial_derived_values() {
        let s = state();
        assert_abs_diff_eq!(*s.derived().ambient_pressure, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(*s.derived().total_air_used, 135.0, epsilon = 1e-9);
        assert_abs_diff_eq!(*s.derived().remaining_dive_time, 1000.0 / 135.0, epsilon = 1e-9);
        assert_abs_diff_eq!(*s.derived().gas_time_remaining, 10_000.0 / 45.0, epsilon = 1e-9);
        assert_eq!(s.mode(), Mode::Manual);
        assert!(!s.is_running());
        assert!(s.use_realistic_profile());
    }

    #[test]
    fn test_every_gauge_clamps() {
        let mut s = state();
        for gauge in Gauge::ALL {
            let range = gauge.range();
            assert_eq!(s.set_scalar(gauge, range.max + 100.0), range.max);
            assert_eq!(s.gauge(gauge), range.max);
            assert_eq!(s.set_scalar(gauge, range.min - 100.0), range.min);
            assert_eq!(s.set_scalar(gauge, f64::NAN), range.clamp(0.0));
        }
    }

    #[test]
    fn test_recompute_tracks_depth() {
        let mut s = state();
        for depth in [0.0, 7.3, 33.33, 40.0] {
            s.set_scalar(Gauge::Depth, depth);
            s.recompute_derived();
            s.recompute_derived();
            assert_abs_diff_eq!(*s.derived().ambient_pressure, 1.0 + depth / 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_advance_is_noop_unless_auto_and_running() {
        let mut s = state();
        s.start_simulation(t(0));
        assert_eq!(s.advance_tick(t(1_000)), Ok(None));

        s.set_mode(Mode::Auto, t(1_000));
        assert!(!s.is_running());
        assert_eq!(s.advance_tick(t(2_000)), Ok(None));

        s.start_simulation(t(2_000));
        assert!(s.advance_tick(t(3_000)).unwrap().is_some());
    }

    #[test]
    fn test_tick_values_are_rounded() {
        let mut s = state();
        s.set_realistic_profile(false);
        s.set_mode(Mode::Auto, t(0));
        s.start_simulation(t(0));
        s.set_scalar(Gauge::Diver1Depth, 13.0);
        s.advance_tick(t(1_000)).unwrap();
        for gauge in Gauge::ALL {
            let v = s.gauge(gauge);
            assert_eq!(v, round_to(v, 2), "{gauge:?}");
        }
    }

    #[test]
    fn test_cylinder_selection_has_no_physics_effect() {
        let run = |selection| {
            let mut s = state();
            s.set_realistic_profile(false);
            s.set_selected_cylinder(selection);
            s.set_scalar(Gauge::Diver1Depth, 30.0);
            s.set_mode(Mode::Auto, t(0));
            s.start_simulation(t(0));
            s.advance_tick(t(1_000)).unwrap();
            *s.gauges()
        };
        let both = run(CylinderSelection::Both);
        assert_eq!(run(CylinderSelection::One), both);
        assert_eq!(run(CylinderSelection::Two), both);
        // Each diver drains their own cylinder; diver 1 is deeper
        assert!(both.cylinder1_pressure < both.cylinder2_pressure);
    }

    #[test]
    fn test_leak_scenario() {
        let mut s = state();
        let id = s.trigger_leak(t(0));
        assert!(id.is_some());
        assert_eq!(s.gauge(Gauge::UmbilicalPressure), 5.0);
        assert_eq!(s.gauge(Gauge::Diver1Pressure), 170.0);
        assert!(s.trigger_leak(t(1)).is_none());
        let critical: Vec<_> = s
            .alerts()
            .alerts()
            .iter()
            .filter(|a| a.kind == AlertKind::Critical && a.message == LEAK_MESSAGE)
            .collect();
        assert_eq!(critical.len(), 1);
    }

    #[test]
    fn test_leak_floors_at_zero() {
        let mut s = state();
        s.set_scalar(Gauge::UmbilicalPressure, 2.0);
        s.set_scalar(Gauge::Diver1Pressure, 4.0);
        s.trigger_leak(t(0));
        assert_eq!(s.gauge(Gauge::UmbilicalPressure), 0.0);
        assert_eq!(s.gauge(Gauge::Diver1Pressure), 0.0);
    }

    #[test]
    fn test_set_mode_stops_running() {
        let mut s = state();
        s.set_mode(Mode::Auto, t(0));
        s.start_simulation(t(0));
        assert!(!s.set_mode(Mode::Auto, t(500)));
        assert!(s.is_running());
        assert!(s.set_mode(Mode::Manual, t(1_000)));
        assert!(!s.is_running());
        assert_eq!(s.elapsed(t(9_000)), Duration::from_secs(1));
    }

    #[test]
    fn test_reset_all_gauges_preserves_mode_and_flags() {
        let mut s = state();
        s.set_mode(Mode::Auto, t(0));
        s.set_realistic_profile(false);
        s.set_selected_cylinder(CylinderSelection::Two);
        s.start_simulation(t(0));
        s.set_scalar(Gauge::Depth, 35.0);
        s.append_history(t(0));
        s.trigger_leak(t(0));

        s.reset_all_gauges();
        assert_eq!(*s.gauges(), Gauges::default());
        assert_abs_diff_eq!(*s.derived().ambient_pressure, 3.0, epsilon = 1e-9);
        assert!(s.history().is_empty());
        assert!(s.alerts().is_empty());
        assert_eq!(s.session_start_time(), None);
        assert!(!s.is_running());
        assert_eq!(s.mode(), Mode::Auto);
        assert!(!s.use_realistic_profile());
        assert_eq!(s.selected_cylinder(), CylinderSelection::Two);

        s.reset_simulation();
        assert!(s.use_realistic_profile());
        assert_eq!(s.selected_cylinder(), CylinderSelection::Both);
        assert_eq!(s.mode(), Mode::Auto);
    }

    #[test]
    fn test_change_diver_depth_consumes_gas() {
        let mut s = state();
        let stored = s.change_diver_depth(Diver::One, 20.0);
        assert_eq!(stored, 20.0);
        // 20 minutes at a mean of 10 m: 2 ATA × 15 / 50 × 20 = 12 bar
        assert_abs_diff_eq!(s.gauge(Gauge::Cylinder1Pressure), 188.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.gauge(Gauge::Cylinder1Volume), 94.0, epsilon = 1e-9);
        assert_eq!(s.gauge(Gauge::Cylinder2Pressure), 200.0);

        let unchanged = s.gauge(Gauge::Cylinder1Pressure);
        s.change_diver_depth(Diver::One, 20.0);
        assert_eq!(s.gauge(Gauge::Cylinder1Pressure), unchanged);
    }

    #[test]
    fn test_set_diver_rate_recomputes() {
        let mut s = state();
        assert_eq!(s.set_diver_rate(Diver::Two, 80.0), 50.0);
        // (20 + 50) × 3
        assert_abs_diff_eq!(*s.derived().total_air_used, 210.0, epsilon = 1e-9);
    }

    #[test]
    fn test_snapshot_silences_alarms_when_stopped() {
        let mut s = state();
        s.set_scalar(Gauge::Cylinder1Pressure, 5.0);
        assert!(s.alarm_conditions().cylinder_pressure.is_some());
        assert!(!s.snapshot(t(0)).alarms.any());
    }
}

//! Dive simulation session
//!
//! [`DiveSimulation`] is the command surface of one session. It owns the
//! [`SimulationState`], the [`AlertEngine`], the [`TickScheduler`], the
//! [`AlarmMonitor`] and the snapshot subscribers, and keeps them in step:
//! every command informs the scheduler of the new run flags, refreshes the
//! alarm conditions and publishes a snapshot.
//!
//! Time never advances on its own. A host calls [`DiveSimulation::pump`]
//! periodically (see [`RealtimeDriver`](crate::runtime::RealtimeDriver)) to
//! fire alert deadlines and due ticks.

pub mod gauges;
pub mod history;
pub mod session;
pub mod state;
pub mod strategy;
pub mod subscription;

pub use gauges::{CylinderSelection, Diver, Gauge, GaugeRange};
pub use history::History;
pub use session::SessionClock;
pub use state::{Derived, GaugeZones, Gauges, Mode, RunFlags, SimulationSnapshot, SimulationState};
pub use strategy::{PhysicsStrategy, StateDelta, StrategyInputs};
pub use subscription::{PublishOutcome, SubscriberSet, Subscription};

use std::sync::Arc;
use tracing::debug;

use crate::alerts::alarm::{AlarmConditions, AlarmMonitor, AlarmTransition};
use crate::alerts::board::{Alert, AlertId};
use crate::alerts::engine::AlertEngine;
use crate::config::SimulationConfig;
use crate::core_types::time::Timestamp;
use crate::error::{ConfigError, TickError};
use crate::manual_input::{ManualInput, ManualInputGateway};
use crate::scheduler::{TickReport, TickScheduler};

/// What one [`DiveSimulation::pump`] call did
#[derive(Debug, Default)]
pub struct PumpReport {
    /// Warnings whose dismiss deadline passed
    pub dismissed: Vec<AlertId>,
    /// The tick that ran, if one was due
    pub tick: Option<Result<TickReport, TickError>>,
    /// Alarm changes since the previous pump, including those caused by commands
    pub alarm_transitions: Vec<AlarmTransition>,
    /// Whether subscribers were sent a snapshot
    pub published: bool,
}

/// One simulation session and its collaborators
#[derive(Debug)]
pub struct DiveSimulation {
    state: SimulationState,
    engine: AlertEngine,
    scheduler: TickScheduler,
    alarms: AlarmMonitor,
    pending_transitions: Vec<AlarmTransition>,
    subscribers: SubscriberSet,
}

impl Default for DiveSimulation {
    fn default() -> Self {
        Self::build(SimulationConfig::default())
    }
}

impl DiveSimulation {
    /// Create a session from a validated config
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the config fails [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        Self {
            engine: AlertEngine::new(config.thresholds),
            scheduler: TickScheduler::new(config.tick_interval()),
            alarms: AlarmMonitor::new(),
            pending_transitions: Vec::new(),
            subscribers: SubscriberSet::new(),
            state: SimulationState::new(config),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        self.state.config()
    }

    #[must_use]
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn alert_engine(&self) -> &AlertEngine {
        &self.engine
    }

    /// Active alerts in insertion order
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        self.state.alerts().alerts()
    }

    /// Alarm conditions as of the last command or pump
    #[must_use]
    pub fn alarm_conditions(&self) -> AlarmConditions {
        self.alarms.current()
    }

    #[must_use]
    pub fn snapshot(&self, now: Timestamp) -> SimulationSnapshot {
        self.state.snapshot(now)
    }

    /// Receive a snapshot after every change, buffering up to `capacity`
    pub fn subscribe(&mut self, capacity: usize) -> Subscription {
        self.subscribers.subscribe(capacity)
    }

    /// Snapshots lost to full subscriber buffers
    #[must_use]
    pub fn dropped_snapshots(&self) -> u64 {
        self.subscribers.dropped_total()
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Advance the session to `now`
    ///
    /// Fires due alert deadlines, then the scheduler (at most one tick), then
    /// refreshes the alarm conditions. Publishes a snapshot if anything changed.
    pub fn pump(&mut self, now: Timestamp) -> PumpReport {
        let dismissed = self.state.alerts_mut().fire_due(now);
        if !dismissed.is_empty() {
            debug!(count = dismissed.len(), "warnings auto-dismissed");
        }
        let tick = self.scheduler.poll(&mut self.state, &self.engine, now);
        self.update_alarms();
        let alarm_transitions = std::mem::take(&mut self.pending_transitions);

        let changed = !dismissed.is_empty() || tick.is_some() || !alarm_transitions.is_empty();
        if changed {
            self.publish(now);
        }
        PumpReport {
            dismissed,
            tick,
            alarm_transitions,
            published: changed,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Switch mode; any change stops the run
    pub fn set_mode(&mut self, mode: Mode, now: Timestamp) {
        self.state.set_mode(mode, now);
        self.after_command(now);
    }

    pub fn start(&mut self, now: Timestamp) {
        self.state.start_simulation(now);
        self.after_command(now);
    }

    pub fn pause(&mut self, now: Timestamp) {
        self.state.pause_simulation(now);
        self.after_command(now);
    }

    pub fn reset_all_gauges(&mut self, now: Timestamp) {
        self.state.reset_all_gauges();
        self.after_command(now);
    }

    pub fn reset_simulation(&mut self, now: Timestamp) {
        self.state.reset_simulation();
        self.after_command(now);
    }

    /// Leak drill; returns the new critical alert, if not already raised
    pub fn trigger_leak(&mut self, now: Timestamp) -> Option<AlertId> {
        let id = self.state.trigger_leak(now);
        self.after_command(now);
        id
    }

    /// Text override of one gauge (manual mode only)
    pub fn set_manual_value(&mut self, gauge: Gauge, raw: &str, now: Timestamp) -> ManualInput {
        let outcome = ManualInputGateway::set_manual_value(&mut self.state, gauge, raw);
        if outcome.is_applied() {
            self.after_command(now);
        }
        outcome
    }

    /// Numeric override of one gauge (manual mode only)
    pub fn set_manual_number(&mut self, gauge: Gauge, value: f64, now: Timestamp) -> ManualInput {
        let outcome = ManualInputGateway::set_manual_number(&mut self.state, gauge, value);
        if outcome.is_applied() {
            self.after_command(now);
        }
        outcome
    }

    /// Depth slider for one diver (manual mode only); charges the gas used
    pub fn change_diver_depth(&mut self, diver: Diver, depth: f64, now: Timestamp) -> ManualInput {
        let outcome = ManualInputGateway::change_diver_depth(&mut self.state, diver, depth);
        if outcome.is_applied() {
            self.after_command(now);
        }
        outcome
    }

    /// Consumption-rate control for one diver (manual mode only)
    pub fn set_diver_rate(&mut self, diver: Diver, rate: f64, now: Timestamp) -> ManualInput {
        let outcome = ManualInputGateway::set_diver_rate(&mut self.state, diver, rate);
        if outcome.is_applied() {
            self.after_command(now);
        }
        outcome
    }

    pub fn set_selected_cylinder(&mut self, selection: CylinderSelection, now: Timestamp) {
        self.state.set_selected_cylinder(selection);
        self.after_command(now);
    }

    pub fn set_realistic_profile(&mut self, enabled: bool, now: Timestamp) {
        self.state.set_realistic_profile(enabled);
        self.after_command(now);
    }

    /// Operator dismissal; unknown ids are ignored
    pub fn dismiss_alert(&mut self, id: AlertId, now: Timestamp) -> bool {
        let removed = self.state.alerts_mut().remove(id);
        if removed {
            self.after_command(now);
        }
        removed
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn after_command(&mut self, now: Timestamp) {
        self.scheduler.on_state_change(self.state.flags(), now);
        self.update_alarms();
        self.publish(now);
    }

    fn update_alarms(&mut self) {
        let transitions = self
            .alarms
            .update(self.state.alarm_conditions(), self.state.is_running());
        if !transitions.is_empty() {
            debug!(?transitions, "alarm conditions changed");
        }
        self.pending_transitions.extend(transitions);
    }

    fn publish(&mut self, now: Timestamp) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = Arc::new(self.state.snapshot(now));
        self.subscribers.publish(&snapshot);
    }
}

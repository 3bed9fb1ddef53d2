//! Tick scheduler
//!
//! A two-state machine. It is Idle until told (via [`TickScheduler::on_state_change`])
//! that the state is in auto mode and running, then Ticking with a due
//! instant. [`TickScheduler::poll`] runs at most one tick per call, and only
//! once the due instant has passed; missed intervals are not caught up. If
//! the clock steps backwards the due instant is pulled in to one interval
//! from the new "now", so ticking resumes at the normal cadence.
//!
//! One tick is always, in this order:
//! 1. [`SimulationState::advance_tick`]
//! 2. [`SimulationState::recompute_derived`]
//! 3. [`SimulationState::append_history`]
//! 4. [`AlertEngine::evaluate`]
//!
//! A failing tick is abandoned after logging; the scheduler keeps its phase
//! and the next interval runs normally.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::alerts::engine::{AlertChanges, AlertEngine};
use crate::core_types::time::Timestamp;
use crate::error::TickError;
use crate::simulation::state::{RunFlags, SimulationState};
use crate::simulation::strategy::StateDelta;

/// Scheduler phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerPhase {
    Idle,
    Ticking { next_due: Timestamp },
}

/// What one completed tick did
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub at: Timestamp,
    /// `None` if the state refused to advance
    pub delta: Option<StateDelta>,
    pub alerts: AlertChanges,
}

/// Periodic driver of the tick pipeline
#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    phase: SchedulerPhase,
    ticks: u64,
    failures: u64,
}

impl TickScheduler {
    /// Idle scheduler ticking every `interval` once started
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            phase: SchedulerPhase::Idle,
            ticks: 0,
            failures: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        matches!(self.phase, SchedulerPhase::Ticking { .. })
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Completed ticks
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Abandoned ticks
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Instant of the next tick, if ticking
    #[must_use]
    pub fn next_due(&self) -> Option<Timestamp> {
        match self.phase {
            SchedulerPhase::Idle => None,
            SchedulerPhase::Ticking { next_due } => Some(next_due),
        }
    }

    /// React to a state change
    ///
    /// Idle becomes Ticking (first tick one interval from `now`) when ticks
    /// are enabled; Ticking becomes Idle when they are not. Anything else is
    /// a no-op, so an already ticking scheduler keeps its due instant.
    pub fn on_state_change(&mut self, flags: RunFlags, now: Timestamp) {
        match (self.phase, flags.ticks_enabled()) {
            (SchedulerPhase::Idle, true) => {
                let next_due = now.plus(self.interval);
                self.phase = SchedulerPhase::Ticking { next_due };
                info!(
                    %next_due,
                    interval_ms = self.interval.as_millis() as u64,
                    "tick scheduler started"
                );
            }
            (SchedulerPhase::Ticking { .. }, false) => {
                self.phase = SchedulerPhase::Idle;
                info!(ticks = self.ticks, failures = self.failures, "tick scheduler stopped");
            }
            _ => {}
        }
    }

    /// Run the tick pipeline if one is due
    ///
    /// Returns `None` when idle or not yet due. A failed tick is logged,
    /// counted and returned as `Some(Err(..))`.
    pub fn poll(
        &mut self,
        state: &mut SimulationState,
        engine: &AlertEngine,
        now: Timestamp,
    ) -> Option<Result<TickReport, TickError>> {
        let SchedulerPhase::Ticking { next_due } = self.phase else {
            return None;
        };
        if now < next_due {
            // A due instant more than one interval away means the clock stepped back
            let rearmed = now.plus(self.interval);
            if rearmed < next_due {
                warn!(%now, %next_due, %rearmed, "clock moved backwards, tick rearmed");
                self.phase = SchedulerPhase::Ticking { next_due: rearmed };
            }
            return None;
        }
        self.phase = SchedulerPhase::Ticking {
            next_due: now.plus(self.interval),
        };

        let result = Self::run_tick(state, engine, now);
        match &result {
            Ok(report) => {
                self.ticks += 1;
                debug!(
                    tick = self.ticks,
                    at = %now,
                    advanced = report.delta.is_some(),
                    "tick complete"
                );
            }
            Err(err) => {
                self.failures += 1;
                error!(error = %err, at = %now, failures = self.failures, "tick abandoned");
            }
        }
        Some(result)
    }

    fn run_tick(
        state: &mut SimulationState,
        engine: &AlertEngine,
        now: Timestamp,
    ) -> Result<TickReport, TickError> {
        let delta = state.advance_tick(now)?;
        state.recompute_derived();
        state.append_history(now);
        let alerts = engine.evaluate(state, now);
        Ok(TickReport { at: now, delta, alerts })
    }
}

//! Threshold evaluation
//!
//! Runs as the last step of every tick. Each condition owns one message: while
//! the condition holds, a warning with that message is kept on the board (the
//! board refuses duplicates); once it clears, the warning is removed and its
//! dismiss deadline cancelled.

use tracing::debug;

use crate::alerts::board::{AlertId, AlertKind};
use crate::alerts::{LOW_CYLINDER_MESSAGE, LOW_UMBILICAL_MESSAGE};
use crate::config::AlertThresholds;
use crate::core_types::time::Timestamp;
use crate::simulation::gauges::Gauge;
use crate::simulation::state::SimulationState;

/// Alerts raised and removed by one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertChanges {
    pub raised: Vec<AlertId>,
    pub resolved: Vec<AlertId>,
}

impl AlertChanges {
    /// Whether the evaluation changed the board
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raised.is_empty() && self.resolved.is_empty()
    }
}

/// Evaluates state against the configured alert thresholds
#[derive(Debug, Clone)]
pub struct AlertEngine {
    thresholds: AlertThresholds,
}

impl AlertEngine {
    #[must_use]
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Low cylinder: either cylinder at or below the fill threshold
    #[must_use]
    pub fn low_cylinder(&self, state: &SimulationState) -> bool {
        let limit = *self.thresholds.low_cylinder_volume;
        state.gauge(Gauge::Cylinder1Volume) <= limit || state.gauge(Gauge::Cylinder2Volume) <= limit
    }

    /// Low umbilical: supply pressure at or below the threshold
    #[must_use]
    pub fn low_umbilical(&self, state: &SimulationState) -> bool {
        state.gauge(Gauge::UmbilicalPressure) <= *self.thresholds.low_umbilical_pressure
    }

    /// Raise or resolve the threshold warnings for the current readings
    pub fn evaluate(&self, state: &mut SimulationState, now: Timestamp) -> AlertChanges {
        let conditions = [
            (LOW_CYLINDER_MESSAGE, self.low_cylinder(state)),
            (LOW_UMBILICAL_MESSAGE, self.low_umbilical(state)),
        ];

        let mut changes = AlertChanges::default();
        let board = state.alerts_mut();
        for (message, active) in conditions {
            match (active, board.find_by_message(message).map(|a| a.id)) {
                (true, None) => {
                    changes.raised.extend(board.add(AlertKind::Warning, message, now));
                }
                (false, Some(id)) => {
                    board.remove(id);
                    changes.resolved.push(id);
                }
                _ => {}
            }
        }

        if !changes.is_empty() {
            debug!(
                raised = changes.raised.len(),
                resolved = changes.resolved.len(),
                "alert evaluation changed the board"
            );
        }
        changes
    }
}

//! Operator gauge overrides
//!
//! Input arrives as text from a form field or as a number from a slider.
//! Every override, including the per-diver depth and consumption controls,
//! is refused in auto mode where the ticks own the gauges.
//! Unparsable text is ignored and the previous value kept; numbers are
//! clamped into the gauge range. Derived metrics are recomputed before the
//! call returns, so the next read is always consistent.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::simulation::gauges::{Diver, Gauge};
use crate::simulation::state::{Mode, SimulationState};

/// Why an override was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Not a finite number
    InvalidNumber,
    /// Ticks own the gauges in auto mode
    AutoModeActive,
}

/// Outcome of an override
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum ManualInput {
    /// Value actually stored, after clamping
    Applied(f64),
    Ignored(IgnoreReason),
}

impl ManualInput {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, ManualInput::Applied(_))
    }
}

/// Parse operator text as a gauge reading
///
/// Surrounding whitespace is allowed; NaN and infinities are rejected.
#[must_use]
pub fn parse_reading(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates, clamps and applies operator overrides
pub struct ManualInputGateway;

impl ManualInputGateway {
    /// Apply a text override to `gauge`
    pub fn set_manual_value(state: &mut SimulationState, gauge: Gauge, raw: &str) -> ManualInput {
        let Some(value) = parse_reading(raw) else {
            warn!(?gauge, raw, "ignoring non-numeric manual input");
            return ManualInput::Ignored(IgnoreReason::InvalidNumber);
        };
        Self::set_manual_number(state, gauge, value)
    }

    /// Apply a numeric override to `gauge`
    pub fn set_manual_number(state: &mut SimulationState, gauge: Gauge, value: f64) -> ManualInput {
        if let Some(ignored) = Self::reject(state, gauge, value) {
            return ignored;
        }
        let stored = state.set_scalar(gauge, value);
        state.recompute_derived();
        ManualInput::Applied(stored)
    }

    /// Move one diver through the depth slider, charging gas for the move
    pub fn change_diver_depth(
        state: &mut SimulationState,
        diver: Diver,
        depth: f64,
    ) -> ManualInput {
        if let Some(ignored) = Self::reject(state, diver.depth_gauge(), depth) {
            return ignored;
        }
        ManualInput::Applied(state.change_diver_depth(diver, depth))
    }

    /// Consumption-rate control for one diver
    pub fn set_diver_rate(state: &mut SimulationState, diver: Diver, rate: f64) -> ManualInput {
        if let Some(ignored) = Self::reject(state, diver.rate_gauge(), rate) {
            return ignored;
        }
        ManualInput::Applied(state.set_diver_rate(diver, rate))
    }

    fn reject(state: &SimulationState, gauge: Gauge, value: f64) -> Option<ManualInput> {
        if !value.is_finite() {
            warn!(?gauge, value, "ignoring non-finite manual input");
            return Some(ManualInput::Ignored(IgnoreReason::InvalidNumber));
        }
        if state.mode() == Mode::Auto {
            warn!(?gauge, value, "ignoring manual input in auto mode");
            return Some(ManualInput::Ignored(IgnoreReason::AutoModeActive));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::core_types::time::Timestamp;
    use approx::assert_abs_diff_eq;

    fn state() -> SimulationState {
        SimulationState::new(SimulationConfig::default())
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading(" 12.5 "), Some(12.5));
        assert_eq!(parse_reading("abc"), None);
        assert_eq!(parse_reading(""), None);
        assert_eq!(parse_reading("NaN"), None);
        assert_eq!(parse_reading("inf"), None);
    }

    #[test]
    fn test_garbage_keeps_previous_value() {
        let mut s = state();
        let before = s.gauge(Gauge::Depth);
        assert_eq!(
            ManualInputGateway::set_manual_value(&mut s, Gauge::Depth, "deep"),
            ManualInput::Ignored(IgnoreReason::InvalidNumber)
        );
        assert_eq!(s.gauge(Gauge::Depth), before);
    }

    #[test]
    fn test_applied_value_is_clamped_and_derived_recomputed() {
        let mut s = state();
        let outcome = ManualInputGateway::set_manual_value(&mut s, Gauge::Depth, "55");
        assert_eq!(outcome, ManualInput::Applied(40.0));
        assert_abs_diff_eq!(*s.derived().ambient_pressure, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_auto_mode_is_refused() {
        let mut s = state();
        s.set_mode(Mode::Auto, Timestamp::from_millis(0));
        assert_eq!(
            ManualInputGateway::set_manual_number(&mut s, Gauge::UmbilicalPressure, 3.0),
            ManualInput::Ignored(IgnoreReason::AutoModeActive)
        );
        assert_eq!(
            ManualInputGateway::change_diver_depth(&mut s, Diver::Two, 12.0),
            ManualInput::Ignored(IgnoreReason::AutoModeActive)
        );
        assert_eq!(s.gauge(Gauge::UmbilicalPressure), 10.0);
    }

    #[test]
    fn test_diver_rate_gated_like_depth() {
        let mut s = state();
        assert_eq!(
            ManualInputGateway::set_diver_rate(&mut s, Diver::One, 80.0),
            ManualInput::Applied(50.0)
        );
        s.set_mode(Mode::Auto, Timestamp::from_millis(0));
        s.start_simulation(Timestamp::from_millis(0));
        assert_eq!(
            ManualInputGateway::set_diver_rate(&mut s, Diver::One, 12.0),
            ManualInput::Ignored(IgnoreReason::AutoModeActive)
        );
        assert_eq!(s.gauge(Gauge::Diver1Rate), 50.0);
        assert_eq!(
            ManualInputGateway::set_diver_rate(&mut s, Diver::Two, f64::NAN),
            ManualInput::Ignored(IgnoreReason::InvalidNumber)
        );
    }

    #[test]
    fn test_diver_depth_slider() {
        let mut s = state();
        let outcome = ManualInputGateway::change_diver_depth(&mut s, Diver::Two, 10.0);
        assert_eq!(outcome, ManualInput::Applied(10.0));
        assert!(s.gauge(Gauge::Cylinder2Pressure) < 200.0);
    }
}

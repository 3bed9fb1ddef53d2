//! Scripted training dive profile
//!
//! Replaces direct depth control during the scripted auto simulation. Depth
//! moves in fixed steps at the start of each stage: down to the peak depth one
//! step per stage, then back up one step per stage, and stays at the surface
//! once the profile is complete.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core_types::units::Meters;

/// Stage timing and depth steps of the scripted profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedProfile {
    /// Length of one stage in simulated seconds
    pub stage_seconds: u64,
    /// Depth change per stage
    pub step: Meters,
    /// Deepest point of the profile
    pub peak: Meters,
}

impl Default for ScriptedProfile {
    fn default() -> Self {
        Self {
            stage_seconds: 10,
            step: Meters::new(10.0),
            peak: Meters::new(40.0),
        }
    }
}

impl ScriptedProfile {
    /// Number of stages it takes to reach the peak
    #[must_use]
    pub fn stages_to_peak(&self) -> u64 {
        if *self.step <= 0.0 {
            return 0;
        }
        (*self.peak / *self.step).ceil() as u64
    }

    /// Zero-based stage index at `elapsed`
    #[must_use]
    pub fn stage_at(&self, elapsed: Duration) -> u64 {
        elapsed.as_secs() / self.stage_seconds.max(1)
    }

    /// Profile depth after `elapsed` active simulation time
    ///
    /// With the defaults: stages 0..=4 give 0, 10, 20, 30, 40 m; stages 5..=8
    /// give 30, 20, 10, 0 m; later stages stay at 0 m.
    #[must_use]
    pub fn depth_at(&self, elapsed: Duration) -> Meters {
        let stage = self.stage_at(elapsed);
        let to_peak = self.stages_to_peak();
        let depth = if stage <= to_peak {
            (*self.step * stage as f64).min(*self.peak)
        } else {
            *self.peak - *self.step * (stage - to_peak) as f64
        };
        Meters::new(depth).non_negative()
    }
}

//! Audible alarm conditions
//!
//! The sound collaborator only needs to know, per channel, whether an alarm
//! is active and how severe it is. [`AlarmConditions::evaluate`] derives that
//! from a snapshot each tick; [`AlarmMonitor`] turns successive conditions into
//! start/escalate/downgrade/clear transitions so the collaborator can start
//! and stop its repeating cues.

use serde::{Deserialize, Serialize};

use crate::core_types::units::{Bar, Minutes};

/// Severity of an audible alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// Independent alarm channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmChannel {
    CylinderPressure,
    UmbilicalPressure,
    DiveTime,
}

/// Thresholds for the audible alarm channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmThresholds {
    /// Either cylinder below this pressure: warning
    pub cylinder_warning: Bar,
    /// Either cylinder below this pressure: critical
    pub cylinder_critical: Bar,
    /// Umbilical safe band (inclusive); outside it: warning
    pub umbilical_safe: (Bar, Bar),
    /// Umbilical critical band (inclusive); outside it: critical
    pub umbilical_critical: (Bar, Bar),
    /// Remaining dive time below this: warning
    pub dive_time_warning: Minutes,
    /// Remaining dive time below this: critical
    pub dive_time_critical: Minutes,
}

impl Default for AlarmThresholds {
    fn default() -> Self {
        Self {
            cylinder_warning: Bar::new(20.0),
            cylinder_critical: Bar::new(10.0),
            umbilical_safe: (Bar::new(7.0), Bar::new(20.0)),
            umbilical_critical: (Bar::new(3.0), Bar::new(25.0)),
            dive_time_warning: Minutes::new(5.0),
            dive_time_critical: Minutes::new(2.0),
        }
    }
}

/// Readings the alarm channels are derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmInputs {
    pub cylinder1_pressure: Bar,
    pub cylinder2_pressure: Bar,
    pub umbilical_pressure: Bar,
    pub remaining_dive_time: Minutes,
}

/// Current alarm state of every channel; `None` means silent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlarmConditions {
    pub cylinder_pressure: Option<Severity>,
    pub umbilical_pressure: Option<Severity>,
    pub dive_time: Option<Severity>,
}

impl AlarmConditions {
    /// Derive every channel from the current readings
    ///
    /// A zero umbilical pressure or zero remaining time means "no reading" and
    /// keeps the channel silent.
    #[must_use]
    pub fn evaluate(inputs: &AlarmInputs, thresholds: &AlarmThresholds) -> Self {
        let lowest_cylinder = inputs.cylinder1_pressure.min(inputs.cylinder2_pressure);
        let cylinder_pressure = if lowest_cylinder < thresholds.cylinder_critical {
            Some(Severity::Critical)
        } else if lowest_cylinder < thresholds.cylinder_warning {
            Some(Severity::Warning)
        } else {
            None
        };

        let outside = |p: Bar, (lo, hi): (Bar, Bar)| p < lo || p > hi;
        let umbilical = inputs.umbilical_pressure;
        let umbilical_pressure = if *umbilical <= 0.0 {
            None
        } else if outside(umbilical, thresholds.umbilical_critical) {
            Some(Severity::Critical)
        } else if outside(umbilical, thresholds.umbilical_safe) {
            Some(Severity::Warning)
        } else {
            None
        };

        let remaining = inputs.remaining_dive_time;
        let dive_time = if *remaining <= 0.0 {
            None
        } else if remaining < thresholds.dive_time_critical {
            Some(Severity::Critical)
        } else if remaining < thresholds.dive_time_warning {
            Some(Severity::Warning)
        } else {
            None
        };

        Self {
            cylinder_pressure,
            umbilical_pressure,
            dive_time,
        }
    }

    /// Severity of one channel
    #[must_use]
    pub fn channel(&self, channel: AlarmChannel) -> Option<Severity> {
        match channel {
            AlarmChannel::CylinderPressure => self.cylinder_pressure,
            AlarmChannel::UmbilicalPressure => self.umbilical_pressure,
            AlarmChannel::DiveTime => self.dive_time,
        }
    }

    /// Whether any channel is sounding
    #[must_use]
    pub fn any(&self) -> bool {
        self.cylinder_pressure.is_some()
            || self.umbilical_pressure.is_some()
            || self.dive_time.is_some()
    }
}

/// Change of one alarm channel between two evaluations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum AlarmTransition {
    /// Channel started sounding
    Started { channel: AlarmChannel, severity: Severity },
    /// Warning became critical
    Escalated { channel: AlarmChannel },
    /// Critical fell back to warning
    Downgraded { channel: AlarmChannel },
    /// Channel went silent
    Cleared { channel: AlarmChannel },
}

/// Remembers the last conditions and reports transitions
#[derive(Debug, Default)]
pub struct AlarmMonitor {
    current: AlarmConditions,
}

impl AlarmMonitor {
    /// Monitor with every channel silent
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Conditions as of the last update
    #[must_use]
    pub fn current(&self) -> AlarmConditions {
        self.current
    }

    /// Feed new conditions and return what changed
    ///
    /// When the simulation is not running every channel is silenced.
    pub fn update(&mut self, next: AlarmConditions, running: bool) -> Vec<AlarmTransition> {
        let next = if running { next } else { AlarmConditions::default() };
        let mut transitions = Vec::new();
        for channel in [
            AlarmChannel::CylinderPressure,
            AlarmChannel::UmbilicalPressure,
            AlarmChannel::DiveTime,
        ] {
            let before = self.current.channel(channel);
            let after = next.channel(channel);
            let transition = match (before, after) {
                (None, Some(severity)) => Some(AlarmTransition::Started { channel, severity }),
                (Some(_), None) => Some(AlarmTransition::Cleared { channel }),
                (Some(Severity::Warning), Some(Severity::Critical)) => {
                    Some(AlarmTransition::Escalated { channel })
                }
                (Some(Severity::Critical), Some(Severity::Warning)) => {
                    Some(AlarmTransition::Downgraded { channel })
                }
                _ => None,
            };
            transitions.extend(transition);
        }
        self.current = next;
        transitions
    }
}

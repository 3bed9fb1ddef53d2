//! Operator alerts and audible alarm conditions
//!
//! - [`board`]: the ordered alert list with dismiss deadlines
//! - [`engine`]: threshold checks run at the end of every tick
//! - [`alarm`]: per-channel alarm severity for the sound collaborator

pub mod alarm;
pub mod board;
pub mod engine;

pub use alarm::{
    AlarmChannel, AlarmConditions, AlarmInputs, AlarmMonitor, AlarmThresholds, AlarmTransition,
    Severity,
};
pub use board::{Alert, AlertBoard, AlertId, AlertKind};
pub use engine::{AlertChanges, AlertEngine};

/// Raised while either cylinder is at or below the low-fill threshold
pub const LOW_CYLINDER_MESSAGE: &str = "Low Air Warning: Cylinder volume below 20%";

/// Raised while the umbilical supply is at or below the low-pressure threshold
pub const LOW_UMBILICAL_MESSAGE: &str = "Low Air Warning: Umbilical pressure below 10 bar";

/// Raised by the leak drill; stays until dismissed or reset
pub const LEAK_MESSAGE: &str = "Emergency: Air leak detected";

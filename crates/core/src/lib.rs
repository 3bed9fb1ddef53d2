//! Dive Simulation Core Library
//!
//! A real-time training simulation of a surface-supplied diving operation.
//! Tracks umbilical supply pressure, two divers' depths and delivered
//! pressures, two gas cylinders and the derived metrics an operator watches
//! (ambient pressure, consumption, remaining dive time), and raises alerts
//! when readings cross their thresholds.
//!
//! ## Structure
//!
//! - [`physics`]: pure formulas (pressure, gas consumption, zones, scripted profile)
//! - [`simulation`]: the state container, physics strategies and the
//!   [`DiveSimulation`] session facade
//! - [`alerts`]: alert board, threshold engine and audible alarm conditions
//! - [`scheduler`]: the Idle/Ticking tick driver
//! - [`manual_input`]: operator overrides in manual mode
//! - [`runtime`]: background thread pumping a shared session on wall-clock time
//!
//! ## Usage
//!
//! ```
//! use dive_sim_core::{DiveSimulation, Mode, Timestamp};
//!
//! let mut sim = DiveSimulation::default();
//! sim.set_mode(Mode::Auto, Timestamp::from_millis(0));
//! sim.start(Timestamp::from_millis(0));
//!
//! let report = sim.pump(Timestamp::from_millis(1_000));
//! assert!(report.tick.is_some());
//! assert_eq!(sim.state().history().len(), 1);
//! ```

// Core types and utilities
pub mod core_types;
pub mod config;
pub mod error;

// Simulation engine
pub mod alerts;
pub mod manual_input;
pub mod physics;
pub mod runtime;
pub mod scheduler;
pub mod simulation;

// Re-export core types
pub use core_types::{Bar, Clock, Liters, LitersPerMinute, ManualClock, Meters, Minutes, Percent};
pub use core_types::{SystemClock, Timestamp};

pub use config::{AlertThresholds, GasModel, LeakProfile, SimulationConfig};
pub use error::{ConfigError, TickError};

// Re-export engine types
pub use alerts::{
    AlarmChannel, AlarmConditions, AlarmThresholds, AlarmTransition, Alert, AlertId, AlertKind,
    Severity,
};
pub use manual_input::{IgnoreReason, ManualInput, ManualInputGateway};
pub use physics::{ScriptedProfile, UmbilicalModel, Zone};
pub use runtime::RealtimeDriver;
pub use scheduler::{SchedulerPhase, TickReport, TickScheduler};
pub use simulation::{
    CylinderSelection, DiveSimulation, Diver, Gauge, Mode, PumpReport, SimulationSnapshot,
    SimulationState, Subscription,
};

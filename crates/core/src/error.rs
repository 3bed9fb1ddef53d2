//! Error types for the simulation core
//!
//! Operator-facing failures never surface as errors: out-of-range input is
//! clamped and unparsable input is ignored. What remains are faults inside the
//! tick pipeline (caught and logged by the scheduler) and invalid configuration.

use thiserror::Error;

use crate::simulation::gauges::Gauge;

/// Failure while computing one simulation tick
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    /// A physics strategy produced a NaN or infinite value for a gauge
    #[error("tick produced a non-finite value for {gauge:?}: {value}")]
    NonFiniteGauge {
        /// Gauge the value was destined for
        gauge: Gauge,
        /// Offending value
        value: f64,
    },

    /// A derived metric came out NaN or infinite
    #[error("derived metric '{metric}' is non-finite: {value}")]
    NonFiniteDerived {
        /// Name of the derived metric
        metric: &'static str,
        /// Offending value
        value: f64,
    },
}

/// Invalid [`SimulationConfig`](crate::config::SimulationConfig) value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero, negative or NaN
    #[error("config parameter '{name}' must be finite and positive, got {value}")]
    NotPositive {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// A duration that drives a timer was zero
    #[error("config duration '{name}' must be non-zero")]
    ZeroDuration {
        /// Parameter name
        name: &'static str,
    },

    /// A capacity was zero
    #[error("config capacity '{name}' must be at least 1")]
    ZeroCapacity {
        /// Parameter name
        name: &'static str,
    },

    /// A count exceeded its upper bound
    #[error("config parameter '{name}' must be at most {max}, got {value}")]
    TooLarge {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: u64,
        /// Largest accepted value
        max: u64,
    },
}

//! Hydrostatic and supply-line pressure
//!
//! Simplified training-grade relations: one bar of ambient pressure per ten
//! metres of sea water on top of one bar of atmosphere, and a fixed line loss
//! per metre of depth between the topside manifold and the diver.

use serde::{Deserialize, Serialize};

use crate::core_types::units::{Bar, Meters};

/// Pressure lost along the umbilical per metre of depth (bar/m)
pub const LINE_LOSS_FACTOR: f64 = 0.5;

/// Ambient pressure at depth in bar
///
/// 1 + depth / 10
#[inline]
#[must_use]
pub fn ambient_pressure(depth: Meters) -> Bar {
    Bar::new(1.0 + *depth / 10.0)
}

/// Absolute pressure at depth in atmospheres absolute (ATA)
///
/// depth / 10 + 1. Numerically identical to [`ambient_pressure`]; kept as a
/// separate name because the gas-consumption formulas are written in ATA.
#[inline]
#[must_use]
pub fn absolute_pressure_ata(depth: Meters) -> f64 {
    *depth / 10.0 + 1.0
}

/// How topside supply pressure responds to diver depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum UmbilicalModel {
    /// Supply rises with depth: `surface + depth / 10`
    Linear {
        /// Supply pressure with the diver at the surface
        surface: Bar,
    },
    /// Supply decays with depth down to a floor:
    /// `max(floor, base - depth * loss_per_meter)`
    Decay {
        /// Supply pressure at the surface
        base: Bar,
        /// Lowest pressure the supply will fall to
        floor: Bar,
        /// Bar lost per metre of depth
        loss_per_meter: f64,
    },
}

impl Default for UmbilicalModel {
    fn default() -> Self {
        UmbilicalModel::Linear {
            surface: Bar::new(10.0),
        }
    }
}

impl UmbilicalModel {
    /// The decay variant with its usual constants (25 bar, 5 bar floor, 0.2 bar/m)
    #[must_use]
    pub fn decay() -> Self {
        UmbilicalModel::Decay {
            base: Bar::new(25.0),
            floor: Bar::new(5.0),
            loss_per_meter: 0.2,
        }
    }
}

/// Umbilical supply pressure for a diver at `depth`
///
/// Never negative, whatever the model parameters.
#[must_use]
pub fn umbilical_pressure(model: UmbilicalModel, depth: Meters) -> Bar {
    let p = match model {
        UmbilicalModel::Linear { surface } => surface + Bar::new(*depth / 10.0),
        UmbilicalModel::Decay {
            base,
            floor,
            loss_per_meter,
        } => (base - Bar::new(*depth * loss_per_meter)).max(floor),
    };
    p.non_negative()
}

/// Pressure delivered at the diver after line loss
///
/// max(0, umbilical - 0.5 × depth)
#[inline]
#[must_use]
pub fn diver_pressure(umbilical: Bar, depth: Meters) -> Bar {
    (umbilical - Bar::new(LINE_LOSS_FACTOR * *depth)).non_negative()
}

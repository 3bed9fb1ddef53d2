//! Scalar gauge identifiers, valid ranges and initial readings

use serde::{Deserialize, Serialize};

/// Inclusive valid range of a gauge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeRange {
    /// Lowest accepted value
    pub min: f64,
    /// Highest accepted value
    pub max: f64,
}

impl GaugeRange {
    /// Create a range; `min` must not exceed `max`
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp into the range; NaN and infinities are treated as zero first
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_finite() { value } else { 0.0 };
        value.clamp(self.min, self.max)
    }
}

/// Depth of the dive site (m)
pub const DEPTH_RANGE: GaugeRange = GaugeRange::new(0.0, 40.0);
/// Individual diver depth (m)
pub const DIVER_DEPTH_RANGE: GaugeRange = GaugeRange::new(0.0, 40.0);
/// Diver consumption rate (L/min)
pub const CONSUMPTION_RANGE: GaugeRange = GaugeRange::new(10.0, 50.0);
/// Umbilical supply pressure (bar)
pub const UMBILICAL_PRESSURE_RANGE: GaugeRange = GaugeRange::new(0.0, 30.0);
/// Pressure at the diver (bar)
pub const DIVER_PRESSURE_RANGE: GaugeRange = GaugeRange::new(0.0, 250.0);
/// Cylinder fill (%)
pub const CYLINDER_VOLUME_RANGE: GaugeRange = GaugeRange::new(0.0, 100.0);
/// Cylinder pressure (bar)
pub const CYLINDER_PRESSURE_RANGE: GaugeRange = GaugeRange::new(0.0, 200.0);

/// Settable scalar gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gauge {
    Depth,
    Diver1Depth,
    Diver2Depth,
    Diver1Rate,
    Diver2Rate,
    UmbilicalPressure,
    Diver1Pressure,
    Diver2Pressure,
    Cylinder1Volume,
    Cylinder2Volume,
    Cylinder1Pressure,
    Cylinder2Pressure,
}

impl Gauge {
    /// Every gauge, in display order
    pub const ALL: [Gauge; 12] = [
        Gauge::Depth,
        Gauge::Diver1Depth,
        Gauge::Diver2Depth,
        Gauge::Diver1Rate,
        Gauge::Diver2Rate,
        Gauge::UmbilicalPressure,
        Gauge::Diver1Pressure,
        Gauge::Diver2Pressure,
        Gauge::Cylinder1Volume,
        Gauge::Cylinder2Volume,
        Gauge::Cylinder1Pressure,
        Gauge::Cylinder2Pressure,
    ];

    /// Valid range of the gauge
    #[must_use]
    pub fn range(self) -> GaugeRange {
        match self {
            Gauge::Depth => DEPTH_RANGE,
            Gauge::Diver1Depth | Gauge::Diver2Depth => DIVER_DEPTH_RANGE,
            Gauge::Diver1Rate | Gauge::Diver2Rate => CONSUMPTION_RANGE,
            Gauge::UmbilicalPressure => UMBILICAL_PRESSURE_RANGE,
            Gauge::Diver1Pressure | Gauge::Diver2Pressure => DIVER_PRESSURE_RANGE,
            Gauge::Cylinder1Volume | Gauge::Cylinder2Volume => CYLINDER_VOLUME_RANGE,
            Gauge::Cylinder1Pressure | Gauge::Cylinder2Pressure => CYLINDER_PRESSURE_RANGE,
        }
    }

    /// Reading a fresh or reset session starts with
    #[must_use]
    pub fn initial(self) -> f64 {
        match self {
            Gauge::Depth => 20.0,
            Gauge::Diver1Depth | Gauge::Diver2Depth => 0.0,
            Gauge::Diver1Rate => 20.0,
            Gauge::Diver2Rate => 25.0,
            Gauge::UmbilicalPressure => 10.0,
            Gauge::Diver1Pressure | Gauge::Diver2Pressure => 180.0,
            Gauge::Cylinder1Volume | Gauge::Cylinder2Volume => 100.0,
            Gauge::Cylinder1Pressure | Gauge::Cylinder2Pressure => 200.0,
        }
    }
}

/// One of the two divers on the umbilical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diver {
    One,
    Two,
}

impl Diver {
    /// Depth gauge of this diver
    #[must_use]
    pub fn depth_gauge(self) -> Gauge {
        match self {
            Diver::One => Gauge::Diver1Depth,
            Diver::Two => Gauge::Diver2Depth,
        }
    }

    /// Consumption-rate gauge of this diver
    #[must_use]
    pub fn rate_gauge(self) -> Gauge {
        match self {
            Diver::One => Gauge::Diver1Rate,
            Diver::Two => Gauge::Diver2Rate,
        }
    }

    /// Pressure gauge of the cylinder this diver breathes from
    #[must_use]
    pub fn cylinder_pressure_gauge(self) -> Gauge {
        match self {
            Diver::One => Gauge::Cylinder1Pressure,
            Diver::Two => Gauge::Cylinder2Pressure,
        }
    }

    /// Fill gauge of the cylinder this diver breathes from
    #[must_use]
    pub fn cylinder_volume_gauge(self) -> Gauge {
        match self {
            Diver::One => Gauge::Cylinder1Volume,
            Diver::Two => Gauge::Cylinder2Volume,
        }
    }
}

/// Cylinder highlighted by the metrics view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CylinderSelection {
    One,
    Two,
    #[default]
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values_are_in_range() {
        for gauge in Gauge::ALL {
            assert_eq!(gauge.range().clamp(gauge.initial()), gauge.initial(), "{gauge:?}");
        }
    }

    #[test]
    fn test_clamp_handles_non_finite() {
        assert_eq!(CONSUMPTION_RANGE.clamp(f64::NAN), 10.0);
        assert_eq!(DEPTH_RANGE.clamp(f64::INFINITY), 0.0);
        assert_eq!(DEPTH_RANGE.clamp(55.0), 40.0);
        assert_eq!(DEPTH_RANGE.clamp(-1.0), 0.0);
    }
}

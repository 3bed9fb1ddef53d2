//! Gauge colour-zone classification
//!
//! Dial faces are split into green/orange/red bands. Classification lives in
//! the core so every consumer (gauges, alarm logic, reports) agrees on where a
//! reading sits.

use serde::{Deserialize, Serialize};

use crate::core_types::units::{Bar, Meters, Percent};

/// Colour band of a gauge reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Normal operating range
    Green,
    /// Caution
    Orange,
    /// Danger
    Red,
}

/// Inclusive band boundaries for a three-zone gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBands {
    /// Green band (inclusive)
    pub green: (f64, f64),
    /// Orange band (inclusive); `None` for gauges with only green and red
    pub orange: Option<(f64, f64)>,
}

impl ZoneBands {
    /// Classify a raw reading; anything outside green and orange is red
    #[must_use]
    pub fn classify(&self, value: f64) -> Zone {
        let within = |(lo, hi): (f64, f64)| value >= lo && value <= hi;
        if within(self.green) {
            Zone::Green
        } else if self.orange.is_some_and(within) {
            Zone::Orange
        } else {
            Zone::Red
        }
    }
}

/// Umbilical supply: safe between 7 and 20 bar, red on either side
pub const UMBILICAL_PRESSURE_BANDS: ZoneBands = ZoneBands {
    green: (7.0, 20.0),
    orange: None,
};

/// Cylinder fill percentage
pub const CYLINDER_VOLUME_BANDS: ZoneBands = ZoneBands {
    green: (50.0, 100.0),
    orange: Some((20.0, 50.0)),
};

/// Cylinder pressure in bar
pub const CYLINDER_PRESSURE_BANDS: ZoneBands = ZoneBands {
    green: (140.0, 200.0),
    orange: Some((80.0, 140.0)),
};

/// Pressure delivered at the diver in bar
pub const DIVER_PRESSURE_BANDS: ZoneBands = ZoneBands {
    green: (150.0, 250.0),
    orange: Some((100.0, 150.0)),
};

/// Diver depth in metres (deeper is worse)
pub const DIVER_DEPTH_BANDS: ZoneBands = ZoneBands {
    green: (0.0, 20.0),
    orange: Some((20.0, 30.0)),
};

/// Zone of an umbilical pressure reading
#[must_use]
pub fn umbilical_pressure_zone(pressure: Bar) -> Zone {
    UMBILICAL_PRESSURE_BANDS.classify(*pressure)
}

/// Zone of a cylinder fill percentage
#[must_use]
pub fn cylinder_volume_zone(volume: Percent) -> Zone {
    CYLINDER_VOLUME_BANDS.classify(*volume)
}

/// Zone of a cylinder pressure reading
#[must_use]
pub fn cylinder_pressure_zone(pressure: Bar) -> Zone {
    CYLINDER_PRESSURE_BANDS.classify(*pressure)
}

/// Zone of a diver supply pressure reading
#[must_use]
pub fn diver_pressure_zone(pressure: Bar) -> Zone {
    DIVER_PRESSURE_BANDS.classify(*pressure)
}

/// Zone of a diver depth reading
#[must_use]
pub fn diver_depth_zone(depth: Meters) -> Zone {
    DIVER_DEPTH_BANDS.classify(*depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umbilical_zones_two_sided() {
        assert_eq!(umbilical_pressure_zone(Bar::new(5.0)), Zone::Red);
        assert_eq!(umbilical_pressure_zone(Bar::new(7.0)), Zone::Green);
        assert_eq!(umbilical_pressure_zone(Bar::new(20.0)), Zone::Green);
        assert_eq!(umbilical_pressure_zone(Bar::new(24.0)), Zone::Red);
    }

    #[test]
    fn test_cylinder_volume_zones() {
        assert_eq!(cylinder_volume_zone(Percent::new(100.0)), Zone::Green);
        // Band edges resolve to the better zone
        assert_eq!(cylinder_volume_zone(Percent::new(50.0)), Zone::Green);
        assert_eq!(cylinder_volume_zone(Percent::new(35.0)), Zone::Orange);
        assert_eq!(cylinder_volume_zone(Percent::new(20.0)), Zone::Orange);
        assert_eq!(cylinder_volume_zone(Percent::new(19.9)), Zone::Red);
    }

    #[test]
    fn test_pressure_and_depth_zones() {
        assert_eq!(cylinder_pressure_zone(Bar::new(60.0)), Zone::Red);
        assert_eq!(diver_pressure_zone(Bar::new(180.0)), Zone::Green);
        assert_eq!(diver_pressure_zone(Bar::new(120.0)), Zone::Orange);
        assert_eq!(diver_depth_zone(Meters::new(25.0)), Zone::Orange);
        assert_eq!(diver_depth_zone(Meters::new(35.0)), Zone::Red);
    }

    #[test]
    fn test_nan_is_red() {
        assert_eq!(cylinder_volume_zone(Percent::new(f64::NAN)), Zone::Red);
    }
}

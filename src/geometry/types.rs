use chrono::{DateTime, Utc};

/// A direction on the observer's sky, both angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub azimuth: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteState {
    pub azimuth: f64,
    pub altitude: f64,
    pub range_m: f64,
    pub eclipsed: bool,
}

impl SatelliteState {
    pub fn direction(&self) -> Direction {
        Direction {
            azimuth: self.azimuth,
            altitude: self.altitude,
        }
    }

    pub fn range_km(&self) -> f64 {
        self.range_m / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunState {
    pub azimuth: f64,
    pub altitude: f64,
    pub earth_distance_au: f64,
}

impl SunState {
    pub fn direction(&self) -> Direction {
        Direction {
            azimuth: self.azimuth,
            altitude: self.altitude,
        }
    }
}

/// Satellite and sun geometry seen by one observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySnapshot {
    pub satellite: SatelliteState,
    pub sun: SunState,
}

/// Bounds of one pass above the observer's horizon
#[derive(Debug, Clone, PartialEq)]
pub struct PassWindow {
    pub rise: DateTime<Utc>,
    pub transit: DateTime<Utc>,
    pub set: DateTime<Utc>,
    pub rise_azimuth_deg: f64,
    pub transit_altitude_deg: f64,
    pub set_azimuth_deg: f64,
}

impl PassWindow {
    pub fn duration_seconds(&self) -> i64 {
        (self.set - self.rise).num_seconds()
    }
}

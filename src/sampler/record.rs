use chrono::{DateTime, Utc};
use serde::Serialize;

use super::compass::CompassPoint;
use crate::geometry::GeometrySnapshot;
use crate::magnitude::{MagnitudeModel, MagnitudeResult};

/// One row of a sampled pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRecord {
    pub timestamp: DateTime<Utc>,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub direction: CompassPoint,
    pub range_km: f64,
    pub magnitude: MagnitudeResult,
    pub sun_altitude_deg: f64,
    pub eclipsed: bool,
}

impl SampleRecord {
    pub fn from_snapshot(
        timestamp: DateTime<Utc>,
        snapshot: &GeometrySnapshot,
        model: &MagnitudeModel,
    ) -> Self {
        let sat = &snapshot.satellite;
        let azimuth_deg = sat.azimuth.to_degrees();
        Self {
            timestamp,
            altitude_deg: sat.altitude.to_degrees(),
            azimuth_deg,
            direction: CompassPoint::from_azimuth_deg(azimuth_deg),
            range_km: sat.range_km(),
            magnitude: model.estimate(snapshot),
            sun_altitude_deg: snapshot.sun.altitude.to_degrees(),
            eclipsed: sat.eclipsed,
        }
    }
}

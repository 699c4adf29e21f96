use serde::Serialize;
use strum_macros::Display;

/// Sixteen-point compass rose, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CompassPoint {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

const POINTS: [CompassPoint; 16] = [
    CompassPoint::N,
    CompassPoint::Nne,
    CompassPoint::Ne,
    CompassPoint::Ene,
    CompassPoint::E,
    CompassPoint::Ese,
    CompassPoint::Se,
    CompassPoint::Sse,
    CompassPoint::S,
    CompassPoint::Ssw,
    CompassPoint::Sw,
    CompassPoint::Wsw,
    CompassPoint::W,
    CompassPoint::Wnw,
    CompassPoint::Nw,
    CompassPoint::Nnw,
];

const SECTOR_DEG: f64 = 360.0 / POINTS.len() as f64;

impl CompassPoint {
    /// Nearest compass point to an azimuth in degrees.
    pub fn from_azimuth_deg(azimuth_deg: f64) -> Self {
        let index = (azimuth_deg / SECTOR_DEG).round() as i64;
        POINTS[index.rem_euclid(POINTS.len() as i64) as usize]
    }
}

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::geometry::{angular_separation, GeometrySnapshot, AU_KM};

/// Earth radius used when moving the sun distance from geocentre to observer.
pub const EARTH_RADIUS_KM: f64 = 6378.16;

/// Reference magnitude of the ISS at 1000 km and zero phase.
pub const DEFAULT_BASE_MAGNITUDE: f64 = -1.3;

/// Smallest accepted value of the diffuse-sphere phase term before the
/// logarithm. Below this the satellite is effectively unlit from the observer.
const PHASE_TERM_FLOOR: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum MagnitudeResult {
    Valid(f64),
    /// The satellite is in the earth's shadow.
    Indeterminate,
    /// The geometry is degenerate and the photometric model has no answer.
    Undefined,
}

impl MagnitudeResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            MagnitudeResult::Valid(m) => Some(*m),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, MagnitudeResult::Valid(_))
    }
}

impl fmt::Display for MagnitudeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagnitudeResult::Valid(m) => write!(f, "{:.2}", m),
            MagnitudeResult::Indeterminate | MagnitudeResult::Undefined => f.pad("-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeModel {
    pub base_magnitude: f64,
}

impl Default for MagnitudeModel {
    fn default() -> Self {
        Self {
            base_magnitude: DEFAULT_BASE_MAGNITUDE,
        }
    }
}

impl MagnitudeModel {
    pub fn new(base_magnitude: f64) -> Self {
        Self { base_magnitude }
    }

    /// Apparent visual magnitude for one geometry snapshot.
    pub fn estimate(&self, snapshot: &GeometrySnapshot) -> MagnitudeResult {
        let sat = &snapshot.satellite;
        if sat.eclipsed {
            return MagnitudeResult::Indeterminate;
        }

        let range_km = sat.range_km();
        let sun_km = snapshot.sun.earth_distance_au * AU_KM - EARTH_RADIUS_KM;
        if !(range_km > 0.0) || !(sun_km > 0.0) {
            return MagnitudeResult::Undefined;
        }

        let separation = angular_separation(sat.direction(), snapshot.sun.direction());
        match phase_angle(sun_km, range_km, separation)
            .and_then(|phase| apparent_magnitude(self.base_magnitude, range_km, phase))
        {
            Some(m) => MagnitudeResult::Valid(m),
            None => MagnitudeResult::Undefined,
        }
    }
}

/// Sun-satellite-observer angle, in radians.
///
/// Triangle with the observer-sun side `a`, the observer-satellite side `b`
/// and the angle `c_angle` between them at the observer. The returned angle
/// sits at the satellite vertex, opposite `a`.
pub fn phase_angle(a: f64, b: f64, c_angle: f64) -> Option<f64> {
    let c = (a * a + b * b - 2.0 * a * b * c_angle.cos()).sqrt();
    if !(c > 0.0) {
        return None;
    }
    let cos_phase = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
    let phase = cos_phase.acos();
    phase.is_finite().then_some(phase)
}

/// Diffuse-sphere brightness at `range_km` for a given phase angle.
pub fn apparent_magnitude(base_magnitude: f64, range_km: f64, phase: f64) -> Option<f64> {
    let term = phase.sin() + (PI - phase) * phase.cos();
    if !(term > PHASE_TERM_FLOOR) || !(range_km > 0.0) {
        return None;
    }
    let mag = base_magnitude - 15.0 + 5.0 * range_km.log10() - 2.5 * term.log10();
    mag.is_finite().then_some(mag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::types::{SatelliteState, SunState};
    use approx::assert_abs_diff_eq;

    fn snapshot(sat_az: f64, sat_alt: f64, range_km: f64, sun_az: f64, sun_alt: f64) -> GeometrySnapshot {
        GeometrySnapshot {
            satellite: SatelliteState {
                azimuth: sat_az.to_radians(),
                altitude: sat_alt.to_radians(),
                range_m: range_km * 1000.0,
                eclipsed: false,
            },
            sun: SunState {
                azimuth: sun_az.to_radians(),
                altitude: sun_alt.to_radians(),
                earth_distance_au: 1.0117,
            },
        }
    }

    #[test]
    fn eclipsed_is_indeterminate_whatever_the_geometry() {
        let model = MagnitudeModel::default();
        for mut snap in [
            snapshot(250.0, 0.0, 2414.0, 266.5, 31.04),
            snapshot(0.0, 90.0, -5.0, 0.0, 0.0),
            snapshot(f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN),
        ] {
            snap.satellite.eclipsed = true;
            assert_eq!(model.estimate(&snap), MagnitudeResult::Indeterminate);
        }
    }

    #[test]
    fn reference_low_horizon_pass() {
        let snap = snapshot(250.37, 0.0, 2414.0, 266.5, 31.04);
        let mag = MagnitudeModel::default().estimate(&snap).value().unwrap();
        assert_abs_diff_eq!(mag, 3.49, epsilon = 0.1);
    }

    #[test]
    fn base_magnitude_shifts_result() {
        let snap = snapshot(250.37, 0.0, 2414.0, 266.5, 31.04);
        let default = MagnitudeModel::default().estimate(&snap).value().unwrap();
        let brighter = MagnitudeModel::new(-2.3).estimate(&snap).value().unwrap();
        assert_abs_diff_eq!(default - brighter, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn valid_geometry_gives_finite_magnitude() {
        let model = MagnitudeModel::default();
        for (sat_az, sat_alt, range) in [(10.0, 80.0, 420.0), (120.0, 20.0, 1200.0), (300.0, 5.0, 2300.0)] {
            let result = model.estimate(&snapshot(sat_az, sat_alt, range, 200.0, -10.0));
            assert!(result.value().is_some_and(f64::is_finite), "{:?}", result);
        }
    }

    #[test]
    fn farther_is_dimmer() {
        let phase = 1.2;
        let mut prev = f64::NEG_INFINITY;
        for range in [400.0, 800.0, 1600.0, 2400.0] {
            let mag = apparent_magnitude(DEFAULT_BASE_MAGNITUDE, range, phase).unwrap();
            assert!(mag > prev);
            prev = mag;
        }
    }

    #[test]
    fn phase_angle_mirrors_separation() {
        let sun_km = 1.0117 * AU_KM - EARTH_RADIUS_KM;
        let phase = phase_angle(sun_km, 1000.0, 0.6).unwrap();
        assert_abs_diff_eq!(phase, PI - 0.6, epsilon = 1e-4);
    }

    #[test]
    fn backlit_satellite_is_undefined() {
        // Satellite sitting right in front of the sun.
        let snap = snapshot(90.0, 30.0, 800.0, 90.0, 30.0);
        assert_eq!(MagnitudeModel::default().estimate(&snap), MagnitudeResult::Undefined);
        assert!(apparent_magnitude(DEFAULT_BASE_MAGNITUDE, 800.0, PI).is_none());
    }

    #[test]
    fn non_positive_range_is_undefined() {
        let snap = snapshot(90.0, 30.0, 0.0, 200.0, 30.0);
        assert_eq!(MagnitudeModel::default().estimate(&snap), MagnitudeResult::Undefined);
    }

    #[test]
    fn display_hides_missing_values() {
        assert_eq!(MagnitudeResult::Valid(3.488).to_string(), "3.49");
        assert_eq!(format!("{:>6}", MagnitudeResult::Indeterminate), "     -");
        assert_eq!(MagnitudeResult::Undefined.to_string(), "-");
    }
}

use chrono::{DateTime, Utc};

use super::frames::{dot, julian_date, norm};
use super::ground_station::WGS84_A_KM;

pub const AU_KM: f64 = 149_597_871.0;

/// Geocentric solar position in the equatorial frame of date.
#[derive(Debug, Clone, Copy)]
pub struct SunPosition {
    /// Unit vector towards the sun.
    pub direction: [f64; 3],
    pub distance_au: f64,
}

impl SunPosition {
    pub fn position_km(&self) -> [f64; 3] {
        let d = self.distance_au * AU_KM;
        [
            self.direction[0] * d,
            self.direction[1] * d,
            self.direction[2] * d,
        ]
    }
}

/// Low-precision solar theory, good to roughly 0.01 degrees.
pub fn sun_position(timestamp: DateTime<Utc>) -> SunPosition {
    let t = (julian_date(timestamp) - 2_451_545.0) / 36_525.0;

    let l0 = (280.46646 + 36_000.76983 * t + 0.0003032 * t * t).rem_euclid(360.0);
    let m = (357.52911 + 35_999.05029 * t - 0.0001537 * t * t)
        .rem_euclid(360.0)
        .to_radians();

    // Equation of centre
    let c = 1.914_602 * m.sin() + 0.019_993 * (2.0 * m).sin() + 0.000_289 * (3.0 * m).sin();
    let longitude = (l0 + c).to_radians();

    let e = 0.016_708_634 - 0.000_042_037 * t;
    let v = m + c.to_radians();
    let distance_au = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * v.cos());

    let obliquity = (23.439_291 - 0.013_004_2 * t).to_radians();
    let direction = [
        longitude.cos(),
        obliquity.cos() * longitude.sin(),
        obliquity.sin() * longitude.sin(),
    ];

    SunPosition {
        direction,
        distance_au,
    }
}

/// Cylindrical shadow test. Both vectors must share a frame; `sun_direction`
/// is a unit vector.
pub fn in_earth_shadow(satellite_km: [f64; 3], sun_direction: [f64; 3]) -> bool {
    let along = dot(satellite_km, sun_direction);
    if along >= 0.0 {
        return false;
    }
    let off_axis = [
        satellite_km[0] - along * sun_direction[0],
        satellite_km[1] - along * sun_direction[1],
        satellite_km[2] - along * sun_direction[2],
    ];
    norm(off_axis) < WGS84_A_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::frames::{gmst, inertial_to_ecef, look_angles};
    use crate::geometry::ground_station::GroundStation;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    #[test]
    fn distance_tracks_perihelion_and_aphelion() {
        let perihelion = sun_position(Utc.with_ymd_and_hms(2020, 1, 5, 0, 0, 0).unwrap());
        let aphelion = sun_position(Utc.with_ymd_and_hms(2020, 7, 4, 0, 0, 0).unwrap());
        assert_abs_diff_eq!(perihelion.distance_au, 0.9832, epsilon = 1e-3);
        assert_abs_diff_eq!(aphelion.distance_au, 1.0167, epsilon = 1e-3);
    }

    #[test]
    fn afternoon_sun_over_houston() {
        let at = Utc.with_ymd_and_hms(2020, 8, 20, 22, 27, 33).unwrap();
        let station = GroundStation::from_coordinates("29.5593, -95.0900", None).unwrap();
        let sun = sun_position(at);
        let (az, alt, _) = look_angles(&station, inertial_to_ecef(sun.position_km(), gmst(at)));
        assert_abs_diff_eq!(alt.to_degrees(), 31.04, epsilon = 0.2);
        assert_abs_diff_eq!(az.to_degrees(), 266.5, epsilon = 0.3);
        assert_abs_diff_eq!(sun.distance_au, 1.0117, epsilon = 1e-3);
    }

    #[test]
    fn shadow_only_behind_the_earth() {
        let sun = [1.0, 0.0, 0.0];
        assert!(in_earth_shadow([-7000.0, 0.0, 0.0], sun));
        assert!(!in_earth_shadow([7000.0, 0.0, 0.0], sun));
        assert!(!in_earth_shadow([-7000.0, 6500.0, 0.0], sun));
        assert!(!in_earth_shadow([0.0, 7000.0, 0.0], sun));
    }
}

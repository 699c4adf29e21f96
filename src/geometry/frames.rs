use chrono::{DateTime, Utc};

use super::ground_station::GroundStation;

/// Greenwich mean sidereal time in radians.
pub fn gmst(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}

pub fn julian_date(timestamp: DateTime<Utc>) -> f64 {
    let seconds = timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) * 1e-9;
    seconds / 86_400.0 + 2_440_587.5
}

/// Rotate an inertial (TEME / true-of-date) vector into the earth-fixed frame.
pub fn inertial_to_ecef(pos: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos[0] * cos_gmst + pos[1] * sin_gmst,
        -pos[0] * sin_gmst + pos[1] * cos_gmst,
        pos[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Azimuth, altitude (radians) and range (same unit as the input) of an
/// earth-fixed target seen from the station.
pub fn look_angles(station: &GroundStation, target_ecef_km: [f64; 3]) -> (f64, f64, f64) {
    let sta = station.position_ecef_km();
    let dr = [
        target_ecef_km[0] - sta[0],
        target_ecef_km[1] - sta[1],
        target_ecef_km[2] - sta[2],
    ];
    let range = norm(dr);
    let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth = east.atan2(north).rem_euclid(std::f64::consts::TAU);
    let altitude = if range > 0.0 { (up / range).asin() } else { 0.0 };
    (azimuth, altitude, range)
}

pub fn norm(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

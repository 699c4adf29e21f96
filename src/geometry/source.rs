use chrono::{DateTime, Duration, Utc};

use super::error::GeometryError;
use super::frames::{gmst, inertial_to_ecef, look_angles};
use super::ground_station::GroundStation;
use super::pass_finder::find_next_pass;
use super::refraction::Atmosphere;
use super::sun::{in_earth_shadow, sun_position};
use super::tle::TleEntry;
use super::types::{Direction, GeometrySnapshot, PassWindow, SatelliteState, SunState};

/// Ephemeris capability consumed by the magnitude estimator and the pass
/// sampler. Implementations are bound to one satellite and one observer.
pub trait GeometrySource {
    fn satellite(&self, at: DateTime<Utc>) -> Result<SatelliteState, GeometryError>;

    fn sun(&self, at: DateTime<Utc>) -> Result<SunState, GeometryError>;

    fn next_pass(&self, from: DateTime<Utc>) -> Result<PassWindow, GeometryError>;

    fn snapshot(&self, at: DateTime<Utc>) -> Result<GeometrySnapshot, GeometryError> {
        Ok(GeometrySnapshot {
            satellite: self.satellite(at)?,
            sun: self.sun(at)?,
        })
    }
}

/// Great-circle separation of two sky directions, in radians.
pub fn angular_separation(a: Direction, b: Direction) -> f64 {
    let d_az = b.azimuth - a.azimuth;
    let (sin_a, cos_a) = a.altitude.sin_cos();
    let (sin_b, cos_b) = b.altitude.sin_cos();

    let x = cos_b * d_az.sin();
    let y = cos_a * sin_b - sin_a * cos_b * d_az.cos();
    let num = (x * x + y * y).sqrt();
    let den = sin_a * sin_b + cos_a * cos_b * d_az.cos();
    num.atan2(den)
}

/// SGP4-propagated satellite plus analytic sun for a fixed ground station.
pub struct Sgp4Source {
    station: GroundStation,
    entry: TleEntry,
    horizon_rad: f64,
    search_window: Duration,
    atmosphere: Option<Atmosphere>,
}

impl Sgp4Source {
    pub fn new(station: GroundStation, entry: TleEntry) -> Self {
        Self {
            station,
            entry,
            horizon_rad: 0.0,
            search_window: Duration::days(2),
            atmosphere: Some(Atmosphere::default()),
        }
    }

    pub fn with_horizon_deg(mut self, horizon_deg: f64) -> Self {
        self.horizon_rad = horizon_deg.to_radians();
        self
    }

    pub fn with_search_window(mut self, window: Duration) -> Self {
        self.search_window = window;
        self
    }

    /// `None` reports geometric altitudes.
    pub fn with_atmosphere(mut self, atmosphere: Option<Atmosphere>) -> Self {
        self.atmosphere = atmosphere;
        self
    }

    pub fn station(&self) -> &GroundStation {
        &self.station
    }

    pub fn satellite_name(&self) -> &str {
        &self.entry.name
    }

    fn satellite_ecef_km(&self, at: DateTime<Utc>) -> Result<[f64; 3], GeometryError> {
        let minutes = self
            .entry
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| GeometryError::Timestamp(e.to_string()))?;
        let prediction = self.entry.constants.propagate(minutes)?;
        Ok(inertial_to_ecef(prediction.position, gmst(at)))
    }

    fn observed_altitude(&self, true_rad: f64) -> f64 {
        match &self.atmosphere {
            Some(atmosphere) => atmosphere.apparent_altitude(true_rad),
            None => true_rad,
        }
    }
}

impl GeometrySource for Sgp4Source {
    fn satellite(&self, at: DateTime<Utc>) -> Result<SatelliteState, GeometryError> {
        let sat_ecef = self.satellite_ecef_km(at)?;
        let (azimuth, altitude, range_km) = look_angles(&self.station, sat_ecef);
        let sun_ecef = inertial_to_ecef(sun_position(at).direction, gmst(at));

        Ok(SatelliteState {
            azimuth,
            altitude: self.observed_altitude(altitude),
            range_m: range_km * 1000.0,
            eclipsed: in_earth_shadow(sat_ecef, sun_ecef),
        })
    }

    fn sun(&self, at: DateTime<Utc>) -> Result<SunState, GeometryError> {
        let sun = sun_position(at);
        let (azimuth, altitude, _) =
            look_angles(&self.station, inertial_to_ecef(sun.position_km(), gmst(at)));
        Ok(SunState {
            azimuth,
            altitude: self.observed_altitude(altitude),
            earth_distance_au: sun.distance_au,
        })
    }

    fn next_pass(&self, from: DateTime<Utc>) -> Result<PassWindow, GeometryError> {
        let window = find_next_pass(
            |t| self.satellite(t),
            from,
            from + self.search_window,
            self.horizon_rad,
        )?;
        log::debug!(
            "{}: rise {} set {} max alt {:.2}",
            self.entry.name,
            window.rise,
            window.set,
            window.transit_altitude_deg
        );
        Ok(window)
    }
}

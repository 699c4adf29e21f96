/// Air conditions at the observer, used to turn geometric altitudes into
/// the apparent altitudes seen through the atmosphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub temperature_c: f64,
    pub pressure_mbar: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            temperature_c: 15.0,
            pressure_mbar: 1010.0,
        }
    }
}

impl Atmosphere {
    /// Bennett refraction, in degrees, for an observed altitude in degrees.
    /// Zero outside [-1°, 89.9°].
    pub fn refraction_deg(&self, observed_deg: f64) -> f64 {
        if !(-1.0..=89.9).contains(&observed_deg) {
            return 0.0;
        }
        let r = (1.0 / 60.0) / (observed_deg + 7.31 / (observed_deg + 4.4)).to_radians().tan();
        r * (0.28 * self.pressure_mbar / (self.temperature_c + 273.0))
    }

    /// Apparent altitude for a geometric altitude, both in radians.
    pub fn apparent_altitude(&self, true_rad: f64) -> f64 {
        let true_deg = true_rad.to_degrees();
        let mut observed = true_deg;
        for _ in 0..10 {
            let next = true_deg + self.refraction_deg(observed);
            if (next - observed).abs() < 3.0e-5 {
                observed = next;
                break;
            }
            observed = next;
        }
        observed.to_radians()
    }
}

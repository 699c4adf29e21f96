use chrono::Duration;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::{Atmosphere, GroundStation};
use crate::magnitude::DEFAULT_BASE_MAGNITUDE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid station coordinates: {0}")]
    Coordinates(String),
    #[error("invalid duration '{value}': {message}")]
    Duration { value: String, message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    pub tle_file: Option<PathBuf>,
    /// Satellite name or NORAD id inside `tle_file`.
    pub satellite: Option<String>,
    #[serde(default = "default_step")]
    pub step: String,
    #[serde(default = "default_base_magnitude")]
    pub base_magnitude: f64,
    #[serde(default)]
    pub min_horizon_deg: f64,
    #[serde(default = "default_search_window")]
    pub search_window: String,
    /// Report refracted (apparent) altitudes.
    #[serde(default = "default_refraction")]
    pub refraction: bool,
    #[serde(default = "default_temperature_c")]
    pub temperature_c: f64,
    #[serde(default = "default_pressure_mbar")]
    pub pressure_mbar: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

fn default_step() -> String {
    "10s".to_string()
}

fn default_base_magnitude() -> f64 {
    DEFAULT_BASE_MAGNITUDE
}

fn default_search_window() -> String {
    "2d".to_string()
}

fn default_refraction() -> bool {
    true
}

fn default_temperature_c() -> f64 {
    Atmosphere::default().temperature_c
}

fn default_pressure_mbar() -> f64 {
    Atmosphere::default().pressure_mbar
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn ground_station(&self) -> Result<GroundStation, ConfigError> {
        GroundStation::from_coordinates(&self.station.coordinates, Some(self.station.altitude_m))
            .ok_or_else(|| ConfigError::Coordinates(self.station.coordinates.clone()))
    }

    pub fn atmosphere(&self) -> Option<Atmosphere> {
        self.refraction.then_some(Atmosphere {
            temperature_c: self.temperature_c,
            pressure_mbar: self.pressure_mbar,
        })
    }

    pub fn step(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.step)
    }

    pub fn search_window(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.search_window)
    }
}

pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let err = |message: String| ConfigError::Duration {
        value: s.to_string(),
        message,
    };
    humantime::parse_duration(s.trim())
        .map_err(|e| err(e.to_string()))
        .and_then(|d| Duration::from_std(d).map_err(|e| err(e.to_string())))
}

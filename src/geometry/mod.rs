mod error;
mod frames;
mod ground_station;
mod pass_finder;
mod refraction;
mod source;
mod sun;
mod tle;
pub mod types;

pub use error::GeometryError;
pub use ground_station::GroundStation;
pub use refraction::Atmosphere;
pub use source::{angular_separation, GeometrySource, Sgp4Source};
pub use sun::AU_KM;
pub use tle::{load_tle_file, select, TleEntry, ISS_2020_08_20};
pub use types::{GeometrySnapshot, PassWindow};

mod estimator;

pub use estimator::{MagnitudeModel, MagnitudeResult, DEFAULT_BASE_MAGNITUDE};

use thiserror::Error;

use crate::geometry::GeometryError;

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("invalid pass window: rise {rise} is not before set {set}")]
    InvalidWindow { rise: String, set: String },
    #[error("sample step must be positive, got {0}")]
    InvalidStep(chrono::Duration),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("element set file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid element set format")]
    InvalidTleFormat,
    #[error("invalid element set: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("no element set matching '{0}'")]
    SatelliteNotFound(String),
    #[error("timestamp out of range: {0}")]
    Timestamp(String),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("no pass found between {from} and {until}")]
    NoPassFound { from: String, until: String },
}

impl From<sgp4::Error> for GeometryError {
    fn from(err: sgp4::Error) -> Self {
        GeometryError::Propagation(err.to_string())
    }
}

use serde::{Deserialize, Serialize};

/// Measured coordinate in the GTF source frame, millimetres.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbeInput {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Probe angle pair in degrees. Both axes are expected in (0°, 180°); a
/// collar at a multiple of 180° has no radial component and is rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbeAngles {
    pub arc_deg: f64,
    pub collar_deg: f64,
}

/// Site calibration passed into every geometry call. These are deployment
/// constants, not physics: `z_ref` is the M1-frame reference height and `d0`
/// the initial probe offset. `l0` is retained for site records and does not
/// enter the computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Calibration {
    pub z_ref: f64,
    pub d0: f64,
    pub l0: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            z_ref: 100.0,
            d0: 55.0,
            l0: 150.0,
        }
    }
}

/// Common error type for geometry and log-store operations.
#[derive(thiserror::Error, Debug)]
pub enum CalcError {
    #[error("degenerate geometry: {0}")]
    Domain(String),
    #[error("log storage failure: {0}")]
    Storage(String),
    #[error("invalid request: {0}")]
    Validation(String),
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Storage(err.to_string())
    }
}

impl From<csv::Error> for CalcError {
    fn from(err: csv::Error) -> Self {
        CalcError::Storage(err.to_string())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

use thiserror::Error;

/// Engine error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SafeDriveError {
    #[error("no sensor data received during the calibration window")]
    NoSensorData,

    #[error("motion projection attempted before gravity calibration")]
    NotCalibrated,

    #[error("gravity vector magnitude is zero or not finite")]
    DegenerateGravity,

    #[error("invalid trip state: {0}")]
    InvalidState(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SafeDriveError>;

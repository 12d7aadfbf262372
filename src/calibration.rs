use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Receiver;
use tokio::time::{timeout_at, Duration, Instant};

use crate::error::{Result, SafeDriveError};
use crate::types::{AccelSample, GravityVector};

/// Calibrated rest orientation for one trip. Created at calibration, fixed
/// for the trip's duration, discarded on recalibration or a new trip.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CalibrationState {
    pub gravity: GravityVector,
    pub is_calibrated: bool,
}

impl CalibrationState {
    pub fn uncalibrated() -> Self {
        CalibrationState {
            gravity: GravityVector::zero(),
            is_calibrated: false,
        }
    }

    /// Derive a gravity vector as the arithmetic mean of each axis across the
    /// collected window. Zero samples is `NoSensorData`: calibration aborts
    /// and the trip must not start.
    pub fn from_samples(samples: &[AccelSample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(SafeDriveError::NoSensorData);
        }

        let n = samples.len() as f64;
        let (sum_x, sum_y, sum_z) = samples.iter().fold((0.0, 0.0, 0.0), |(x, y, z), s| {
            (x + s.x, y + s.y, z + s.z)
        });

        Ok(CalibrationState {
            gravity: GravityVector::new(sum_x / n, sum_y / n, sum_z / n),
            is_calibrated: true,
        })
    }
}

/// Collect every raw sample arriving on `rx` during the window, then average.
///
/// The device must be stationary for the duration; the engine cannot verify
/// stillness and relies on the caller to hold the vehicle still.
pub async fn calibrate(
    rx: &mut Receiver<AccelSample>,
    window: Duration,
) -> Result<CalibrationState> {
    let deadline = Instant::now() + window;
    let mut samples = Vec::new();

    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Some(sample)) => samples.push(sample),
            // Sender side gone; close the window with whatever arrived.
            Ok(None) => break,
            // Window elapsed.
            Err(_) => break,
        }
    }

    CalibrationState::from_samples(&samples)
}

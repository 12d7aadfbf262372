use nalgebra::Vector3;

use crate::calibration::CalibrationState;
use crate::config::MIN_GRAVITY_MAGNITUDE;
use crate::error::{Result, SafeDriveError};
use crate::types::AccelSample;

/// Resolve a raw accelerometer sample into horizontal-plane acceleration
/// relative to the calibrated rest orientation.
///
/// The gravity component along the unit gravity vector is subtracted from the
/// raw sample; what remains is the horizontal residual. Residual y maps to
/// the longitudinal (forward/back) axis and residual x to the lateral
/// (left/right) axis. This is a fixed device-mounting convention, not a
/// general attitude solution.
///
/// Returns `(longitudinal, lateral)` in m/s².
pub fn project(raw: &AccelSample, calibration: &CalibrationState) -> Result<(f64, f64)> {
    if !calibration.is_calibrated {
        return Err(SafeDriveError::NotCalibrated);
    }

    let gravity = calibration.gravity.as_vector();
    let magnitude = gravity.norm();
    if !magnitude.is_finite() || magnitude < MIN_GRAVITY_MAGNITUDE {
        return Err(SafeDriveError::DegenerateGravity);
    }

    let uv = gravity / magnitude;
    let sample = Vector3::new(raw.x, raw.y, raw.z);
    let dot = sample.dot(&uv);
    let residual = sample - uv * dot;

    Ok((residual.y, residual.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GravityVector;
    use approx::assert_relative_eq;

    fn calibrated(x: f64, y: f64, z: f64) -> CalibrationState {
        CalibrationState {
            gravity: GravityVector::new(x, y, z),
            is_calibrated: true,
        }
    }

    #[test]
    fn test_requires_calibration() {
        let raw = AccelSample::new(0.0, 1.0, 2.0, 9.0);
        let result = project(&raw, &CalibrationState::uncalibrated());
        assert_eq!(result.unwrap_err(), SafeDriveError::NotCalibrated);
    }

    #[test]
    fn test_zero_gravity_is_degenerate() {
        let state = CalibrationState {
            gravity: GravityVector::zero(),
            is_calibrated: true,
        };
        let raw = AccelSample::new(0.0, 1.0, 2.0, 9.0);
        assert_eq!(
            project(&raw, &state).unwrap_err(),
            SafeDriveError::DegenerateGravity
        );
    }

    #[test]
    fn test_non_finite_gravity_is_degenerate() {
        let state = calibrated(f64::NAN, 0.0, 9.81);
        let raw = AccelSample::new(0.0, 1.0, 2.0, 9.0);
        assert_eq!(
            project(&raw, &state).unwrap_err(),
            SafeDriveError::DegenerateGravity
        );
    }

    #[test]
    fn test_unit_vector_has_norm_one() {
        let state = calibrated(1.3, -2.7, 9.1);
        let gravity = state.gravity.as_vector();
        let uv = gravity / gravity.norm();
        assert_relative_eq!(uv.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_residual_orthogonal_to_gravity() {
        let state = calibrated(0.8, -1.1, 9.7);
        let gravity = state.gravity.as_vector();
        let uv = gravity / gravity.norm();

        let raw = AccelSample::new(0.0, 2.4, -3.1, 8.2);
        let (longitudinal, lateral) = project(&raw, &state).unwrap();

        // Reconstruct the residual: z component is whatever gravity removal left.
        let sample = Vector3::new(raw.x, raw.y, raw.z);
        let residual = sample - uv * sample.dot(&uv);
        assert_relative_eq!(residual.dot(&uv), 0.0, epsilon = 1e-9);
        assert_relative_eq!(residual.y, longitudinal, epsilon = 1e-12);
        assert_relative_eq!(residual.x, lateral, epsilon = 1e-12);
    }

    #[test]
    fn test_pure_gravity_projects_to_zero() {
        let state = calibrated(0.0, 0.0, 9.81);
        let raw = AccelSample::new(0.0, 0.0, 0.0, 9.81);
        let (longitudinal, lateral) = project(&raw, &state).unwrap();
        assert_relative_eq!(longitudinal, 0.0, epsilon = 1e-12);
        assert_relative_eq!(lateral, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_mapping() {
        // Gravity straight down the z axis: residual is the raw (x, y) plane.
        let state = calibrated(0.0, 0.0, 9.81);
        let raw = AccelSample::new(0.0, 1.5, -3.0, 9.81);
        let (longitudinal, lateral) = project(&raw, &state).unwrap();
        assert_relative_eq!(longitudinal, -3.0, epsilon = 1e-12);
        assert_relative_eq!(lateral, 1.5, epsilon = 1e-12);
    }
}

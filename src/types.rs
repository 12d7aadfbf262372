use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Reference "down" direction: the device's 3-axis acceleration reading while
/// stationary (m/s²). Must have positive finite magnitude before it may be
/// used as a normalization basis.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GravityVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GravityVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn magnitude(&self) -> f64 {
        self.as_vector().norm()
    }
}

/// One raw accelerometer-including-gravity tick (m/s²).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AccelSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelSample {
    pub fn new(timestamp: f64, x: f64, y: f64, z: f64) -> Self {
        Self { timestamp, x, y, z }
    }

    /// Sensor boundary rule: absent axis values are treated as 0.
    pub fn from_parts(timestamp: f64, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self {
            timestamp,
            x: x.unwrap_or(0.0),
            y: y.unwrap_or(0.0),
            z: z.unwrap_or(0.0),
        }
    }
}

/// Projected and smoothed motion for one tick. Ephemeral: only a bounded
/// rolling window of these is retained, for display.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MotionSample {
    pub timestamp: f64,
    pub longitudinal: f64,
    pub lateral: f64,
}

/// One geolocation fix. Immutable once appended to the route log.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RoutePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: f64,
    pub speed: Option<f64>,
}

impl RoutePoint {
    /// Display helper; an absent speed reads as 0 but never feeds decisions.
    pub fn speed_or_zero(&self) -> f64 {
        self.speed.unwrap_or(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrivingEventType {
    HarshBraking,
    HarshAcceleration,
    LateralDiscomfort,
}

impl DrivingEventType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HarshBraking => "Harsh Braking",
            Self::HarshAcceleration => "Harsh Acceleration",
            Self::LateralDiscomfort => "Lateral Discomfort",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::HarshBraking => "Harsh braking detected",
            Self::HarshAcceleration => "Harsh acceleration detected",
            Self::LateralDiscomfort => "Sharp lateral movement detected",
        }
    }
}

/// An immutable record of one detected unsafe maneuver. Created only by the
/// event detector; never mutated or removed within a trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrivingEvent {
    pub id: String,
    pub event_type: DrivingEventType,
    pub timestamp: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Signed smoothed value of the triggering axis.
    pub magnitude: f64,
    pub description: String,
}

/// Immutable trip snapshot built once at stop time. `ai_analysis` stays
/// `None` on the snapshot; coaching text arrives later through an
/// `AnalysisHandle`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriveSummary {
    pub start_time: f64,
    pub end_time: f64,
    pub distance_m: f64,
    pub event_count: usize,
    pub events: Vec<DrivingEvent>,
    pub route: Vec<RoutePoint>,
    pub ai_analysis: Option<String>,
}

impl DriveSummary {
    pub fn duration_secs(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

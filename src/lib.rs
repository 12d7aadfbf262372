//! SafeDrive engine: real-time unsafe-maneuver detection from handheld
//! motion and location streams, with scored post-trip reports and
//! asynchronous AI coaching feedback.
//!
//! Raw motion samples flow through projection (gravity removal), EMA
//! smoothing and threshold classification; location fixes accumulate in a
//! deduplicated route log. A [`session::TripSession`] owns all mutable trip
//! state and scopes it to one recording.

pub mod calibration;
pub mod coach;
pub mod config;
pub mod detector;
pub mod error;
pub mod projection;
pub mod route;
pub mod sensors;
pub mod session;
pub mod smoothing;
pub mod summary;
pub mod types;

pub use calibration::{calibrate, CalibrationState};
pub use coach::{AnalysisHandle, DriveCoach, GeminiCoach, OfflineCoach, COACH_FAILURE_MESSAGE};
pub use detector::EventDetector;
pub use error::{Result, SafeDriveError};
pub use projection::project;
pub use route::{FixOutcome, RouteTracker};
pub use session::{TripSession, TripState};
pub use smoothing::{EmaFilter, MotionSmoother};
pub use summary::{build_summary, event_type_counts, safety_score, EventTypeCounts};
pub use types::{
    AccelSample, DriveSummary, DrivingEvent, DrivingEventType, GravityVector, MotionSample,
    RoutePoint,
};

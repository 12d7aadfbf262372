use std::collections::VecDeque;

use crate::calibration::CalibrationState;
use crate::coach::{AnalysisHandle, DriveCoach};
use crate::config::CHART_WINDOW_SAMPLES;
use crate::detector::EventDetector;
use crate::error::{Result, SafeDriveError};
use crate::projection::project;
use crate::route::{FixOutcome, RouteTracker};
use crate::smoothing::MotionSmoother;
use crate::summary::build_summary;
use crate::types::{AccelSample, DriveSummary, DrivingEvent, MotionSample, RoutePoint};

/// Trip session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripState {
    /// No active trip; samples and fixes are ignored.
    Idle,
    /// Recording an active trip.
    Recording,
}

/// Single owner of all mutable trip state: calibration, EMA accumulators,
/// debounce clock, route and event logs, and the display window. Everything
/// is reset at trip start, so no state leaks across trips.
pub struct TripSession {
    state: TripState,
    calibration: CalibrationState,
    smoother: MotionSmoother,
    detector: EventDetector,
    route: RouteTracker,
    events: Vec<DrivingEvent>,
    chart_window: VecDeque<MotionSample>,
    current_g: (f64, f64),
    start_time: f64,
}

impl TripSession {
    pub fn new() -> Self {
        TripSession {
            state: TripState::Idle,
            calibration: CalibrationState::uncalibrated(),
            smoother: MotionSmoother::new(),
            detector: EventDetector::new(),
            route: RouteTracker::new(),
            events: Vec::new(),
            chart_window: VecDeque::with_capacity(CHART_WINDOW_SAMPLES),
            current_g: (0.0, 0.0),
            start_time: 0.0,
        }
    }

    pub fn state(&self) -> TripState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == TripState::Recording
    }

    /// Begin a trip with a fresh calibration (Idle → Recording). Resets every
    /// mutable cell, not merely overwrites them.
    pub fn start(&mut self, calibration: CalibrationState, now: f64) -> Result<()> {
        if !calibration.is_calibrated {
            return Err(SafeDriveError::NotCalibrated);
        }
        if self.state == TripState::Recording {
            return Err(SafeDriveError::InvalidState("already recording".to_string()));
        }

        self.calibration = calibration;
        self.smoother.reset();
        self.detector.reset();
        self.route.clear();
        self.events.clear();
        self.chart_window.clear();
        self.current_g = (0.0, 0.0);
        self.start_time = now;
        self.state = TripState::Recording;
        Ok(())
    }

    /// Process one raw accelerometer tick: project, smooth, window, classify.
    /// The detector reads the latest route fix as a stale-tolerant snapshot.
    /// A degenerate sample is skipped with a warning; the stream stays alive.
    pub fn on_motion(&mut self, sample: &AccelSample, now: f64) -> Option<&DrivingEvent> {
        if self.state != TripState::Recording {
            return None;
        }

        let (longitudinal_raw, lateral_raw) = match project(sample, &self.calibration) {
            Ok(components) => components,
            Err(err) => {
                log::warn!("skipping motion sample: {err}");
                return None;
            }
        };

        let (longitudinal, lateral) = self.smoother.apply(longitudinal_raw, lateral_raw);
        self.current_g = (longitudinal, lateral);

        if self.chart_window.len() == CHART_WINDOW_SAMPLES {
            self.chart_window.pop_front();
        }
        self.chart_window.push_back(MotionSample {
            timestamp: now,
            longitudinal,
            lateral,
        });

        let event = self
            .detector
            .detect(longitudinal, lateral, self.route.last(), now)?;
        self.events.push(event);
        self.events.last()
    }

    /// Offer a geolocation fix to the route log.
    pub fn on_fix(&mut self, point: RoutePoint) -> Option<FixOutcome> {
        if self.state != TripState::Recording {
            return None;
        }
        Some(self.route.on_fix(point))
    }

    /// Stop the trip (Recording → Idle). Teardown is synchronous: once this
    /// returns, no further samples or fixes are accepted. The coach task is
    /// spawned and continues independently; its result arrives through the
    /// returned handle.
    pub fn stop(&mut self, now: f64, coach: &dyn DriveCoach) -> Result<(DriveSummary, AnalysisHandle)> {
        if self.state != TripState::Recording {
            return Err(SafeDriveError::InvalidState("not recording".to_string()));
        }
        self.state = TripState::Idle;

        let summary = build_summary(self.start_time, now, &self.route, self.events.clone());
        let handle = AnalysisHandle::spawn(coach, &summary);
        Ok((summary, handle))
    }

    /// Drop back to uncalibrated so the next trip must recalibrate.
    pub fn request_recalibration(&mut self) -> Result<()> {
        if self.state == TripState::Recording {
            return Err(SafeDriveError::InvalidState(
                "cannot recalibrate while recording".to_string(),
            ));
        }
        self.calibration = CalibrationState::uncalibrated();
        Ok(())
    }

    /// Latest smoothed (longitudinal, lateral) for display.
    pub fn current_g(&self) -> (f64, f64) {
        self.current_g
    }

    /// Rolling window of recent smoothed samples for display.
    pub fn chart_window(&self) -> impl Iterator<Item = &MotionSample> {
        self.chart_window.iter()
    }

    pub fn events(&self) -> &[DrivingEvent] {
        &self.events
    }

    pub fn route(&self) -> &RouteTracker {
        &self.route
    }
}

impl Default for TripSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::OfflineCoach;
    use crate::types::{DrivingEventType, GravityVector};
    use approx::assert_relative_eq;

    fn calibration() -> CalibrationState {
        CalibrationState {
            gravity: GravityVector::new(0.0, 0.0, 9.81),
            is_calibrated: true,
        }
    }

    fn fix(lat: f64, lon: f64, ts: f64) -> RoutePoint {
        RoutePoint {
            latitude: lat,
            longitude: lon,
            timestamp: ts,
            speed: Some(10.0),
        }
    }

    /// Raw sample that projects to the given longitudinal value under a
    /// straight-down gravity vector.
    fn braking_sample(ts: f64, longitudinal: f64) -> AccelSample {
        AccelSample::new(ts, 0.0, longitudinal, 9.81)
    }

    #[test]
    fn test_start_requires_calibration() {
        let mut session = TripSession::new();
        let result = session.start(CalibrationState::uncalibrated(), 0.0);
        assert_eq!(result.unwrap_err(), SafeDriveError::NotCalibrated);
        assert!(!session.is_recording());
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        assert!(matches!(
            session.start(calibration(), 1.0),
            Err(SafeDriveError::InvalidState(_))
        ));
    }

    #[test]
    fn test_idle_session_ignores_input() {
        let mut session = TripSession::new();
        assert!(session.on_motion(&braking_sample(0.0, -9.0), 0.0).is_none());
        assert!(session.on_fix(fix(37.0, -122.0, 0.0)).is_none());
    }

    #[test]
    fn test_sustained_braking_emits_one_event() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        session.on_fix(fix(37.0, -122.0, 0.0));

        // EMA needs a few ticks before a sustained -9 raw crosses -2.5.
        let mut emitted = Vec::new();
        for i in 0..20 {
            let now = 0.02 * i as f64;
            if let Some(event) = session.on_motion(&braking_sample(now, -9.0), now) {
                emitted.push(event.clone());
            }
        }

        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].event_type, DrivingEventType::HarshBraking);
        assert!(emitted[0].magnitude < -2.5);
        assert_eq!(emitted[0].latitude, 37.0);
        assert_eq!(session.events().len(), 1);
    }

    #[test]
    fn test_no_fix_no_event() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        for i in 0..20 {
            let now = 0.02 * i as f64;
            assert!(session.on_motion(&braking_sample(now, -9.0), now).is_none());
        }
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_chart_window_is_bounded() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        for i in 0..(CHART_WINDOW_SAMPLES + 25) {
            let now = 0.02 * i as f64;
            session.on_motion(&braking_sample(now, 0.1), now);
        }
        assert_eq!(session.chart_window().count(), CHART_WINDOW_SAMPLES);
    }

    #[tokio::test]
    async fn test_stop_builds_summary_and_rejects_further_input() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        session.on_fix(fix(37.0, -122.0, 0.0));
        session.on_fix(fix(37.001, -122.0, 5.0));
        for i in 0..20 {
            let now = 0.02 * i as f64;
            session.on_motion(&braking_sample(now, -9.0), now);
        }

        let (summary, handle) = session.stop(30.0, &OfflineCoach).unwrap();
        assert_eq!(summary.start_time, 0.0);
        assert_eq!(summary.end_time, 30.0);
        assert_eq!(summary.event_count, 1);
        assert_eq!(summary.route.len(), 2);
        assert!(summary.distance_m > 0.0);
        assert!(summary.ai_analysis.is_none());

        // Teardown is immediate: nothing recorded after stop.
        assert!(session.on_motion(&braking_sample(31.0, -9.0), 31.0).is_none());
        assert!(session.on_fix(fix(38.0, -122.0, 31.0)).is_none());

        let feedback = handle.await_feedback().await;
        assert!(!feedback.is_empty());
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_invalid() {
        let mut session = TripSession::new();
        assert!(matches!(
            session.stop(0.0, &OfflineCoach),
            Err(SafeDriveError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_new_trip_resets_all_state() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        session.on_fix(fix(37.0, -122.0, 0.0));
        for i in 0..20 {
            let now = 0.02 * i as f64;
            session.on_motion(&braking_sample(now, -9.0), now);
        }
        let _ = session.stop(30.0, &OfflineCoach).unwrap();

        session.start(calibration(), 100.0).unwrap();
        assert!(session.events().is_empty());
        assert!(session.route().is_empty());
        assert_eq!(session.chart_window().count(), 0);
        assert_eq!(session.current_g(), (0.0, 0.0));

        // Debounce clock and smoother were reset too: a fresh sustained brake
        // emits again, with ids restarting from 1.
        session.on_fix(fix(37.0, -122.0, 100.0));
        let mut emitted = 0;
        for i in 0..20 {
            let now = 100.0 + 0.02 * i as f64;
            if session.on_motion(&braking_sample(now, -9.0), now).is_some() {
                emitted += 1;
            }
        }
        assert_eq!(emitted, 1);
        assert_eq!(session.events()[0].id, "evt_1");
    }

    #[test]
    fn test_recalibration_only_while_idle() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        assert!(session.request_recalibration().is_err());
    }

    #[tokio::test]
    async fn test_recalibration_gates_next_start() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        let _ = session.stop(10.0, &OfflineCoach).unwrap();

        session.request_recalibration().unwrap();
        // The stale calibration is gone; a new trip needs a fresh one.
        assert_eq!(
            session.start(CalibrationState::uncalibrated(), 20.0),
            Err(SafeDriveError::NotCalibrated)
        );
    }

    #[test]
    fn test_current_g_tracks_smoothed_output() {
        let mut session = TripSession::new();
        session.start(calibration(), 0.0).unwrap();
        session.on_motion(&braking_sample(0.0, -2.0), 0.0);
        let (longitudinal, lateral) = session.current_g();
        assert_relative_eq!(longitudinal, -0.3, epsilon = 1e-12);
        assert_relative_eq!(lateral, 0.0, epsilon = 1e-12);
    }
}

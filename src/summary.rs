use serde::{Deserialize, Serialize};

use crate::route::RouteTracker;
use crate::types::{DriveSummary, DrivingEvent, DrivingEventType};

/// Build the immutable trip snapshot at stop time. `ai_analysis` is left
/// unset; coaching text arrives later through the analysis handle.
pub fn build_summary(
    start_time: f64,
    end_time: f64,
    route: &RouteTracker,
    events: Vec<DrivingEvent>,
) -> DriveSummary {
    DriveSummary {
        start_time,
        end_time,
        distance_m: route.total_distance_m(),
        event_count: events.len(),
        events,
        route: route.points().to_vec(),
        ai_analysis: None,
    }
}

/// Display score: linear penalty of 5 points per event, clamped at zero.
/// Computed by the consuming surface, not stored on the summary.
pub fn safety_score(event_count: usize) -> u32 {
    (100i64 - 5 * event_count as i64).max(0) as u32
}

/// Per-type event tallies for the report and the coach prompt.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EventTypeCounts {
    pub braking: usize,
    pub acceleration: usize,
    pub lateral: usize,
}

pub fn event_type_counts(events: &[DrivingEvent]) -> EventTypeCounts {
    let mut counts = EventTypeCounts::default();
    for event in events {
        match event.event_type {
            DrivingEventType::HarshBraking => counts.braking += 1,
            DrivingEventType::HarshAcceleration => counts.acceleration += 1,
            DrivingEventType::LateralDiscomfort => counts.lateral += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoutePoint;

    fn event(event_type: DrivingEventType, ts: f64) -> DrivingEvent {
        DrivingEvent {
            id: format!("evt_{ts}"),
            event_type,
            timestamp: ts,
            latitude: 37.0,
            longitude: -122.0,
            magnitude: -3.0,
            description: event_type.description().to_string(),
        }
    }

    #[test]
    fn test_score_no_events_is_100() {
        assert_eq!(safety_score(0), 100);
    }

    #[test]
    fn test_score_linear_penalty() {
        assert_eq!(safety_score(3), 85);
        assert_eq!(safety_score(20), 0);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        assert_eq!(safety_score(25), 0);
        assert_eq!(safety_score(30), 0);
    }

    #[test]
    fn test_build_summary_counts_and_distance() {
        let mut route = RouteTracker::new();
        route.on_fix(RoutePoint {
            latitude: 37.0,
            longitude: -122.0,
            timestamp: 0.0,
            speed: None,
        });
        route.on_fix(RoutePoint {
            latitude: 37.01,
            longitude: -122.0,
            timestamp: 5.0,
            speed: Some(15.0),
        });

        let events = vec![
            event(DrivingEventType::HarshBraking, 1.0),
            event(DrivingEventType::LateralDiscomfort, 3.0),
        ];
        let summary = build_summary(0.0, 60.0, &route, events);

        assert_eq!(summary.event_count, 2);
        assert_eq!(summary.route.len(), 2);
        assert!(summary.distance_m > 1000.0);
        assert!(summary.ai_analysis.is_none());
        assert_eq!(summary.duration_secs(), 60.0);
    }

    #[test]
    fn test_event_type_counts() {
        let events = vec![
            event(DrivingEventType::HarshBraking, 1.0),
            event(DrivingEventType::HarshBraking, 3.0),
            event(DrivingEventType::HarshAcceleration, 5.0),
        ];
        let counts = event_type_counts(&events);
        assert_eq!(counts.braking, 2);
        assert_eq!(counts.acceleration, 1);
        assert_eq!(counts.lateral, 0);
    }
}

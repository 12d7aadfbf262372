use crate::config::{
    HARSH_ACCELERATION_THRESHOLD, HARSH_BRAKING_THRESHOLD, LATERAL_DISCOMFORT_THRESHOLD,
    MIN_EVENT_INTERVAL_SECS,
};
use crate::types::{DrivingEvent, DrivingEventType, RoutePoint};

/// Threshold classifier over smoothed samples, with one shared cooldown
/// clock across all event types.
pub struct EventDetector {
    last_event_time: Option<f64>,
    next_event_seq: u64,
}

impl EventDetector {
    pub fn new() -> Self {
        EventDetector {
            last_event_time: None,
            next_event_seq: 0,
        }
    }

    /// Clear the debounce clock and id sequence for a new trip.
    pub fn reset(&mut self) {
        self.last_event_time = None;
        self.next_event_seq = 0;
    }

    /// Classify one smoothed tick. At most one event per tick, first match
    /// wins: braking, then acceleration, then lateral. No event is emitted
    /// without a known position (position is mandatory metadata), and a
    /// suppressed tick leaves the debounce clock untouched.
    pub fn detect(
        &mut self,
        longitudinal: f64,
        lateral: f64,
        last_point: Option<&RoutePoint>,
        now: f64,
    ) -> Option<DrivingEvent> {
        if let Some(last) = self.last_event_time {
            // Strictly more than the interval must have elapsed.
            if now - last <= MIN_EVENT_INTERVAL_SECS {
                return None;
            }
        }

        let (event_type, magnitude) = if longitudinal < HARSH_BRAKING_THRESHOLD {
            (DrivingEventType::HarshBraking, longitudinal)
        } else if longitudinal > HARSH_ACCELERATION_THRESHOLD {
            (DrivingEventType::HarshAcceleration, longitudinal)
        } else if lateral.abs() > LATERAL_DISCOMFORT_THRESHOLD {
            (DrivingEventType::LateralDiscomfort, lateral)
        } else {
            return None;
        };

        let position = last_point?;

        self.next_event_seq += 1;
        self.last_event_time = Some(now);

        Some(DrivingEvent {
            id: format!("evt_{}", self.next_event_seq),
            event_type,
            timestamp: now,
            latitude: position.latitude,
            longitude: position.longitude,
            magnitude,
            description: event_type.description().to_string(),
        })
    }
}

impl Default for EventDetector {
    fn default() -> Self {
        Self::new()
    }
}

use crate::types::RoutePoint;

/// Outcome of offering a fix to the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixOutcome {
    Appended,
    Deduplicated,
}

/// Ordered, deduplicated sequence of geolocation fixes for the active trip.
/// Points are append-only and never mutated after insertion; the log is
/// cleared at the next trip start.
pub struct RouteTracker {
    points: Vec<RoutePoint>,
}

impl RouteTracker {
    pub fn new() -> Self {
        RouteTracker { points: Vec::new() }
    }

    /// Append a fix unless its coordinates are identical to the immediately
    /// preceding stored point. The guard is against redundant duplicate
    /// fixes, not against fixes that are merely close.
    pub fn on_fix(&mut self, point: RoutePoint) -> FixOutcome {
        if let Some(last) = self.points.last() {
            if last.latitude == point.latitude && last.longitude == point.longitude {
                return FixOutcome::Deduplicated;
            }
        }
        self.points.push(point);
        FixOutcome::Appended
    }

    pub fn last(&self) -> Option<&RoutePoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Haversine sum over consecutive route points, in meters.
    pub fn total_distance_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| {
                haversine_distance(
                    pair[0].latitude,
                    pair[0].longitude,
                    pair[1].latitude,
                    pair[1].longitude,
                )
            })
            .sum()
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Great-circle distance between two fixes in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const R: f64 = 6_371_000.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    R * c
}

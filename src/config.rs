// SafeDrive engine constants. Fixed by design, not runtime-configurable.
// All thresholds are in m/s², all intervals in seconds (f64 epoch convention).

// ---------------------------------------------------------------------------
// Event classification thresholds
// ---------------------------------------------------------------------------
/// Longitudinal deceleration below this value classifies as harsh braking.
pub const HARSH_BRAKING_THRESHOLD: f64 = -2.5;
/// Longitudinal acceleration above this value classifies as harsh acceleration.
pub const HARSH_ACCELERATION_THRESHOLD: f64 = 3.8;
/// Absolute lateral acceleration above this value classifies as lateral discomfort.
pub const LATERAL_DISCOMFORT_THRESHOLD: f64 = 2.2;

// ---------------------------------------------------------------------------
// Signal conditioning
// ---------------------------------------------------------------------------
/// EMA weight of the newest sample against the prior smoothed value.
pub const EMA_FILTER_FACTOR: f64 = 0.15;
/// Gravity vector magnitudes below this are treated as degenerate.
pub const MIN_GRAVITY_MAGNITUDE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
/// Shared cooldown between emitted events, regardless of type.
pub const MIN_EVENT_INTERVAL_SECS: f64 = 1.5;
/// Stationary window over which raw samples are averaged into a gravity vector.
pub const CALIBRATION_WINDOW_SECS: f64 = 2.0;

// ---------------------------------------------------------------------------
// Buffers & channels
// ---------------------------------------------------------------------------
/// Rolling window of smoothed samples retained for display.
pub const CHART_WINDOW_SAMPLES: usize = 40;
pub const ACCEL_CHANNEL_CAPACITY: usize = 500;
pub const GPS_CHANNEL_CAPACITY: usize = 100;

// ---------------------------------------------------------------------------
// Mock sensor cadence (binary / replay use)
// ---------------------------------------------------------------------------
pub const ACCEL_SAMPLE_INTERVAL_MS: u64 = 20; // ~50 Hz
pub const GPS_FIX_INTERVAL_MS: u64 = 1000; // 1 Hz

//! Mock sensor streams for running the engine without device hardware.
//!
//! Each producer pushes typed samples into a bounded channel with
//! drop-on-full semantics; the consumer task unsubscribes by dropping its
//! receiver, which ends the loop.

use std::f64::consts::PI;
use tokio::sync::mpsc::Sender;
use tokio::time::{interval, Duration};

use crate::config::{ACCEL_SAMPLE_INTERVAL_MS, GPS_FIX_INTERVAL_MS};
use crate::types::{AccelSample, RoutePoint};

/// ~50 Hz synthetic accelerometer-including-gravity stream with a scripted
/// maneuver profile: a lateral swing, a hard brake and a hard launch per
/// 12-second cycle, riding on low-level noise.
pub async fn accel_loop(tx: Sender<AccelSample>) {
    let mut ticker = interval(Duration::from_millis(ACCEL_SAMPLE_INTERVAL_MS));
    let mut sample_count = 0u64;

    loop {
        ticker.tick().await;

        let sample = mock_accel_sample(sample_count);
        match tx.try_send(sample) {
            Ok(_) => {
                sample_count += 1;
                if sample_count % 500 == 0 {
                    eprintln!("[accel] {} samples", sample_count);
                }
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                eprintln!("[accel] Channel closed after {} samples", sample_count);
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                // Channel full, drop this sample
            }
        }
    }
}

/// 1 Hz synthetic GPS stream drifting north-east. Every few fixes the
/// position repeats exactly, exercising route deduplication.
pub async fn gps_loop(tx: Sender<RoutePoint>) {
    let mut ticker = interval(Duration::from_millis(GPS_FIX_INTERVAL_MS));
    let mut fix_count = 0u64;

    loop {
        ticker.tick().await;

        let fix = mock_gps_fix(fix_count);
        match tx.try_send(fix) {
            Ok(_) => {
                fix_count += 1;
                if fix_count % 10 == 0 {
                    eprintln!("[gps] {} fixes", fix_count);
                }
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                eprintln!("[gps] Channel closed after {} fixes", fix_count);
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                // Channel full, drop this fix
            }
        }
    }
}

fn mock_accel_sample(count: u64) -> AccelSample {
    let t = count as f64 * (ACCEL_SAMPLE_INTERVAL_MS as f64 / 1000.0);

    // 12 s maneuver cycle at 50 Hz.
    let phase = count % 600;
    let (mut x, mut y) = (0.0, 0.0);
    match phase {
        // Sharp lane change: lateral pulse.
        100..=140 => x = 3.5,
        // Hard brake: sustained negative longitudinal.
        250..=300 => y = -4.5,
        // Hard launch.
        450..=480 => y = 5.5,
        _ => {}
    }

    // Device motion APIs may omit an axis; absent values read as 0. The mock
    // drops the vertical axis once per cycle to exercise that path.
    let z = if phase == 599 {
        None
    } else {
        Some(9.81 + (t * PI).sin() * 0.1)
    };

    AccelSample::from_parts(
        current_timestamp(),
        Some(x + (t * 2.0 * PI).sin() * 0.2),
        Some(y + (t * 2.0 * PI).cos() * 0.15),
        z,
    )
}

fn mock_gps_fix(count: u64) -> RoutePoint {
    // Hold position on every fifth fix so consecutive coordinates repeat.
    let seq = (count - count / 5) as f64;

    RoutePoint {
        latitude: 37.7749 + seq * 0.0001,
        longitude: -122.4194 + seq * 0.0001,
        timestamp: current_timestamp(),
        speed: Some(10.0 + (seq * 0.5).sin() * 5.0),
    }
}

pub fn current_timestamp() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

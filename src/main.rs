use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, timeout, Duration, Instant};

use safedrive_rs::coach::{DriveCoach, GeminiCoach, OfflineCoach};
use safedrive_rs::config::{
    ACCEL_CHANNEL_CAPACITY, CALIBRATION_WINDOW_SECS, GPS_CHANNEL_CAPACITY,
};
use safedrive_rs::sensors::{self, current_timestamp};
use safedrive_rs::session::TripSession;
use safedrive_rs::summary::{event_type_counts, safety_score};
use safedrive_rs::types::{AccelSample, RoutePoint};

#[derive(Parser, Debug)]
#[command(name = "safedrive")]
#[command(about = "SafeDrive engine - drive a mock trip and print the safety report", long_about = None)]
struct Args {
    /// Trip duration in seconds
    #[arg(value_name = "SECONDS", default_value = "30")]
    duration: u64,

    /// Gemini API key; falls back to GEMINI_API_KEY, otherwise the offline
    /// coach is used
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let api_key = args
        .api_key
        .or_else(|| std::env::var("GEMINI_API_KEY").ok());

    println!("[{}] SafeDrive starting", ts_now());
    println!("  Trip duration: {} seconds", args.duration);
    println!(
        "  Coach: {}",
        if api_key.is_some() { "gemini" } else { "offline" }
    );

    let (accel_tx, mut accel_rx) = mpsc::channel::<AccelSample>(ACCEL_CHANNEL_CAPACITY);
    let (gps_tx, mut gps_rx) = mpsc::channel::<RoutePoint>(GPS_CHANNEL_CAPACITY);

    let _accel_handle = tokio::spawn(sensors::accel_loop(accel_tx.clone()));
    let _gps_handle = tokio::spawn(sensors::gps_loop(gps_tx.clone()));
    drop(accel_tx);
    drop(gps_tx);

    // Keep the vehicle still here: the window average becomes the gravity
    // reference for the whole trip.
    println!(
        "[{}] Calibrating gravity over {:.0} ms window...",
        ts_now(),
        CALIBRATION_WINDOW_SECS * 1000.0
    );
    let calibration = safedrive_rs::calibrate(
        &mut accel_rx,
        Duration::from_secs_f64(CALIBRATION_WINDOW_SECS),
    )
    .await
    .context("calibration failed, trip not started")?;
    println!(
        "[{}] Calibration complete: gravity magnitude {:.3} m/s2",
        ts_now(),
        calibration.gravity.magnitude()
    );

    let mut session = TripSession::new();
    session.start(calibration, current_timestamp())?;

    // Eager first fix, best-effort: its failure must not block the trip.
    match timeout(Duration::from_secs(3), gps_rx.recv()).await {
        Ok(Some(first_fix)) => {
            session.on_fix(first_fix);
        }
        _ => log::warn!("initial location fix failed, waiting on the watch stream"),
    }

    let coach: Box<dyn DriveCoach> = match api_key {
        Some(key) => Box::new(GeminiCoach::new(key)),
        None => Box::new(OfflineCoach),
    };

    println!("[{}] Recording...", ts_now());
    let deadline = Instant::now() + Duration::from_secs(args.duration);

    loop {
        tokio::select! {
            Some(sample) = accel_rx.recv() => {
                if let Some(event) = session.on_motion(&sample, sample.timestamp) {
                    println!(
                        "[{}] {} ({:.2} m/s2) at ({:.5}, {:.5})",
                        ts_now(),
                        event.event_type.label(),
                        event.magnitude,
                        event.latitude,
                        event.longitude,
                    );
                }
            }
            Some(fix) = gps_rx.recv() => {
                session.on_fix(fix);
            }
            _ = sleep_until(deadline) => break,
            else => break,
        }
    }

    // Unsubscribe both streams before stopping; nothing lands on a stopped trip.
    drop(accel_rx);
    drop(gps_rx);

    let (summary, analysis) = session.stop(current_timestamp(), coach.as_ref())?;

    let counts = event_type_counts(&summary.events);
    println!("\n=== Trip Report ===");
    println!("Duration: {:.1} min", summary.duration_secs() / 60.0);
    println!("Distance: {:.0} m", summary.distance_m);
    println!("Route points: {}", summary.route.len());
    let last_speed_kmh = summary
        .route
        .last()
        .map(|p| p.speed_or_zero() * 3.6)
        .unwrap_or(0.0);
    println!("Last GPS speed: {:.0} km/h", last_speed_kmh);
    println!("Safety score: {}/100", safety_score(summary.event_count));
    println!("Events: {} total", summary.event_count);
    println!("  Harsh braking:      {}", counts.braking);
    println!("  Harsh acceleration: {}", counts.acceleration);
    println!("  Lateral discomfort: {}", counts.lateral);

    println!("\nAwaiting coach feedback...");
    let feedback = analysis.await_feedback().await;
    println!("Coach: {}", feedback);

    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

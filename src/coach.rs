use futures::future::BoxFuture;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::summary::{event_type_counts, safety_score};
use crate::types::DriveSummary;

/// Fixed user-facing text when the coaching collaborator fails. Coach
/// failures never propagate past this boundary.
pub const COACH_FAILURE_MESSAGE: &str =
    "AI analysis request failed, please check your network connection.";

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// External coaching collaborator: takes an immutable trip summary and
/// resolves to free-text feedback. Best-effort; implementations must resolve
/// to `COACH_FAILURE_MESSAGE` on any internal failure rather than error out.
pub trait DriveCoach: Send + Sync {
    fn analyze(&self, summary: &DriveSummary) -> BoxFuture<'static, String>;
}

/// Completion handle for the in-flight coach task. The trip summary is
/// returned before the analysis resolves; callers await this handle to pick
/// up the eventually-consistent coaching text.
pub struct AnalysisHandle {
    rx: oneshot::Receiver<String>,
}

impl AnalysisHandle {
    /// Spawn the coach task. The returned handle resolves once the coach
    /// does; the engine itself is never blocked on it.
    pub fn spawn(coach: &dyn DriveCoach, summary: &DriveSummary) -> Self {
        let fut = coach.analyze(summary);
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(fut.await);
        });
        AnalysisHandle { rx }
    }

    /// Wait for the coaching text. A dropped coach task degrades to the
    /// fixed failure message rather than an error.
    pub async fn await_feedback(self) -> String {
        self.rx
            .await
            .unwrap_or_else(|_| COACH_FAILURE_MESSAGE.to_string())
    }
}

/// Gemini-backed coach. Sends the per-type event tallies and trip duration
/// as a prompt; any transport, status, or response-shape failure resolves to
/// the fixed failure message.
pub struct GeminiCoach {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiCoach {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        GeminiCoach {
            client,
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key: api_key.into(),
        }
    }

    #[cfg(test)]
    fn with_endpoint(api_key: &str, endpoint: &str) -> Self {
        let mut coach = Self::new(api_key);
        coach.endpoint = endpoint.to_string();
        coach
    }
}

impl DriveCoach for GeminiCoach {
    fn analyze(&self, summary: &DriveSummary) -> BoxFuture<'static, String> {
        let client = self.client.clone();
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let prompt = build_prompt(summary);

        Box::pin(async move {
            match request_feedback(&client, &url, &prompt).await {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("coach request failed: {err:#}");
                    COACH_FAILURE_MESSAGE.to_string()
                }
            }
        })
    }
}

fn build_prompt(summary: &DriveSummary) -> String {
    let counts = event_type_counts(&summary.events);
    let minutes = (summary.duration_secs() / 60.0).round() as i64;
    format!(
        "You are a professional driving safety coach. Analyze this trip and \
         give a short assessment with improvement advice (under 200 words):\n\
         \n\
         Trip duration: {minutes} minutes\n\
         Total events recorded: {}\n\
         Harsh accelerations: {}\n\
         Harsh brakings: {}\n\
         Sharp lateral movements: {}\n\
         \n\
         Keep the tone friendly and professional.",
        summary.event_count, counts.acceleration, counts.braking, counts.lateral,
    )
}

async fn request_feedback(
    client: &reqwest::Client,
    url: &str,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });

    let response = client
        .post(url)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    let value: serde_json::Value = response.json().await?;
    let text = value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("response missing candidate text"))?;

    Ok(text.trim().to_string())
}

/// Local fallback coach for runs without an API key: produces a canned
/// assessment from the tallies alone, no network involved.
pub struct OfflineCoach;

impl DriveCoach for OfflineCoach {
    fn analyze(&self, summary: &DriveSummary) -> BoxFuture<'static, String> {
        let counts = event_type_counts(&summary.events);
        let score = safety_score(summary.event_count);
        let minutes = (summary.duration_secs() / 60.0).round() as i64;

        Box::pin(async move {
            if counts.braking == 0 && counts.acceleration == 0 && counts.lateral == 0 {
                format!(
                    "A smooth {minutes}-minute drive with no safety events. \
                     Score {score}/100 - keep it up."
                )
            } else {
                format!(
                    "Over {minutes} minutes you triggered {} harsh braking, {} harsh \
                     acceleration and {} lateral events, for a score of {score}/100. \
                     Leave more following distance and ease into speed changes.",
                    counts.braking, counts.acceleration, counts.lateral,
                )
            }
        })
    }
}

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// What the prediction endpoint is expected to answer with.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

/// One terminal error class per failed attempt; nothing is retried.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Non-2xx status, surfaced with the raw response body.
    #[error("Request failed: {status} {body}")]
    Status { status: u16, body: String },
    /// The body parsed as JSON but does not carry label and confidence.
    #[error("Unexpected response format")]
    UnexpectedFormat,
    /// Network or JSON-decode failure, surfaced with its own message.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Performs the single POST to the prediction endpoint. No timeout, no
/// retry; the call settles when the transport does.
pub async fn request_prediction(
    client: &reqwest::Client,
    url: &str,
    payload: &Map<String, Value>,
) -> Result<Prediction, PredictError> {
    let resp = client.post(url).json(payload).send().await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await?;
        return Err(PredictError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let raw: Value = resp.json().await?;
    interpret(raw)
}

/// Accepts a 2xx body when it has a non-empty string `label` and a numeric
/// `confidence`; anything else is the unexpected-format path, logged with
/// the raw payload for diagnosis.
pub fn interpret(raw: Value) -> Result<Prediction, PredictError> {
    let label = raw.get("label").and_then(Value::as_str).unwrap_or_default();
    let confidence = raw.get("confidence").and_then(Value::as_f64);

    match confidence {
        Some(confidence) if !label.is_empty() => Ok(Prediction {
            label: label.to_string(),
            confidence,
        }),
        _ => {
            warn!("[cardiogauge] Unexpected response payload: {}", raw);
            Err(PredictError::UnexpectedFormat)
        }
    }
}

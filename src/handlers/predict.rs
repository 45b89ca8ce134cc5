use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info};

use crate::render::{self, ResultView};
use crate::state::AppState;
use crate::upstream;

#[derive(Deserialize)]
pub struct PredictRequest {
    /// Raw field values as the form submitted them; typing happens here
    /// against the resolved schema, not in the page.
    pub fields: HashMap<String, String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// One request/response cycle per submission: claim the in-flight slot,
/// type the payload, make the single upstream call, render the result
/// regions. Every failure is terminal for the attempt.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<ResultView>, (StatusCode, Json<ErrorResponse>)> {
    let _guard = state.begin_submission().ok_or_else(|| {
        (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A prediction is already in flight".to_string(),
                hint: Some("Wait for the current submission to settle, then retry".to_string()),
            }),
        )
    })?;

    let payload = state.schema.build_payload(&request.fields).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
                hint: Some("Check GET /fields for the expected field types".to_string()),
            }),
        )
    })?;

    info!(
        "[cardiogauge] Forwarding prediction request to {}",
        state.config.predict_url
    );

    match upstream::request_prediction(&state.http, &state.config.predict_url, &payload).await {
        Ok(prediction) => Ok(Json(render::result_view(
            &prediction.label,
            prediction.confidence,
        ))),
        Err(e) => {
            error!("[cardiogauge] Prediction attempt failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                    hint: None,
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::schema::FormSchema;

    fn test_state(predict_url: String) -> AppState {
        AppState::new(
            Config {
                port: 0,
                predict_url,
                schema_path: "./form.toml".into(),
                cors_origins: None,
            },
            FormSchema::heart_default(),
        )
    }

    fn app(state: AppState) -> Router {
        Router::new().route("/predict", post(predict)).with_state(state)
    }

    /// Binds a throwaway upstream on a loopback port that answers every
    /// POST /predict with the given status and body.
    async fn spawn_upstream(status: StatusCode, body: &'static str) -> String {
        let handler = move || async move {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        };
        let router = Router::new().route("/predict", post(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind upstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve upstream");
        });
        format!("http://{addr}/predict")
    }

    /// An upstream that only answers when the request really is JSON: the
    /// Json extractor rejects anything without the right content type.
    async fn spawn_echo_upstream() -> String {
        let handler = |Json(payload): Json<Value>| async move {
            let confidence = payload
                .get("oldpeak")
                .and_then(Value::as_f64)
                .unwrap_or(50.0);
            Json(json!({ "label": "Heart Disease Present", "confidence": confidence }))
        };
        let router = Router::new().route("/predict", post(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind upstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve upstream");
        });
        format!("http://{addr}/predict")
    }

    fn predict_request(fields: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&json!({ "fields": fields })).expect("encode"),
            ))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn successful_prediction_returns_rendered_regions() {
        let url = spawn_upstream(
            StatusCode::OK,
            r#"{"label":"Heart Disease Present","confidence":91.25}"#,
        )
        .await;
        let response = app(test_state(url))
            .oneshot(predict_request(json!({ "age": "54", "oldpeak": "2.3" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["label"], "Heart Disease Present");
        assert_eq!(body["gauge"]["caption"], "91.2500% confidence");
        assert_eq!(body["gauge"]["width"], 91.25);
        assert!(body["summary_html"]
            .as_str()
            .expect("summary")
            .contains(r#"class="status present""#));
        assert!(body["badge_html"].as_str().expect("badge").contains("#ff5a6e"));
    }

    #[tokio::test]
    async fn payload_is_sent_as_typed_json() {
        let url = spawn_echo_upstream().await;
        let response = app(test_state(url))
            .oneshot(predict_request(json!({ "oldpeak": "2.5", "age": "61" })))
            .await
            .expect("response");

        // The echo upstream read oldpeak back as a JSON number, so the
        // payload was both JSON-typed and sent with the JSON content type.
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["confidence"], 2.5);
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_status_and_body_text() {
        let url = spawn_upstream(StatusCode::INTERNAL_SERVER_ERROR, "internal error").await;
        let response = app(test_state(url))
            .oneshot(predict_request(json!({ "age": "54" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Request failed: 500 internal error");
    }

    #[tokio::test]
    async fn malformed_upstream_body_is_the_format_error() {
        let url = spawn_upstream(StatusCode::OK, r#"{"label":"Absent"}"#).await;
        let response = app(test_state(url))
            .oneshot(predict_request(json!({ "age": "54" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Unexpected response format");
    }

    #[tokio::test]
    async fn unreachable_upstream_surfaces_the_transport_error() {
        // Nothing listens on this port.
        let response = app(test_state("http://127.0.0.1:9/predict".to_string()))
            .oneshot(predict_request(json!({ "age": "54" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(!body["error"].as_str().expect("message").is_empty());
    }

    #[tokio::test]
    async fn invalid_numeric_field_is_rejected_before_any_request() {
        // No upstream at all: validation must fail first.
        let response = app(test_state("http://127.0.0.1:9/predict".to_string()))
            .oneshot(predict_request(json!({ "age": "fifty" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "field 'age' expects an integer, got 'fifty'");
    }

    #[tokio::test]
    async fn concurrent_submission_is_rejected_with_conflict() {
        let url = spawn_upstream(StatusCode::OK, r#"{"label":"Absent","confidence":80.0}"#).await;
        let state = test_state(url);
        let _held = state.begin_submission().expect("claim slot");

        let response = app(state.clone())
            .oneshot(predict_request(json!({ "age": "54" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CONFLICT);

        drop(_held);
        let response = app(state)
            .oneshot(predict_request(json!({ "age": "54" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

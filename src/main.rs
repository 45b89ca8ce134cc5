mod config;
mod handlers;
mod render;
mod schema;
mod state;
mod templates;
mod upstream;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::schema::FormSchema;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!("[cardiogauge] Starting cardiogauge server");
    info!("[cardiogauge] Upstream prediction endpoint: {}", config.predict_url);
    info!("[cardiogauge] Field schema path: {:?}", config.schema_path);

    let schema = match FormSchema::load_from_toml(&config.schema_path) {
        Some(schema) => {
            info!(
                "[cardiogauge] Loaded field schema '{}' ({} fields)",
                schema.name,
                schema.fields().len()
            );
            schema
        }
        None => {
            info!("[cardiogauge] No schema file, using the built-in heart disease form");
            FormSchema::heart_default()
        }
    };

    let state = AppState::new(config.clone(), schema);

    // CORS configuration
    let cors = if let Some(ref origins) = config.cors_origins {
        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let predict_rate_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_: tower::BoxError| async {
            StatusCode::TOO_MANY_REQUESTS
        }))
        .layer(BufferLayer::new(32))
        .layer(RateLimitLayer::new(30, Duration::from_secs(60)));

    let app = Router::new()
        .route("/", get(form_page))
        .route("/health", get(handlers::health::health))
        .route("/fields", get(handlers::fields::list_fields))
        .route(
            "/predict",
            post(handlers::predict::predict).layer(predict_rate_limit),
        )
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[cardiogauge] Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn form_page(State(state): State<AppState>) -> Html<String> {
    Html(templates::form_page::render(&state.schema))
}

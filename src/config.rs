use std::path::PathBuf;
use tracing::warn;

/// Change this URL if you need to point to a different prediction backend.
pub const DEFAULT_PREDICT_URL: &str =
    "https://heart-disease-fastapi-backend.onrender.com/predict";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub predict_url: String,
    pub schema_path: PathBuf,
    pub cors_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port: u16 = match std::env::var("PORT") {
            Ok(p) => p.parse().unwrap_or_else(|_| {
                warn!("[cardiogauge] Invalid PORT value, defaulting to 3000");
                3000
            }),
            Err(_) => 3000,
        };

        let predict_url = std::env::var("PREDICT_URL")
            .unwrap_or_else(|_| DEFAULT_PREDICT_URL.to_string());

        let schema_path = PathBuf::from(
            std::env::var("SCHEMA_PATH").unwrap_or_else(|_| "./form.toml".to_string()),
        );

        let cors_origins = std::env::var("CORS_ORIGINS").ok();

        Self {
            port,
            predict_url,
            schema_path,
            cors_origins,
        }
    }
}

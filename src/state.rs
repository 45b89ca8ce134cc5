use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::schema::FormSchema;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub schema: Arc<FormSchema>,
    pub http: reqwest::Client,
    in_flight: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: Config, schema: FormSchema) -> Self {
        Self {
            config,
            schema: Arc::new(schema),
            // No request timeout: the outbound call settles when the
            // transport does.
            http: reqwest::Client::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claims the single submission slot. Returns `None` while another
    /// prediction is pending; the slot frees when the guard drops.
    pub fn begin_submission(&self) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: Arc::clone(&self.in_flight),
            })
    }
}

pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Config {
                port: 0,
                predict_url: "http://127.0.0.1:1/predict".to_string(),
                schema_path: "./form.toml".into(),
                cors_origins: None,
            },
            FormSchema::heart_default(),
        )
    }

    #[test]
    fn second_submission_is_rejected_while_one_is_pending() {
        let state = state();
        let guard = state.begin_submission().expect("first claim");
        assert!(state.begin_submission().is_none());
        drop(guard);
        assert!(state.begin_submission().is_some());
    }

    #[test]
    fn the_slot_is_shared_across_cloned_state_handles() {
        let state = state();
        let clone = state.clone();
        let _guard = state.begin_submission().expect("first claim");
        assert!(clone.begin_submission().is_none());
    }
}

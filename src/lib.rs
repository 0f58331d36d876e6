pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod utils;
pub mod webhook;

use axum::{Router, routing};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

pub use config::RelayConfig;
use messaging::Notifier;

pub struct AppState {
    pub config: RelayConfig,
    pub notifier: Arc<dyn Notifier>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: RelayConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            notifier,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Routes served by the relay.
/// `/hhh` takes every method so the handler can answer non-POST requests itself.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::get(api::root))
        .route("/hhh", routing::any(api::handle_webhook))
        .with_state(state)
}

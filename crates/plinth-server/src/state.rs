//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;

/// State threaded through every handler. Replaces ambient globals: the
/// config is built once in `main` and only ever passed by reference.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Seconds since the server started.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::AdminBackendClient;
use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: AdminBackendClient,
}

impl AppState {
    /// Build the state and its backend client from configuration.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let backend = AdminBackendClient::new(&config.backend_url);
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn backend(&self) -> &AdminBackendClient {
        &self.inner.backend
    }
}

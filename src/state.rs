//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::MetricsSource;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds only immutable data: the configuration and the metrics source the
/// health endpoint samples. Handlers never write to it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub metrics: Arc<dyn MetricsSource>,
}

impl AppState {
    /// Creates a new application state from the given configuration and metrics source.
    pub fn new(config: AppConfig, metrics: impl MetricsSource + 'static) -> Self {
        Self {
            config: Arc::new(config),
            metrics: Arc::new(metrics),
        }
    }
}

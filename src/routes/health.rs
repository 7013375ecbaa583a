//! Health check endpoint for load balancers and monitoring.
//!
//! Samples host CPU, memory and disk utilization on every request. A request
//! takes roughly the configured CPU sampling interval (1 second by default),
//! which monitors should budget for in their probe timeouts.

use axum::extract::State;
use tracing::instrument;

use crate::health::{self, HealthReport};
use crate::state::AppState;

/// Health check handler.
///
/// Responds 200 with a healthy report, or 500 with the sampling error.
#[instrument(name = "health::health", skip(state))]
pub async fn health(State(state): State<AppState>) -> HealthReport {
    health::check(state.metrics.as_ref(), state.config.health.sample_timeout()).await
}

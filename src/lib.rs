//! bigbrother: a small web service reporting host health.
//!
//! Exposes two static greeting pages and a `/health` endpoint that samples
//! host CPU, memory and disk utilization on every request and answers 200
//! with the figures, or 500 with the reason sampling failed.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::MetricsError;
pub use health::{HealthPayload, HealthReport, HealthStatus};
pub use metrics::{MetricsSource, SysinfoSource, SystemMetrics};
pub use routes::create_router;
pub use state::AppState;

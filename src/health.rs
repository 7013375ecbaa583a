//! Health report construction and its HTTP response contract.
//!
//! A [`HealthReport`] is built fresh for every request from a single metrics
//! sample and discarded after serialization. Exactly one of `system` or
//! `error` appears in the serialized document; the payload enum makes any
//! other combination unrepresentable.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::MetricsError;
use crate::metrics::{MetricsSource, SystemMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// What the report carries besides status and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthPayload {
    System(SystemMetrics),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    status: HealthStatus,
    timestamp: f64,
    #[serde(flatten)]
    payload: HealthPayload,
}

impl HealthReport {
    pub fn healthy(system: SystemMetrics) -> Self {
        Self {
            status: HealthStatus::Healthy,
            timestamp: epoch_seconds(),
            payload: HealthPayload::System(system),
        }
    }

    pub fn unhealthy(error: &MetricsError) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            timestamp: epoch_seconds(),
            payload: HealthPayload::Error(error.to_string()),
        }
    }

    pub fn from_sample(sample: Result<SystemMetrics, MetricsError>) -> Self {
        match sample {
            Ok(system) => Self::healthy(system),
            Err(err) => Self::unhealthy(&err),
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn payload(&self) -> &HealthPayload {
        &self.payload
    }

    pub fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Sample `source` once and build the report.
///
/// A sample that outlives `timeout` is abandoned and reported as unhealthy.
/// Failures are never retried; retry policy belongs to the caller.
pub async fn check(source: &dyn MetricsSource, timeout: Duration) -> HealthReport {
    let sample = match tokio::time::timeout(timeout, source.sample()).await {
        Ok(sample) => sample,
        Err(_) => Err(MetricsError::Timeout(timeout)),
    };

    let report = HealthReport::from_sample(sample);
    match report.payload() {
        HealthPayload::System(system) => tracing::debug!(
            cpu_percent = system.cpu_percent,
            memory_percent = system.memory_percent,
            disk_percent = system.disk_percent,
            "Host healthy"
        ),
        HealthPayload::Error(error) => tracing::warn!(error = %error, "Host metrics unavailable"),
    }
    report
}

/// Seconds since the Unix epoch with microsecond precision.
fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct Fixed(SystemMetrics);

    #[async_trait]
    impl MetricsSource for Fixed {
        async fn sample(&self) -> Result<SystemMetrics, MetricsError> {
            Ok(self.0)
        }
    }

    struct Failing(&'static str);

    #[async_trait]
    impl MetricsSource for Failing {
        async fn sample(&self) -> Result<SystemMetrics, MetricsError> {
            Err(MetricsError::unavailable(self.0))
        }
    }

    struct Stalled;

    #[async_trait]
    impl MetricsSource for Stalled {
        async fn sample(&self) -> Result<SystemMetrics, MetricsError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SystemMetrics::new(0.0, 0.0, 0.0))
        }
    }

    #[test]
    fn healthy_report_serializes_system_only() {
        let report = HealthReport::healthy(SystemMetrics::new(12.5, 45.0, 60.2));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "healthy");
        assert_eq!(
            value["system"],
            json!({"cpu_percent": 12.5, "memory_percent": 45.0, "disk_percent": 60.2})
        );
        assert!(value.get("error").is_none());
        assert!(value["timestamp"].as_f64().unwrap() > 0.0);
        assert_eq!(report.status_code(), StatusCode::OK);
    }

    #[test]
    fn unhealthy_report_serializes_error_only() {
        let report = HealthReport::unhealthy(&MetricsError::unavailable("permission denied"));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "unhealthy");
        assert_eq!(value["error"], "permission denied");
        assert!(value.get("system").is_none());
        assert_eq!(report.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn serialized_keys_are_exactly_three() {
        for report in [
            HealthReport::healthy(SystemMetrics::new(1.0, 1.0, 1.0)),
            HealthReport::unhealthy(&MetricsError::unavailable("boom")),
        ] {
            let value = serde_json::to_value(&report).unwrap();
            assert_eq!(value.as_object().unwrap().len(), 3);
        }
    }

    #[test]
    fn from_sample_maps_result_variants() {
        let ok = HealthReport::from_sample(Ok(SystemMetrics::new(1.0, 2.0, 3.0)));
        assert_eq!(ok.status(), HealthStatus::Healthy);

        let err = HealthReport::from_sample(Err(MetricsError::unavailable("nope")));
        assert_eq!(err.status(), HealthStatus::Unhealthy);
        assert_eq!(err.payload(), &HealthPayload::Error("nope".to_string()));
    }

    #[tokio::test]
    async fn check_reports_healthy_sample() {
        let before = epoch_seconds();
        let source = Fixed(SystemMetrics::new(12.5, 45.0, 60.2));
        let report = check(&source, Duration::from_secs(1)).await;
        let after = epoch_seconds();

        assert_eq!(report.status(), HealthStatus::Healthy);
        assert!(report.timestamp() >= before && report.timestamp() <= after);
    }

    #[tokio::test]
    async fn check_reports_source_error_verbatim() {
        let report = check(&Failing("permission denied"), Duration::from_secs(1)).await;
        assert_eq!(
            report.payload(),
            &HealthPayload::Error("permission denied".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn check_reports_timeout_as_unhealthy() {
        let report = check(&Stalled, Duration::from_millis(500)).await;
        assert_eq!(report.status(), HealthStatus::Unhealthy);
        assert_eq!(
            report.payload(),
            &HealthPayload::Error("metrics sampling timed out after 500ms".to_string())
        );
    }
}

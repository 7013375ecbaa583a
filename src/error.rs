use std::time::Duration;

/// Failure to obtain one or more host metrics.
///
/// Every variant ends up in the `error` field of an unhealthy report, so the
/// `Display` output is what callers see.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The metrics source could not produce a value. The message is surfaced verbatim.
    #[error("{0}")]
    Unavailable(String),

    #[error("metrics sampling timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The blocking sampler task panicked or was cancelled.
    #[error("metrics sampler task failed: {0}")]
    Task(String),
}

impl MetricsError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        MetricsError::Unavailable(message.into())
    }
}

impl From<tokio::task::JoinError> for MetricsError {
    fn from(err: tokio::task::JoinError) -> Self {
        MetricsError::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_message_is_verbatim() {
        let err = MetricsError::unavailable("permission denied");
        assert_eq!(err.to_string(), "permission denied");
    }

    #[test]
    fn timeout_message_names_duration() {
        let err = MetricsError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "metrics sampling timed out after 1500ms");
    }
}

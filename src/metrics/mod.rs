//! Host metrics sources.
//!
//! The health endpoint depends only on the [`MetricsSource`] trait. The
//! production implementation, [`SysinfoSource`], reads the host through the
//! `sysinfo` crate; tests substitute deterministic fakes.

mod host;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::MetricsError;

pub use host::SysinfoSource;

/// Utilization of the three host resources, each a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
}

impl SystemMetrics {
    /// Builds a snapshot, clamping each value into `[0, 100]`.
    ///
    /// NaN is treated as zero usage.
    pub fn new(cpu_percent: f64, memory_percent: f64, disk_percent: f64) -> Self {
        Self {
            cpu_percent: clamp_percent(cpu_percent),
            memory_percent: clamp_percent(memory_percent),
            disk_percent: clamp_percent(disk_percent),
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// A provider of host CPU, memory and disk utilization.
///
/// Implementations may block for the CPU sampling interval; callers should
/// expect `sample` to take roughly that long.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn sample(&self) -> Result<SystemMetrics, MetricsError>;
}

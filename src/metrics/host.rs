//! Host metrics read through `sysinfo`.
//!
//! Sampling CPU usage requires two refreshes separated by a sleep, so the
//! whole read runs on tokio's blocking pool.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{DiskRefreshKind, Disks, System};

use super::{MetricsSource, SystemMetrics};
use crate::config::HealthConfig;
use crate::error::MetricsError;

/// Reads CPU, memory and disk utilization of the local host.
#[derive(Debug, Clone)]
pub struct SysinfoSource {
    cpu_interval: Duration,
    mount_point: PathBuf,
}

impl SysinfoSource {
    pub fn new(cpu_interval: Duration, mount_point: impl Into<PathBuf>) -> Self {
        Self {
            cpu_interval: cpu_interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
            mount_point: mount_point.into(),
        }
    }

    pub fn from_config(config: &HealthConfig) -> Self {
        Self::new(config.cpu_sample_interval(), &config.disk_mount_point)
    }

    pub fn cpu_interval(&self) -> Duration {
        self.cpu_interval
    }

    /// Blocking read of all three metrics. CPU is read first, then memory, then disk.
    fn sample_blocking(&self) -> Result<SystemMetrics, MetricsError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MetricsError::unavailable(
                "host metrics are not supported on this platform",
            ));
        }

        let mut system = System::new();
        let cpu = cpu_percent(&mut system, self.cpu_interval)?;
        let memory = memory_percent(&mut system)?;
        let disk = disk_percent(&self.mount_point)?;

        Ok(SystemMetrics::new(cpu, memory, disk))
    }
}

#[async_trait]
impl MetricsSource for SysinfoSource {
    async fn sample(&self) -> Result<SystemMetrics, MetricsError> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.sample_blocking()).await?
    }
}

fn cpu_percent(system: &mut System, interval: Duration) -> Result<f64, MetricsError> {
    system.refresh_cpu_usage();
    std::thread::sleep(interval);
    system.refresh_cpu_usage();

    if system.cpus().is_empty() {
        return Err(MetricsError::unavailable("no CPUs reported by the host"));
    }
    Ok(round_percent(f64::from(system.global_cpu_usage())))
}

fn memory_percent(system: &mut System) -> Result<f64, MetricsError> {
    system.refresh_memory();
    let total = system.total_memory();
    let available = system.available_memory();
    usage_percent(total, available)
        .ok_or_else(|| MetricsError::unavailable("total memory reported as zero"))
}

fn disk_percent(mount_point: &Path) -> Result<f64, MetricsError> {
    // List mounts without statting them; a hung unrelated mount must not stall the read.
    let mut disks = Disks::new_with_refreshed_list_specifics(DiskRefreshKind::nothing());

    let index = select_mount(disks.iter().map(|disk| disk.mount_point()), mount_point)
        .ok_or_else(|| {
            MetricsError::unavailable(format!(
                "no filesystem found for mount point {}",
                mount_point.display()
            ))
        })?;

    let disk = &mut disks.list_mut()[index];
    if !disk.refresh_specifics(DiskRefreshKind::nothing().with_storage()) {
        return Err(MetricsError::unavailable(format!(
            "failed to read usage of filesystem at {}",
            disk.mount_point().display()
        )));
    }

    usage_percent(disk.total_space(), disk.available_space()).ok_or_else(|| {
        MetricsError::unavailable(format!(
            "filesystem at {} reports zero size",
            disk.mount_point().display()
        ))
    })
}

/// Index of the longest mount point containing `target`, so "/" never shadows "/data".
fn select_mount<'a>(mounts: impl Iterator<Item = &'a Path>, target: &Path) -> Option<usize> {
    mounts
        .enumerate()
        .filter(|(_, mount)| target.starts_with(mount))
        .max_by_key(|(_, mount)| mount.as_os_str().len())
        .map(|(index, _)| index)
}

/// Percentage of `total` that is not `available`, or `None` when `total` is zero.
fn usage_percent(total: u64, available: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(round_percent(used as f64 / total as f64 * 100.0))
}

fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

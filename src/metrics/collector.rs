use std::sync::Arc;
use tokio::task::{self, JoinError};

use crate::api::dto::snapshot::SnapshotDto;
use crate::cloud::traffic::TrafficState;
use crate::config;
use crate::metrics::error::MetricsError;
use crate::metrics::provider::{LoadAverages, MetricsProvider};

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

struct CpuSample {
    load: LoadAverages,
    usage_percent: Option<f64>,
}

/// Collects one snapshot. Each metric group runs as its own unit of work
/// and all units are joined before the snapshot is assembled; a failed
/// unit only degrades its own fields to their zero defaults.
pub(crate) async fn collect(
    provider: &Arc<dyn MetricsProvider>,
    traffic: Option<&TrafficState>,
    settings: &config::metrics::Metrics,
) -> SnapshotDto {
    let memory_task = {
        let provider = Arc::clone(provider);
        task::spawn_blocking(move || provider.memory())
    };

    let disk_task = {
        let provider = Arc::clone(provider);
        let mount_point = settings.mount_point.clone();
        task::spawn_blocking(move || provider.disk_usage(&mount_point))
    };

    let cpu_task = {
        let provider = Arc::clone(provider);
        task::spawn_blocking(move || -> Result<CpuSample, MetricsError> {
            let load = provider.load_average()?;

            // Never divide by a guessed core count: without it only the
            // cpu percentage degrades, the measured loads are kept.
            let usage_percent = match provider.physical_core_count() {
                Ok(cores) => Some(cpu_percent(load.one, cores)),
                Err(err) => {
                    error!("Error getting CPU core count: {}", err);
                    None
                }
            };

            Ok(CpuSample {
                load,
                usage_percent,
            })
        })
    };

    let network_task = {
        let provider = Arc::clone(provider);
        let interface = settings.interface.clone();
        task::spawn_blocking(move || provider.network_counters(&interface))
    };

    let traffic_future = async {
        match traffic {
            Some(state) => state.cache.usage(&state.provider, state.server_id).await,
            None => None,
        }
    };

    let (memory, disk, cpu, network, traffic_used_percent) = tokio::join!(
        memory_task,
        disk_task,
        cpu_task,
        network_task,
        traffic_future
    );

    let mut snapshot = SnapshotDto {
        hostname: provider.hostname().unwrap_or_default(),
        traffic_used_percent,
        ..SnapshotDto::default()
    };

    if let Some(memory) = finished("memory", memory) {
        snapshot.ram_usage_percent =
            usage_percent(memory.total.saturating_sub(memory.available), memory.total);
        snapshot.swap_usage_percent = usage_percent(memory.swap_used, memory.swap_total);
    }

    if let Some(disk) = finished("disk", disk) {
        snapshot.disk_usage_percent =
            usage_percent(disk.total.saturating_sub(disk.available), disk.total);
    }

    if let Some(cpu) = finished("load averages", cpu) {
        snapshot.load1 = round2(cpu.load.one);
        snapshot.load5 = round2(cpu.load.five);
        snapshot.load15 = round2(cpu.load.fifteen);
        snapshot.cpu_usage_percent = cpu.usage_percent.unwrap_or(0.0);
    }

    if let Some(network) = finished("network counters", network) {
        snapshot.network_in = to_megabytes(network.received);
        snapshot.network_out = to_megabytes(network.transmitted);
    }

    snapshot
}

fn finished<T>(
    group: &str,
    joined: Result<Result<T, MetricsError>, JoinError>,
) -> Option<T> {
    match joined {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            error!("Error getting {}: {}", group, err);
            None
        }
        Err(err) => {
            error!("Collection task for {} aborted: {}", group, err);
            None
        }
    }
}

/// Rounded percentage of `used` over `total`; 0 when `total` is 0, which
/// also covers hosts without swap.
fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    (used as f64 / total as f64 * 100.0).round()
}

/// Load normalized by core count, as a percentage. Not clamped, an
/// overloaded host reports more than 100.
fn cpu_percent(load1: f64, cores: usize) -> f64 {
    (load1 / cores as f64 * 100.0).round()
}

fn to_megabytes(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MEGABYTE).round()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

use std::path::Path;
use sysinfo::{CpuRefreshKind, Disks, Networks, RefreshKind, System};

use crate::metrics::error::MetricsError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct MemoryStats {
    pub(crate) total: u64,
    pub(crate) available: u64,
    pub(crate) swap_total: u64,
    pub(crate) swap_used: u64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DiskStats {
    pub(crate) total: u64,
    pub(crate) available: u64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadAverages {
    pub(crate) one: f64,
    pub(crate) five: f64,
    pub(crate) fifteen: f64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct NetworkCounters {
    pub(crate) received: u64,
    pub(crate) transmitted: u64,
}

/// Capability interface over the host statistics the collector needs.
/// Every method is an independent query so the collector can schedule
/// them as separate units of work.
pub(crate) trait MetricsProvider: Send + Sync {
    fn memory(&self) -> Result<MemoryStats, MetricsError>;
    fn disk_usage(&self, mount_point: &str) -> Result<DiskStats, MetricsError>;
    fn load_average(&self) -> Result<LoadAverages, MetricsError>;
    fn physical_core_count(&self) -> Result<usize, MetricsError>;
    fn network_counters(&self, interface: &str) -> Result<NetworkCounters, MetricsError>;
    fn hostname(&self) -> Option<String>;
}

pub(crate) struct SysinfoProvider;

impl MetricsProvider for SysinfoProvider {
    fn memory(&self) -> Result<MemoryStats, MetricsError> {
        let mut sys = System::new();
        sys.refresh_memory();

        let total = sys.total_memory();
        if total == 0 {
            return Err(MetricsError::Unavailable(
                "total memory reported as zero".to_string(),
            ));
        }

        Ok(MemoryStats {
            total,
            available: sys.available_memory(),
            swap_total: sys.total_swap(),
            swap_used: sys.used_swap(),
        })
    }

    fn disk_usage(&self, mount_point: &str) -> Result<DiskStats, MetricsError> {
        let disks = Disks::new_with_refreshed_list();

        let disk = disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == Path::new(mount_point))
            .ok_or_else(|| MetricsError::MountPointNotFound(mount_point.to_string()))?;

        Ok(DiskStats {
            total: disk.total_space(),
            available: disk.available_space(),
        })
    }

    fn load_average(&self) -> Result<LoadAverages, MetricsError> {
        let load = System::load_average();

        Ok(LoadAverages {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn physical_core_count(&self) -> Result<usize, MetricsError> {
        let sys = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::everything()),
        );

        sys.physical_core_count()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                MetricsError::Unavailable("physical core count not reported".to_string())
            })
    }

    fn network_counters(&self, interface: &str) -> Result<NetworkCounters, MetricsError> {
        let networks = Networks::new_with_refreshed_list();

        for (name, data) in &networks {
            if name.as_str() == interface {
                return Ok(NetworkCounters {
                    received: data.total_received(),
                    transmitted: data.total_transmitted(),
                });
            }
        }

        Err(MetricsError::InterfaceNotFound(interface.to_string()))
    }

    fn hostname(&self) -> Option<String> {
        System::host_name()
    }
}

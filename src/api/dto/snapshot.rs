use serde::{Deserialize, Serialize};

/// One point-in-time aggregate of all collected metrics, serialized with
/// the wire field names monitoring consumers poll for. Numeric fields hold
/// 0 when their query failed; the traffic field is omitted entirely when
/// the quota lookup is not configured or never succeeded.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotDto {
    pub(crate) ram_usage_percent: f64,
    pub(crate) swap_usage_percent: f64,
    pub(crate) disk_usage_percent: f64,
    pub(crate) cpu_usage_percent: f64,
    pub(crate) load1: f64,
    pub(crate) load5: f64,
    pub(crate) load15: f64,
    pub(crate) network_in: f64,
    pub(crate) network_out: f64,
    pub(crate) hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) traffic_used_percent: Option<f64>,
}

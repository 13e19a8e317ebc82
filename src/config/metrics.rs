use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Metrics {
    #[serde(default = "default_interface")]
    pub(crate) interface: String,
    #[serde(default = "default_mount_point")]
    pub(crate) mount_point: String,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            interface: default_interface(),
            mount_point: default_mount_point(),
        }
    }
}

fn default_interface() -> String {
    "eth0".to_string()
}

fn default_mount_point() -> String {
    "/".to_string()
}

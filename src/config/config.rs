use std::fs;
use std::env;
use serde::Deserialize;
use local_ip_address::local_ip;
use crate::config;
use toml::de::Error as TomlError;

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Config {
    #[serde(default = "default_host")]
    pub(crate) host: String,
    #[serde(default)]
    pub(crate) api: config::api::Api,
    #[serde(default)]
    pub(crate) metrics: config::metrics::Metrics,
    #[serde(default)]
    pub(crate) cloud: config::cloud::Cloud,
}

impl Config {
    pub(crate) fn get_api_url(&mut self) -> String {
        return format!("{}://{}:{}", self.api.scheme, self.host, self.api.port);
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: default_host(),
            api: config::api::Api::default(),
            metrics: config::metrics::Metrics::default(),
            cloud: config::cloud::Cloud::default(),
        }
    }
}

fn default_host() -> String {
    local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

pub(crate) fn get_config_dir() -> String {
    return match env::var_os("HOSTMON_CONFIG_DIR") {
        Some(variable) => variable.into_string().unwrap_or_default(),
        None => format!("{}/.config/hostmon", env::var("HOME").unwrap_or_default())
    };
}

pub(crate) fn load_config() -> Config {
    let home_dir = get_config_dir();

    let file = format!("{}/config.toml", home_dir);

    debug!("load config file {}", file);

    let mut configuration = Config::default();

    if fs::metadata(file.clone()).is_ok() {
        let contents = fs::read_to_string(file).unwrap_or_default();
        let parsed: Result<Config, TomlError> = toml::from_str(&contents);

        match parsed {
            Ok(parsed) => {
                configuration = parsed;
            }
            Err(err) => {
                error!("Error while deserializing the TOML file : {}", err);
            }
        }
    } else {
        debug!("Switch to default configuration");
    }

    apply_env_overrides(&mut configuration);

    configuration
}

fn apply_env_overrides(configuration: &mut Config) {
    if let Ok(port) = env::var("HOSTMON_PORT") {
        match port.parse::<u16>() {
            Ok(port) => configuration.api.port = port,
            Err(err) => {
                eprintln!("Error: Invalid HOSTMON_PORT '{}': {}", port, err);
                std::process::exit(1);
            }
        }
    }

    if let Ok(interface) = env::var("HOSTMON_INTERFACE") {
        configuration.metrics.interface = interface;
    }

    if let Ok(mount_point) = env::var("HOSTMON_MOUNT_POINT") {
        configuration.metrics.mount_point = mount_point;
    }

    if let Ok(token) = env::var("HCLOUD_TOKEN") {
        if !token.is_empty() {
            configuration.cloud.token = Some(token);
        }
    }

    if let Ok(server_id) = env::var("HCLOUD_SERVER_ID") {
        match server_id.parse::<u64>() {
            Ok(server_id) => configuration.cloud.server_id = Some(server_id),
            Err(err) => {
                eprintln!("Error: Invalid HCLOUD_SERVER_ID '{}': {}", server_id, err);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn load_config_reads_file_and_env_overrides() {
        let dir = TempDir::new("hostmon-config").unwrap();
        let file = dir.path().join("config.toml");
        fs::write(
            &file,
            r#"
host = "10.0.0.5"

[api]
port = 9000

[metrics]
interface = "enp3s0"

[cloud]
token = "file-token"
server_id = 42
"#,
        )
        .unwrap();

        env::set_var("HOSTMON_CONFIG_DIR", dir.path());
        let configuration = load_config();

        assert_eq!(configuration.host, "10.0.0.5");
        assert_eq!(configuration.api.port, 9000);
        assert_eq!(configuration.api.scheme, "http");
        assert_eq!(configuration.metrics.interface, "enp3s0");
        assert_eq!(configuration.metrics.mount_point, "/");
        assert_eq!(
            configuration.cloud.credentials(),
            Some(("file-token".to_string(), 42))
        );

        env::set_var("HOSTMON_PORT", "9100");
        env::set_var("HOSTMON_INTERFACE", "wlan0");
        env::set_var("HCLOUD_TOKEN", "env-token");
        env::set_var("HCLOUD_SERVER_ID", "77");

        let configuration = load_config();
        assert_eq!(configuration.api.port, 9100);
        assert_eq!(configuration.metrics.interface, "wlan0");
        assert_eq!(
            configuration.cloud.credentials(),
            Some(("env-token".to_string(), 77))
        );

        env::remove_var("HOSTMON_PORT");
        env::remove_var("HOSTMON_INTERFACE");
        env::remove_var("HCLOUD_TOKEN");
        env::remove_var("HCLOUD_SERVER_ID");
        env::remove_var("HOSTMON_CONFIG_DIR");
    }

    #[test]
    fn credentials_require_token_and_server_id() {
        let cloud = config::cloud::Cloud {
            token: Some("token".to_string()),
            server_id: None,
        };
        assert_eq!(cloud.credentials(), None);

        let cloud = config::cloud::Cloud {
            token: None,
            server_id: Some(7),
        };
        assert_eq!(cloud.credentials(), None);

        let cloud = config::cloud::Cloud {
            token: Some("".to_string()),
            server_id: Some(7),
        };
        assert_eq!(cloud.credentials(), None);
    }
}

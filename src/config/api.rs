use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Api {
    #[serde(default = "default_port")]
    pub(crate) port: u16,
    #[serde(default = "default_scheme")]
    pub(crate) scheme: String
}

impl Default for Api {
    fn default() -> Self {
        Api {
            port: default_port(),
            scheme: default_scheme(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_scheme() -> String {
    "http".to_string()
}

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct Cloud {
    #[serde(default)]
    pub(crate) token: Option<String>,
    #[serde(default)]
    pub(crate) server_id: Option<u64>,
}

impl Cloud {
    /// Both a token and a server id are required before the traffic quota
    /// lookup is enabled.
    pub(crate) fn credentials(&self) -> Option<(String, u64)> {
        match (&self.token, self.server_id) {
            (Some(token), Some(server_id)) if !token.is_empty() => {
                Some((token.clone(), server_id))
            }
            _ => None,
        }
    }
}

use std::time::Duration;
use serde::Deserialize;

use crate::cloud::error::CloudError;
use crate::cloud::traffic::{TrafficProvider, TrafficTotals};

const API_BASE_URL: &str = "https://api.hetzner.cloud/v1";

// Hard deadline on the quota lookup; the snapshot must never wait longer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) struct HetznerClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

#[derive(Deserialize, Debug)]
struct ServerResponse {
    server: Server,
}

#[derive(Deserialize, Debug)]
struct Server {
    included_traffic: Option<u64>,
    outgoing_traffic: Option<u64>,
}

impl HetznerClient {
    pub(crate) fn new(token: String) -> HetznerClient {
        HetznerClient::with_base_url(token, API_BASE_URL.to_string())
    }

    pub(crate) fn with_base_url(token: String, base_url: String) -> HetznerClient {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build();

        HetznerClient {
            agent,
            base_url,
            token,
        }
    }
}

impl TrafficProvider for HetznerClient {
    fn traffic_totals(&self, server_id: u64) -> Result<TrafficTotals, CloudError> {
        let url = format!("{}/servers/{}", self.base_url, server_id);

        let response = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .call()?;

        let body: ServerResponse = response.into_json()?;

        Ok(TrafficTotals {
            included: body.server.included_traffic.unwrap_or(0),
            outgoing: body.server.outgoing_traffic.unwrap_or(0),
        })
    }
}

use std::sync::Arc;
use std::{net::SocketAddr, time::Duration};
use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::get,
    Router,
};

use tower::{BoxError, ServiceBuilder};

use crate::api::action::healthz::healthz;
use crate::api::action::metrics::get::get as metrics_get;
use crate::cloud::hetzner::HetznerClient;
use crate::cloud::traffic::{TrafficCache, TrafficProvider, TrafficState};
use crate::config::config::Config;
use crate::metrics::provider::{MetricsProvider, SysinfoProvider};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Config,
    pub(crate) provider: Arc<dyn MetricsProvider>,
    pub(crate) traffic: Option<TrafficState>,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(metrics_get))
        .route("/healthz", get(healthz))

        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|error: BoxError| async move {
                    if error.is::<tower::timeout::error::Elapsed>() {
                        Ok(StatusCode::REQUEST_TIMEOUT)
                    } else {
                        Err((
                            StatusCode::INTERNAL_SERVER_ERROR,
                            format!("Unhandled internal error: {}", error),
                        ))
                    }
                }))
                .timeout(Duration::from_secs(10))
                .into_inner(),
        )
        .with_state(state)
}

pub(crate) async fn start(mut configuration: Config)
{
    info!("Starting server on {}", configuration.get_api_url());

    let traffic = match configuration.cloud.credentials() {
        Some((token, server_id)) => Some(TrafficState {
            provider: Arc::new(HetznerClient::new(token)) as Arc<dyn TrafficProvider>,
            server_id,
            cache: Arc::new(TrafficCache::new()),
        }),
        None => {
            info!("Traffic quota lookup deactivated, no token and server id provided");
            None
        }
    };

    let state = AppState {
        config: configuration.clone(),
        provider: Arc::new(SysinfoProvider),
        traffic,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], configuration.api.port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    axum::serve(listener, router(state).into_make_service())
        .await
        .unwrap();
}

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::header;
use http::StatusCode;

use crate::api::server::AppState;
use crate::metrics::collector;

/// `GET /` — runs one collection cycle and serves the snapshot. Metric
/// failures degrade fields inside the collector; the only 500 this handler
/// can produce is a JSON encoding failure.
pub(crate) async fn get(State(state): State<AppState>) -> Response {
    let snapshot = collector::collect(
        &state.provider,
        state.traffic.as_ref(),
        &state.config.metrics,
    )
    .await;

    match serde_json::to_vec(&snapshot) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!("Error while encoding JSON: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

use axum::Json;
use axum::response::IntoResponse;
use http::StatusCode;

#[derive(serde::Serialize)]
struct Healthz {
    state: String,
}

pub(crate) async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(Healthz {
        state: "UP".to_string(),
    }))
}

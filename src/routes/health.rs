use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /health — static liveness payload for the processor service.
pub async fn processor_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "processor",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health — static liveness payload for the analytics service.
pub async fn analytics_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "analytics-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

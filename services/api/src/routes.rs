use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use pitch_coach::providers::{EvaluationProvider, TranscriptionProvider};
use pitch_coach::statistics::StatisticsRepository;
use pitch_coach::{coaching_router, PitchCoachService};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Adds readiness and metrics endpoints to the coaching routes.
pub(crate) fn with_operational_routes<T, E, S>(service: Arc<PitchCoachService<T, E, S>>) -> Router
where
    T: TranscriptionProvider + 'static,
    E: EvaluationProvider + 'static,
    S: StatisticsRepository + 'static,
{
    coaching_router(service)
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

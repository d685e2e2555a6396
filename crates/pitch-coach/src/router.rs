use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::evaluation::NormalizedEvaluation;
use crate::providers::{AudioUpload, EvaluationProvider, TranscriptionProvider};
use crate::service::{EvaluationRequest, HealthReport, PitchCoachService, TranscriptionResponse};
use crate::statistics::{StatisticsRepository, StatisticsSummary};

const AUDIO_FIELD: &str = "audio";
const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_RECENT_LIMIT: usize = 10;
const MAX_RECENT_LIMIT: usize = 100;

/// Router builder exposing evaluation, transcription, statistics, and health.
pub fn coaching_router<T, E, S>(service: Arc<PitchCoachService<T, E, S>>) -> Router
where
    T: TranscriptionProvider + 'static,
    E: EvaluationProvider + 'static,
    S: StatisticsRepository + 'static,
{
    Router::new()
        .route("/evaluate", post(evaluate_handler::<T, E, S>))
        .route(
            "/transcribe",
            post(transcribe_handler::<T, E, S>).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .route("/statistics", get(statistics_handler::<T, E, S>))
        .route("/health", get(health_handler::<T, E, S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatisticsParams {
    limit: Option<usize>,
}

pub(crate) async fn evaluate_handler<T, E, S>(
    State(service): State<Arc<PitchCoachService<T, E, S>>>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Json<NormalizedEvaluation>, AppError>
where
    T: TranscriptionProvider + 'static,
    E: EvaluationProvider + 'static,
    S: StatisticsRepository + 'static,
{
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let evaluation = tokio::task::spawn_blocking(move || service.evaluate(request)).await??;
    Ok(Json(evaluation))
}

pub(crate) async fn transcribe_handler<T, E, S>(
    State(service): State<Arc<PitchCoachService<T, E, S>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResponse>, AppError>
where
    T: TranscriptionProvider + 'static,
    E: EvaluationProvider + 'static,
    S: StatisticsRepository + 'static,
{
    let mut multipart =
        multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let audio = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?
            .ok_or_else(|| {
                AppError::BadRequest(format!("multipart field '{AUDIO_FIELD}' is required"))
            })?;
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("recording.webm").to_string();
        let content_type = field
            .content_type()
            .and_then(|value| value.parse::<mime::Mime>().ok())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        break AudioUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        };
    };

    let transcription = tokio::task::spawn_blocking(move || service.transcribe(audio)).await??;
    Ok(Json(transcription))
}

pub(crate) async fn statistics_handler<T, E, S>(
    State(service): State<Arc<PitchCoachService<T, E, S>>>,
    params: Result<Query<StatisticsParams>, QueryRejection>,
) -> Result<Json<StatisticsSummary>, AppError>
where
    T: TranscriptionProvider + 'static,
    E: EvaluationProvider + 'static,
    S: StatisticsRepository + 'static,
{
    let Query(params) = params.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);
    Ok(Json(service.statistics(limit)?))
}

pub(crate) async fn health_handler<T, E, S>(
    State(service): State<Arc<PitchCoachService<T, E, S>>>,
) -> Json<HealthReport>
where
    T: TranscriptionProvider + 'static,
    E: EvaluationProvider + 'static,
    S: StatisticsRepository + 'static,
{
    Json(service.health())
}

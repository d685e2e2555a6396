use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::evaluation::{normalize, InvalidInputError, NormalizedEvaluation};
use crate::providers::{
    AudioUpload, EvaluationProvider, InvalidDuration, PitchDuration, ProviderError,
    TranscriptionProvider,
};
use crate::statistics::{
    EvaluationRecord, RepositoryError, StatisticsRepository, StatisticsSummary,
};

/// Body of `POST /evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub transcript: String,
    pub duration: u32,
}

/// Body returned by `POST /transcribe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub transcript: String,
    pub language: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub services: ServiceAvailability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceAvailability {
    pub transcription: bool,
    pub evaluation: bool,
    pub statistics: bool,
}

/// Composes the providers, the normalizer, and the statistics repository.
pub struct PitchCoachService<T, E, S> {
    transcriber: Arc<T>,
    evaluator: Arc<E>,
    statistics: Arc<S>,
}

impl<T, E, S> PitchCoachService<T, E, S>
where
    T: TranscriptionProvider + 'static,
    E: EvaluationProvider + 'static,
    S: StatisticsRepository + 'static,
{
    pub fn new(transcriber: Arc<T>, evaluator: Arc<E>, statistics: Arc<S>) -> Self {
        Self {
            transcriber,
            evaluator,
            statistics,
        }
    }

    /// Score a transcript, store the anonymous record, and return the result.
    ///
    /// Provider failures surface unchanged; an incomplete rubric response is
    /// normalized rather than rejected.
    pub fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<NormalizedEvaluation, ServiceError> {
        let duration = PitchDuration::try_from(request.duration)?;
        let transcript = request.transcript.trim();
        if transcript.is_empty() {
            return Err(ServiceError::EmptyTranscript);
        }

        let raw = self.evaluator.evaluate(transcript, duration)?;
        let evaluation = normalize(&raw)?;

        let record = EvaluationRecord::from_evaluation(&evaluation, duration, Utc::now());
        self.statistics.insert(record)?;

        info!(
            %duration,
            overall_score = evaluation.overall_score,
            proposals = evaluation.proposals.len(),
            "pitch evaluated"
        );
        Ok(evaluation)
    }

    pub fn transcribe(&self, audio: AudioUpload) -> Result<TranscriptionResponse, ServiceError> {
        if audio.bytes.is_empty() {
            return Err(ServiceError::EmptyAudio);
        }

        let started = Instant::now();
        let transcription = self.transcriber.transcribe(&audio)?;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if transcription.transcript.is_empty() {
            warn!(file = %audio.file_name, "transcription returned no text");
        }

        Ok(TranscriptionResponse {
            transcript: transcription.transcript,
            language: transcription.language,
            duration_ms,
        })
    }

    pub fn statistics(&self, recent_limit: usize) -> Result<StatisticsSummary, ServiceError> {
        Ok(self.statistics.summary(recent_limit)?)
    }

    pub fn health(&self) -> HealthReport {
        let statistics = self.statistics.ping().is_ok();
        HealthReport {
            status: if statistics { "ok" } else { "degraded" },
            services: ServiceAvailability {
                transcription: true,
                evaluation: true,
                statistics,
            },
        }
    }
}

/// Error raised by the pitch coach service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Duration(#[from] InvalidDuration),
    #[error("transcript must not be empty")]
    EmptyTranscript,
    #[error("audio upload must not be empty")]
    EmptyAudio,
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::{json, Value};

use crate::providers::{
    AudioUpload, EvaluationProvider, PitchDuration, ProviderError, Transcription,
    TranscriptionProvider,
};
use crate::service::PitchCoachService;
use crate::statistics::{
    EvaluationRecord, InMemoryStatisticsRepository, RepositoryError, StatisticsRepository,
    StatisticsSummary,
};

/// Rubric response whose category means are 85.75 / 82.5 / 85.75 / 65.
pub(super) fn sample_raw_evaluation() -> Value {
    json!({
        "kpis": {
            "call_to_action": { "clear_ask": 85, "urgency": 90, "specificity": 80, "next_steps": 88 },
            "structure_time": { "opening": 75, "logical_flow": 85, "time_management": 80, "closing": 90 },
            "content_clarity": { "core_message": 95, "language_precision": 88, "evidence": 82, "audience_fit": 78 },
            "memorability": { "storytelling": 60, "vivid_language": 70, "hook": 65 }
        },
        "proposals": [
            { "type": "CTA_IMPROVEMENT", "title": "Klare Bitte", "description": "Nennen Sie den nächsten Schritt.", "priority": "HIGH" },
            { "type": "STORYTELLING", "title": "Beispiel", "description": "Erzählen Sie eine kurze Geschichte.", "priority": "LOW" }
        ],
        "word_count": 118,
        "summary": "Starker Abschluss, wenig Bildsprache."
    })
}

#[derive(Default)]
pub(super) struct ScriptedEvaluator {
    response: Mutex<Option<Result<Value, String>>>,
    calls: Mutex<Vec<(String, PitchDuration)>>,
}

impl ScriptedEvaluator {
    pub(super) fn returning(value: Value) -> Self {
        Self {
            response: Mutex::new(Some(Ok(value))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(message: &str) -> Self {
        Self {
            response: Mutex::new(Some(Err(message.to_string()))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<(String, PitchDuration)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl EvaluationProvider for ScriptedEvaluator {
    fn evaluate(
        &self,
        transcript: &str,
        duration: PitchDuration,
    ) -> Result<Value, ProviderError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((transcript.to_string(), duration));
        match self
            .response
            .lock()
            .expect("response mutex poisoned")
            .clone()
        {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(ProviderError::Upstream {
                provider: "evaluation",
                message,
            }),
            None => Ok(json!({})),
        }
    }
}

pub(super) struct FixedTranscriber {
    pub(super) text: String,
}

impl TranscriptionProvider for FixedTranscriber {
    fn transcribe(&self, _audio: &AudioUpload) -> Result<Transcription, ProviderError> {
        Ok(Transcription {
            transcript: self.text.clone(),
            language: "de".to_string(),
            confidence: Some(0.93),
        })
    }
}

pub(super) struct UnavailableStatistics;

impl StatisticsRepository for UnavailableStatistics {
    fn insert(&self, _record: EvaluationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn summary(&self, _recent_limit: usize) -> Result<StatisticsSummary, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn ping(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) type TestService =
    PitchCoachService<FixedTranscriber, ScriptedEvaluator, InMemoryStatisticsRepository>;

pub(super) fn build_service(
    evaluator: ScriptedEvaluator,
) -> (
    TestService,
    Arc<ScriptedEvaluator>,
    Arc<InMemoryStatisticsRepository>,
) {
    let evaluator = Arc::new(evaluator);
    let statistics = Arc::new(InMemoryStatisticsRepository::default());
    let service = PitchCoachService::new(
        Arc::new(FixedTranscriber {
            text: "Guten Tag, ich stelle Ihnen heute unser Produkt vor.".to_string(),
        }),
        evaluator.clone(),
        statistics.clone(),
    );
    (service, evaluator, statistics)
}

pub(super) fn audio_upload() -> AudioUpload {
    AudioUpload {
        file_name: "pitch.webm".to_string(),
        content_type: "audio/webm".parse().expect("valid mime"),
        bytes: vec![0x1a, 0x45, 0xdf, 0xa3],
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::providers::{PitchDuration, ProviderError};
use crate::service::{EvaluationRequest, PitchCoachService, ServiceError};
use crate::statistics::{
    EvaluationRecord, InMemoryStatisticsRepository, RepositoryError, StatisticsRepository,
    StatisticsSummary,
};

fn request(duration: u32) -> EvaluationRequest {
    EvaluationRequest {
        transcript: "  Wir lösen das Parkplatzproblem in Innenstädten.  ".to_string(),
        duration,
    }
}

#[test]
fn evaluate_normalizes_and_records_statistics() {
    let (service, evaluator, statistics) =
        build_service(ScriptedEvaluator::returning(sample_raw_evaluation()));

    let evaluation = service.evaluate(request(60)).expect("evaluation succeeds");

    assert_eq!(evaluation.overall_score, 81.8);
    assert_eq!(
        evaluator.calls(),
        vec![(
            "Wir lösen das Parkplatzproblem in Innenstädten.".to_string(),
            PitchDuration::Long
        )]
    );

    let summary = statistics.summary(5).expect("summary available");
    assert_eq!(summary.total_count, 1);
    assert_eq!(summary.recent[0].duration, PitchDuration::Long);
    assert_eq!(summary.recent[0].overall_score, 81.8);
    assert_eq!(summary.proposal_types.get("CTA_IMPROVEMENT"), Some(&1));
}

#[test]
fn incomplete_model_output_is_normalized_not_rejected() {
    let (service, _, _) = build_service(ScriptedEvaluator::returning(json!({
        "kpis": { "call_to_action": { "clear_ask": 50 } },
        "proposals": [{ "priority": "URGENT" }]
    })));

    let evaluation = service.evaluate(request(45)).expect("evaluation succeeds");

    assert_eq!(evaluation.kpis.call_to_action.len(), 4);
    assert_eq!(evaluation.overall_score, 5.0);
    assert_eq!(evaluation.proposals[0].title, "Verbesserung");
}

#[test]
fn unsupported_duration_is_rejected_before_provider_call() {
    let (service, evaluator, _) =
        build_service(ScriptedEvaluator::returning(sample_raw_evaluation()));

    let err = service.evaluate(request(30)).expect_err("30s is not supported");

    assert!(matches!(err, ServiceError::Duration(_)));
    assert!(evaluator.calls().is_empty());
}

#[test]
fn blank_transcript_is_rejected() {
    let (service, evaluator, _) =
        build_service(ScriptedEvaluator::returning(sample_raw_evaluation()));

    let err = service
        .evaluate(EvaluationRequest {
            transcript: "   ".to_string(),
            duration: 45,
        })
        .expect_err("blank transcript");

    assert!(matches!(err, ServiceError::EmptyTranscript));
    assert!(evaluator.calls().is_empty());
}

#[test]
fn upstream_failure_propagates_without_recording() {
    let (service, evaluator, statistics) =
        build_service(ScriptedEvaluator::failing("HTTP 500 Internal Server Error"));

    let err = service.evaluate(request(45)).expect_err("provider failed");

    match err {
        ServiceError::Provider(ProviderError::Upstream { message, .. }) => {
            assert!(message.contains("500"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert_eq!(evaluator.calls().len(), 1, "failures are not retried");
    assert_eq!(statistics.summary(5).unwrap().total_count, 0);
}

#[test]
fn non_object_model_output_is_invalid_input() {
    let (service, _, statistics) =
        build_service(ScriptedEvaluator::returning(json!("not an object")));

    let err = service.evaluate(request(45)).expect_err("string output");

    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(statistics.summary(5).unwrap().total_count, 0);
}

#[test]
fn repository_failure_surfaces_and_degrades_health() {
    let service = PitchCoachService::new(
        Arc::new(FixedTranscriber {
            text: "Hallo".to_string(),
        }),
        Arc::new(ScriptedEvaluator::returning(sample_raw_evaluation())),
        Arc::new(UnavailableStatistics),
    );

    let err = service.evaluate(request(45)).expect_err("store offline");
    assert!(matches!(err, ServiceError::Repository(_)));

    let health = service.health();
    assert_eq!(health.status, "degraded");
    assert!(!health.services.statistics);
}

#[test]
fn transcribe_reports_text_language_and_timing() {
    let (service, _, _) = build_service(ScriptedEvaluator::default());

    let response = service.transcribe(audio_upload()).expect("transcription succeeds");

    assert!(response.transcript.starts_with("Guten Tag"));
    assert_eq!(response.language, "de");
}

#[test]
fn transcribe_rejects_empty_audio() {
    let (service, _, _) = build_service(ScriptedEvaluator::default());
    let mut audio = audio_upload();
    audio.bytes.clear();

    let err = service.transcribe(audio).expect_err("empty audio");

    assert!(matches!(err, ServiceError::EmptyAudio));
}

#[test]
fn health_reports_all_services_ok() {
    let (service, _, _) = build_service(ScriptedEvaluator::default());
    let health = service.health();

    assert_eq!(health.status, "ok");
    assert!(health.services.transcription && health.services.evaluation);
}

#[derive(Default)]
struct SummaryCounting {
    inner: InMemoryStatisticsRepository,
    summaries: AtomicUsize,
}

impl StatisticsRepository for SummaryCounting {
    fn insert(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        self.inner.insert(record)
    }

    fn summary(&self, recent_limit: usize) -> Result<StatisticsSummary, RepositoryError> {
        self.summaries.fetch_add(1, Ordering::SeqCst);
        self.inner.summary(recent_limit)
    }

    fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping()
    }
}

#[test]
fn health_checks_the_store_without_aggregating_records() {
    let statistics = Arc::new(SummaryCounting::default());
    let service = PitchCoachService::new(
        Arc::new(FixedTranscriber {
            text: "Hallo".to_string(),
        }),
        Arc::new(ScriptedEvaluator::returning(sample_raw_evaluation())),
        Arc::clone(&statistics),
    );
    service.evaluate(request(60)).expect("evaluation succeeds");

    let health = service.health();

    assert_eq!(health.status, "ok");
    assert!(health.services.statistics);
    assert_eq!(statistics.summaries.load(Ordering::SeqCst), 0);
}

#[test]
fn statistics_are_shared_across_service_instances() {
    let statistics = Arc::new(InMemoryStatisticsRepository::default());
    for _ in 0..2 {
        let service = PitchCoachService::new(
            Arc::new(FixedTranscriber {
                text: "Hallo".to_string(),
            }),
            Arc::new(ScriptedEvaluator::returning(sample_raw_evaluation())),
            statistics.clone(),
        );
        service.evaluate(request(45)).expect("evaluation succeeds");
    }

    assert_eq!(statistics.summary(1).unwrap().total_count, 2);
}

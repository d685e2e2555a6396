use metrics_exporter_prometheus::PrometheusHandle;
use pitch_coach::config::ProviderConfig;
use pitch_coach::error::AppError;
use pitch_coach::providers::{OpenAiEvaluator, OpenAiTranscriber};
use pitch_coach::statistics::InMemoryStatisticsRepository;
use pitch_coach::PitchCoachService;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type ProductionService =
    PitchCoachService<OpenAiTranscriber, OpenAiEvaluator, InMemoryStatisticsRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the OpenAI-compatible providers; fails when the API key is absent.
pub(crate) fn build_service(providers: &ProviderConfig) -> Result<ProductionService, AppError> {
    let transcriber = OpenAiTranscriber::new(providers.clone())?;
    let evaluator = OpenAiEvaluator::new(providers.clone())?;
    let statistics = InMemoryStatisticsRepository::default();

    Ok(PitchCoachService::new(
        Arc::new(transcriber),
        Arc::new(evaluator),
        Arc::new(statistics),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_service_requires_api_key() {
        let result = build_service(&ProviderConfig::default());
        assert!(matches!(result, Err(AppError::MissingConfig(_))));
    }

    #[test]
    fn build_service_accepts_configured_key() {
        let providers = ProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..ProviderConfig::default()
        };
        assert!(build_service(&providers).is_ok());
    }
}

use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::prompt::{evaluation_prompt, SYSTEM_PROMPT};
use super::{
    AudioUpload, EvaluationProvider, MissingConfigError, PitchDuration, ProviderError,
    Transcription, TranscriptionProvider,
};
use crate::config::ProviderConfig;

const TRANSCRIPTION_PROVIDER: &str = "transcription";
const EVALUATION_PROVIDER: &str = "evaluation";
const API_KEY_VAR: &str = "OPENAI_API_KEY";
const TRANSCRIPTION_LANGUAGE: &str = "de";

/// Whisper-compatible `audio/transcriptions` client.
#[derive(Clone)]
pub struct OpenAiTranscriber {
    config: ProviderConfig,
    api_key: String,
}

impl OpenAiTranscriber {
    pub fn new(config: ProviderConfig) -> Result<Self, MissingConfigError> {
        let api_key = require_key(&config)?;
        Ok(Self { config, api_key })
    }
}

impl TranscriptionProvider for OpenAiTranscriber {
    fn transcribe(&self, audio: &AudioUpload) -> Result<Transcription, ProviderError> {
        let part = multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(audio.content_type.as_ref())
            .map_err(|err| ProviderError::upstream(TRANSCRIPTION_PROVIDER, err.to_string()))?;
        let form = multipart::Form::new()
            .text("model", self.config.transcription_model.clone())
            .text("language", TRANSCRIPTION_LANGUAGE)
            .text("response_format", "verbose_json")
            .part("file", part);

        debug!(bytes = audio.bytes.len(), file = %audio.file_name, "sending audio for transcription");

        let body: Value = http_client(&self.config, TRANSCRIPTION_PROVIDER)?
            .post(self.config.endpoint("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|err| upstream_failure(TRANSCRIPTION_PROVIDER, err))?;

        parse_transcription(&body)
    }
}

/// Chat-completions client returning the model's JSON rubric response.
#[derive(Clone)]
pub struct OpenAiEvaluator {
    config: ProviderConfig,
    api_key: String,
}

impl OpenAiEvaluator {
    pub fn new(config: ProviderConfig) -> Result<Self, MissingConfigError> {
        let api_key = require_key(&config)?;
        Ok(Self { config, api_key })
    }

    fn request_body(&self, transcript: &str, duration: PitchDuration) -> Value {
        json!({
            "model": self.config.evaluation_model,
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": evaluation_prompt(transcript, duration) }
            ]
        })
    }
}

impl EvaluationProvider for OpenAiEvaluator {
    fn evaluate(&self, transcript: &str, duration: PitchDuration) -> Result<Value, ProviderError> {
        debug!(%duration, model = %self.config.evaluation_model, "requesting rubric evaluation");

        let body: Value = http_client(&self.config, EVALUATION_PROVIDER)?
            .post(self.config.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(transcript, duration))
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|err| upstream_failure(EVALUATION_PROVIDER, err))?;

        parse_completion(&body)
    }
}

fn require_key(config: &ProviderConfig) -> Result<String, MissingConfigError> {
    config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(MissingConfigError { key: API_KEY_VAR })
}

// Built per call: a blocking client must not be created or dropped on an
// async worker thread, and callers run providers via `spawn_blocking`.
fn http_client(config: &ProviderConfig, provider: &'static str) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::upstream(provider, err.to_string()))
}

fn upstream_failure(provider: &'static str, err: reqwest::Error) -> ProviderError {
    let message = match err.status() {
        Some(status) => format!("HTTP {status}"),
        None if err.is_timeout() => "request timed out".to_string(),
        None => err.to_string(),
    };
    warn!(provider, %message, "provider call failed");
    ProviderError::upstream(provider, message)
}

#[derive(Debug, Deserialize)]
struct TranscriptionBody {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionSegment {
    avg_logprob: f64,
}

pub(crate) fn parse_transcription(body: &Value) -> Result<Transcription, ProviderError> {
    let parsed = TranscriptionBody::deserialize(body)
        .map_err(|err| ProviderError::malformed(TRANSCRIPTION_PROVIDER, err.to_string()))?;

    // Segment log-probabilities averaged and mapped back to a 0..1 probability.
    let confidence = if parsed.segments.is_empty() {
        None
    } else {
        let mean = parsed
            .segments
            .iter()
            .map(|segment| segment.avg_logprob)
            .sum::<f64>()
            / parsed.segments.len() as f64;
        Some(mean.exp().clamp(0.0, 1.0))
    };

    Ok(Transcription {
        transcript: parsed.text.trim().to_string(),
        language: parsed
            .language
            .unwrap_or_else(|| TRANSCRIPTION_LANGUAGE.to_string()),
        confidence,
    })
}

pub(crate) fn parse_completion(body: &Value) -> Result<Value, ProviderError> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::malformed(EVALUATION_PROVIDER, "no message content"))?;

    serde_json::from_str(strip_code_fence(content))
        .map_err(|err| ProviderError::malformed(EVALUATION_PROVIDER, err.to_string()))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

//! Boundary to the speech-to-text and language-model services.

mod openai;
mod prompt;

pub use openai::{OpenAiEvaluator, OpenAiTranscriber};
pub use prompt::evaluation_prompt;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target length of the recorded pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PitchDuration {
    Short,
    Long,
}

impl PitchDuration {
    pub fn seconds(self) -> u32 {
        match self {
            PitchDuration::Short => 45,
            PitchDuration::Long => 60,
        }
    }
}

impl TryFrom<u32> for PitchDuration {
    type Error = InvalidDuration;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            45 => Ok(PitchDuration::Short),
            60 => Ok(PitchDuration::Long),
            other => Err(InvalidDuration(other)),
        }
    }
}

impl From<PitchDuration> for u32 {
    fn from(value: PitchDuration) -> Self {
        value.seconds()
    }
}

impl fmt::Display for PitchDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("duration must be 45 or 60 seconds, got {0}")]
pub struct InvalidDuration(pub u32);

/// Recorded audio handed to the transcription provider.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

/// Result of a transcription call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub transcript: String,
    pub language: String,
    pub confidence: Option<f64>,
}

/// Converts recorded speech into text.
pub trait TranscriptionProvider: Send + Sync {
    fn transcribe(&self, audio: &AudioUpload) -> Result<Transcription, ProviderError>;
}

/// Scores a transcript against the rubric, returning the model's raw JSON.
///
/// The returned value is untrusted and must go through
/// [`crate::evaluation::normalize`] before use.
pub trait EvaluationProvider: Send + Sync {
    fn evaluate(
        &self,
        transcript: &str,
        duration: PitchDuration,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// A required credential was absent when a provider was constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing configuration: {key} must be set")]
pub struct MissingConfigError {
    pub key: &'static str,
}

/// Failure reported by, or while talking to, an external provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },
    #[error("{provider} returned an unreadable response: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub(crate) fn upstream(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider,
            message: message.into(),
        }
    }
}

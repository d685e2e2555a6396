use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_PROPOSALS: usize = 3;

const DEFAULT_TYPE: &str = "GENERAL_IMPROVEMENT";
const DEFAULT_TITLE: &str = "Verbesserung";
const DEFAULT_DESCRIPTION: &str = "Siehe Bewertungsdetails";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProposalPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl ProposalPriority {
    /// Exact, case-sensitive match; anything else yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// Improvement suggestion attached to an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub priority: ProposalPriority,
}

impl Proposal {
    pub(crate) fn from_raw(raw: &Value) -> Self {
        let priority = raw
            .get("priority")
            .and_then(Value::as_str)
            .and_then(ProposalPriority::parse)
            .unwrap_or_default();

        Self {
            kind: text_or(raw, "type", DEFAULT_TYPE),
            title: text_or(raw, "title", DEFAULT_TITLE),
            description: text_or(raw, "description", DEFAULT_DESCRIPTION),
            priority,
        }
    }
}

pub(crate) fn proposals_from_raw(raw: Option<&Value>) -> Vec<Proposal> {
    match raw.and_then(Value::as_array) {
        Some(entries) => entries
            .iter()
            .take(MAX_PROPOSALS)
            .map(Proposal::from_raw)
            .collect(),
        None => Vec::new(),
    }
}

fn text_or(raw: &Value, field: &str, fallback: &str) -> String {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

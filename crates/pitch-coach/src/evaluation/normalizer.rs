use serde_json::{Map, Value};

use super::proposals::proposals_from_raw;
use super::rubric::{Category, SubScores};
use super::scoring::overall_score;
use super::{CategoryScores, KpiScores, NormalizedEvaluation};

pub const DEFAULT_SUMMARY: &str = "Bewertung abgeschlossen";

/// Raised when the raw evaluation is not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: expected an evaluation object, got {found}")]
pub struct InvalidInputError {
    pub found: &'static str,
}

/// Completes an untrusted rubric response.
///
/// Every category and expected sub-criterion is present in the result; gaps
/// default to 0 and extra numeric sub-criteria are carried through and take
/// part in their category mean. Only a non-object top level is rejected.
pub fn normalize(raw: &Value) -> Result<NormalizedEvaluation, InvalidInputError> {
    let object = raw.as_object().ok_or(InvalidInputError {
        found: json_kind(raw),
    })?;

    let raw_kpis = object.get("kpis").and_then(Value::as_object);
    let mut kpis = KpiScores::template();
    for category in Category::ALL {
        let supplied = raw_kpis
            .and_then(|kpis| kpis.get(category.key()))
            .and_then(Value::as_object);
        if let Some(supplied) = supplied {
            merge_category(kpis.get_mut(category), supplied);
        }
    }

    let category_scores = CategoryScores::from_kpis(&kpis);
    let overall_score = overall_score(&category_scores);

    Ok(NormalizedEvaluation {
        kpis,
        category_scores,
        overall_score,
        proposals: proposals_from_raw(object.get("proposals")),
        word_count: word_count(object.get("word_count")),
        summary: object
            .get("summary")
            .and_then(Value::as_str)
            .filter(|summary| !summary.is_empty())
            .unwrap_or(DEFAULT_SUMMARY)
            .to_string(),
    })
}

/// Overlays caller scores on the zero template. Expected criteria with a
/// non-numeric value stay 0; unknown non-numeric entries are skipped.
fn merge_category(template: &mut SubScores, supplied: &Map<String, Value>) {
    for (name, value) in supplied {
        match finite_number(value) {
            Some(score) => {
                template.insert(name.clone(), score);
            }
            None => {
                tracing::debug!(criterion = %name, "ignoring non-numeric sub-score");
            }
        }
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|number| number.is_finite())
}

fn word_count(raw: Option<&Value>) -> u64 {
    match raw {
        Some(value) => value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|count| count.is_finite() && *count >= 0.0)
                    .map(|count| count.trunc() as u64)
            })
            .unwrap_or(0),
        None => 0,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

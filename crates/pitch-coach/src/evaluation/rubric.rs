use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sub-criterion name to score. Ordered so serialized output is stable.
pub type SubScores = BTreeMap<String, f64>;

/// Weighted rubric category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CallToAction,
    StructureTime,
    ContentClarity,
    Memorability,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::CallToAction,
        Category::StructureTime,
        Category::ContentClarity,
        Category::Memorability,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::CallToAction => "call_to_action",
            Category::StructureTime => "structure_time",
            Category::ContentClarity => "content_clarity",
            Category::Memorability => "memorability",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::CallToAction => "Call to Action",
            Category::StructureTime => "Struktur & Zeitmanagement",
            Category::ContentClarity => "Inhaltliche Klarheit",
            Category::Memorability => "Einprägsamkeit",
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Category::CallToAction => 0.40,
            Category::StructureTime => 0.25,
            Category::ContentClarity => 0.20,
            Category::Memorability => 0.15,
        }
    }

    pub fn criteria(self) -> &'static [&'static str] {
        match self {
            Category::CallToAction => &["clear_ask", "urgency", "specificity", "next_steps"],
            Category::StructureTime => {
                &["opening", "logical_flow", "time_management", "closing"]
            }
            Category::ContentClarity => &[
                "core_message",
                "language_precision",
                "evidence",
                "audience_fit",
            ],
            Category::Memorability => &["storytelling", "vivid_language", "hook"],
        }
    }

    /// Every sub-criterion of this category set to zero.
    pub fn template(self) -> SubScores {
        self.criteria()
            .iter()
            .map(|name| ((*name).to_string(), 0.0))
            .collect()
    }
}

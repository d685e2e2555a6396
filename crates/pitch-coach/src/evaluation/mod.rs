//! Rubric definition and the normalizer that turns untrusted model output
//! into a complete, weighted evaluation.

mod normalizer;
mod proposals;
pub mod rubric;
mod scoring;

pub use normalizer::{normalize, InvalidInputError, DEFAULT_SUMMARY};
pub use proposals::{Proposal, ProposalPriority, MAX_PROPOSALS};
pub use rubric::{Category, SubScores};
pub use scoring::{category_score, overall_score, round_one_decimal};

use serde::{Deserialize, Serialize};

/// Sub-criterion scores for all four rubric categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiScores {
    pub call_to_action: SubScores,
    pub structure_time: SubScores,
    pub content_clarity: SubScores,
    pub memorability: SubScores,
}

impl KpiScores {
    pub fn get(&self, category: Category) -> &SubScores {
        match category {
            Category::CallToAction => &self.call_to_action,
            Category::StructureTime => &self.structure_time,
            Category::ContentClarity => &self.content_clarity,
            Category::Memorability => &self.memorability,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut SubScores {
        match category {
            Category::CallToAction => &mut self.call_to_action,
            Category::StructureTime => &mut self.structure_time,
            Category::ContentClarity => &mut self.content_clarity,
            Category::Memorability => &mut self.memorability,
        }
    }

    /// All-zero scores shaped after the rubric.
    pub fn template() -> Self {
        Self {
            call_to_action: Category::CallToAction.template(),
            structure_time: Category::StructureTime.template(),
            content_clarity: Category::ContentClarity.template(),
            memorability: Category::Memorability.template(),
        }
    }
}

/// Mean score per category, in rubric order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub call_to_action: f64,
    pub structure_time: f64,
    pub content_clarity: f64,
    pub memorability: f64,
}

impl CategoryScores {
    pub fn from_kpis(kpis: &KpiScores) -> Self {
        Self {
            call_to_action: category_score(kpis.get(Category::CallToAction)),
            structure_time: category_score(kpis.get(Category::StructureTime)),
            content_clarity: category_score(kpis.get(Category::ContentClarity)),
            memorability: category_score(kpis.get(Category::Memorability)),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::CallToAction => self.call_to_action,
            Category::StructureTime => self.structure_time,
            Category::ContentClarity => self.content_clarity,
            Category::Memorability => self.memorability,
        }
    }
}

/// Complete evaluation produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvaluation {
    pub kpis: KpiScores,
    pub category_scores: CategoryScores,
    pub overall_score: f64,
    pub proposals: Vec<Proposal>,
    pub word_count: u64,
    pub summary: String,
}

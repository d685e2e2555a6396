//! Anonymous evaluation statistics.
//!
//! Records hold scores and proposals only; transcripts and anything that could
//! identify a speaker never reach the repository.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evaluation::{KpiScores, NormalizedEvaluation, Proposal};
use crate::providers::PitchDuration;

/// Stored row for one completed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub duration: PitchDuration,
    pub kpi_scores: KpiScores,
    pub proposals: Vec<Proposal>,
    pub word_count: u64,
    pub overall_score: f64,
    pub timestamp: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn from_evaluation(
        evaluation: &NormalizedEvaluation,
        duration: PitchDuration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            duration,
            kpi_scores: evaluation.kpis.clone(),
            proposals: evaluation.proposals.clone(),
            word_count: evaluation.word_count,
            overall_score: evaluation.overall_score,
            timestamp,
        }
    }
}

/// Aggregate view served by `GET /statistics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub total_count: usize,
    pub recent: Vec<EvaluationRecord>,
    pub proposal_types: BTreeMap<String, u64>,
}

/// Storage abstraction for evaluation statistics.
pub trait StatisticsRepository: Send + Sync {
    fn insert(&self, record: EvaluationRecord) -> Result<(), RepositoryError>;
    /// Totals over all records plus the `recent_limit` newest, newest first.
    fn summary(&self, recent_limit: usize) -> Result<StatisticsSummary, RepositoryError>;
    /// Cheap reachability check used by health reporting; reads no records.
    fn ping(&self) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("statistics store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository; contents are lost on restart.
///
/// Records are never evicted, so memory grows with every evaluation for the
/// lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStatisticsRepository {
    records: Arc<Mutex<Vec<EvaluationRecord>>>,
}

impl InMemoryStatisticsRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<EvaluationRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("statistics mutex poisoned".to_string()))
    }
}

impl StatisticsRepository for InMemoryStatisticsRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        self.lock()?.push(record);
        Ok(())
    }

    fn summary(&self, recent_limit: usize) -> Result<StatisticsSummary, RepositoryError> {
        let guard = self.lock()?;

        let mut proposal_types = BTreeMap::new();
        for proposal in guard.iter().flat_map(|record| record.proposals.iter()) {
            *proposal_types.entry(proposal.kind.clone()).or_insert(0) += 1;
        }

        let mut newest_first: Vec<&EvaluationRecord> = guard.iter().rev().collect();
        newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let recent = newest_first
            .into_iter()
            .take(recent_limit)
            .cloned()
            .collect();

        Ok(StatisticsSummary {
            total_count: guard.len(),
            recent,
            proposal_types,
        })
    }

    fn ping(&self) -> Result<(), RepositoryError> {
        self.lock().map(|_| ())
    }
}

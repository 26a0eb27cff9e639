use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::structures::{
    contestant_stats::ContestantStats, match_record::ContestantId, rating_table::RatingTable, score::Score
};

/// The unit that gets persisted after a fit and reloaded by the betting side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub ratings: RatingTable,
    pub stats: IndexMap<ContestantId, ContestantStats>
}

impl FittedModel {
    pub fn stats_for(&self, id: ContestantId) -> Option<&ContestantStats> {
        self.stats.get(&id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 0-indexed
    pub epoch: usize,
    pub learning_rate: f64,
    pub validation: Option<Score>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs_completed: usize,
    pub epoch_metrics: Vec<EpochMetrics>,
    /// Epoch whose snapshot was kept. `None` without a validation set.
    pub best_epoch: Option<usize>,
    pub best_validation: Option<Score>,
    pub stopped_early: bool
}

#[derive(Debug, Clone)]
pub struct FitResult {
    pub model: FittedModel,
    pub history: TrainingHistory
}

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::structures::match_record::ContestantId;

/// Authoritative id -> rating mapping at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingTable {
    ratings: IndexMap<ContestantId, f64>
}

impl RatingTable {
    pub fn new() -> RatingTable {
        RatingTable {
            ratings: IndexMap::new()
        }
    }

    /// Every id starts at `baseline`.
    pub fn with_baseline(ids: &[ContestantId], baseline: f64) -> RatingTable {
        RatingTable {
            ratings: ids.iter().map(|id| (*id, baseline)).collect()
        }
    }

    /// Explicit overrides win over whatever is already in the table.
    pub fn merge(&mut self, overrides: &HashMap<ContestantId, f64>) {
        let mut ids: Vec<&ContestantId> = overrides.keys().collect();
        ids.sort_unstable();

        for id in ids {
            self.ratings.insert(*id, overrides[id]);
        }
    }

    pub fn get(&self, id: ContestantId) -> Option<f64> {
        self.ratings.get(&id).copied()
    }

    pub fn set(&mut self, id: ContestantId, rating: f64) {
        self.ratings.insert(id, rating);
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContestantId, f64)> + '_ {
        self.ratings.iter().map(|(id, r)| (*id, *r))
    }

    /// Ids ordered by rating, strongest first.
    pub fn leaderboard(&self) -> Vec<(ContestantId, f64)> {
        let mut board: Vec<(ContestantId, f64)> = self.iter().collect();
        board.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        board
    }
}

impl FromIterator<(ContestantId, f64)> for RatingTable {
    fn from_iter<I: IntoIterator<Item = (ContestantId, f64)>>(iter: I) -> Self {
        RatingTable {
            ratings: iter.into_iter().collect()
        }
    }
}

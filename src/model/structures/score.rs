use serde::{Deserialize, Serialize};

/// How well a rating table predicts a set of matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub matches: usize,
    /// Ties at exactly 0.5 contribute half a correct prediction each.
    pub num_correct: f64,
    pub avg_error: f64,
    pub median_error: f64
}

impl Score {
    pub fn accuracy(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }

        self.num_correct / self.matches as f64
    }
}

use serde::{Deserialize, Serialize};

/// Per-contestant classification tallies. The positive class is
/// "this contestant won".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: u32,
    pub true_negatives: u32,
    pub false_positives: u32,
    pub false_negatives: u32
}

impl ConfusionCounts {
    pub fn record(&mut self, predicted_win: bool, actual_win: bool) {
        match (predicted_win, actual_win) {
            (true, true) => self.true_positives += 1,
            (false, false) => self.true_negatives += 1,
            (true, false) => self.false_positives += 1,
            (false, true) => self.false_negatives += 1
        }
    }

    pub fn total(&self) -> u32 {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// `tp / (tp + fp)`
    pub fn true_positive_rate(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `tn / (tn + fn)`
    pub fn true_negative_rate(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_negatives)
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }

    numerator as f64 / denominator as f64
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContestantStats {
    pub times_seen: u32,
    pub wins: u32,
    pub losses: u32,
    pub accuracy: f64,
    pub true_positive_rate: f64,
    pub true_negative_rate: f64
}

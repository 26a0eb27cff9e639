use indexmap::IndexMap;
use rand::Rng;

use crate::model::{
    constants::UNKNOWN_PREDICTION,
    prediction::predict_matches,
    structures::{
        contestant_stats::{ConfusionCounts, ContestantStats},
        match_record::{ContestantId, MatchRecord, Outcome},
        rating_table::RatingTable,
        score::Score
    }
};

/// Scores `table` against the realized outcomes of `matches`.
pub fn score(table: &RatingTable, matches: &[MatchRecord]) -> Score {
    let predictions = predict_matches(table, matches);
    let outcomes: Vec<Outcome> = matches.iter().map(|m| m.outcome).collect();

    score_predictions(&predictions, &outcomes)
}

/// An empty set scores zero across the board.
pub fn score_predictions(predictions: &[f64], outcomes: &[Outcome]) -> Score {
    if predictions.len() != outcomes.len() {
        panic!("Expected one prediction per outcome!")
    }

    if predictions.is_empty() {
        return Score::default();
    }

    let num_correct = predictions
        .iter()
        .zip(outcomes)
        .map(|(pred, outcome)| correctness(*pred, *outcome))
        .sum();

    let mut errors: Vec<f64> = predictions
        .iter()
        .zip(outcomes)
        .map(|(pred, outcome)| (pred - outcome.as_f64()).abs())
        .collect();
    let avg_error = errors.iter().sum::<f64>() / errors.len() as f64;

    errors.sort_by(f64::total_cmp);

    Score {
        matches: predictions.len(),
        num_correct,
        avg_error,
        median_error: median_of_sorted(&errors)
    }
}

/// Credit for one prediction: 1 or 0 for a call, 0.5 for a tie.
fn correctness(pred: f64, outcome: Outcome) -> f64 {
    if pred == UNKNOWN_PREDICTION {
        return 0.5;
    }

    let predicted_b = pred > UNKNOWN_PREDICTION;
    if predicted_b == (outcome == Outcome::BWon) {
        1.0
    } else {
        0.0
    }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let mid = values.len() / 2;

    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Replays `table` against `matches` and tallies a confusion matrix per
/// contestant. A prediction of exactly 0.5 is settled by one coin flip per
/// match, shared by both rows.
pub fn confusion_counts<R: Rng>(
    table: &RatingTable,
    matches: &[MatchRecord],
    rng: &mut R
) -> IndexMap<ContestantId, ConfusionCounts> {
    let mut counts: IndexMap<ContestantId, ConfusionCounts> = IndexMap::new();

    for (m, pred) in matches.iter().zip(predict_matches(table, matches)) {
        let predicted_b = if pred == UNKNOWN_PREDICTION {
            rng.random_bool(0.5)
        } else {
            pred > UNKNOWN_PREDICTION
        };
        let actual_b = m.outcome == Outcome::BWon;

        counts.entry(m.id_a).or_default().record(!predicted_b, !actual_b);
        counts.entry(m.id_b).or_default().record(predicted_b, actual_b);
    }

    counts
}

/// Appearances, wins and losses per contestant, in first-seen order.
pub fn tally_records(matches: &[MatchRecord]) -> IndexMap<ContestantId, ContestantStats> {
    let mut stats: IndexMap<ContestantId, ContestantStats> = IndexMap::new();

    for m in matches {
        stats.entry(m.id_a).or_default().times_seen += 1;
        stats.entry(m.id_b).or_default().times_seen += 1;
        stats.entry(m.winner()).or_default().wins += 1;
        stats.entry(m.loser()).or_default().losses += 1;
    }

    stats
}

/// Full diagnostic statistics for every contestant in `ids`.
pub fn contestant_stats<R: Rng>(
    table: &RatingTable,
    matches: &[MatchRecord],
    ids: &[ContestantId],
    rng: &mut R
) -> IndexMap<ContestantId, ContestantStats> {
    let records = tally_records(matches);
    let confusion = confusion_counts(table, matches, rng);

    ids.iter()
        .map(|id| {
            let mut stats = records.get(id).cloned().unwrap_or_default();
            let counts = confusion.get(id).copied().unwrap_or_default();

            stats.accuracy = counts.accuracy();
            stats.true_positive_rate = counts.true_positive_rate();
            stats.true_negative_rate = counts.true_negative_rate();

            (*id, stats)
        })
        .collect()
}

use crate::model::{
    constants::{ELO_SCALE, UNKNOWN_PREDICTION},
    structures::{
        match_record::{ContestantId, MatchRecord},
        rating_table::RatingTable
    }
};

/// Probability that contestant B beats contestant A.
///
/// `1 / (1 + 10^((rating_a - rating_b) / 400))`
pub fn predict(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_a - rating_b) / ELO_SCALE))
}

/// Looks both contestants up in `table`. If either is unrated the result is
/// exactly [`UNKNOWN_PREDICTION`].
pub fn predict_ids(table: &RatingTable, id_a: ContestantId, id_b: ContestantId) -> f64 {
    match (table.get(id_a), table.get(id_b)) {
        (Some(rating_a), Some(rating_b)) => predict(rating_a, rating_b),
        _ => UNKNOWN_PREDICTION
    }
}

/// Elementwise [`predict_ids`] over parallel id slices, order preserved.
pub fn predict_batch(table: &RatingTable, ids_a: &[ContestantId], ids_b: &[ContestantId]) -> Vec<f64> {
    if ids_a.len() != ids_b.len() {
        panic!("Expected parallel id slices to have identical lengths!")
    }

    ids_a
        .iter()
        .zip(ids_b)
        .map(|(a, b)| predict_ids(table, *a, *b))
        .collect()
}

pub fn predict_matches(table: &RatingTable, matches: &[MatchRecord]) -> Vec<f64> {
    matches.iter().map(|m| predict_ids(table, m.id_a, m.id_b)).collect()
}

use crate::model::structures::match_record::MatchRecord;

/// Quadratic recency weight of a match played at `t` within `[tmin, tmax]`.
///
/// The oldest match weighs `min_weight`, the newest `1.0`. When every match
/// shares one timestamp they all weigh `1.0`. The position is measured
/// without a `+1` offset on both ends so the oldest match weighs exactly
/// `min_weight` rather than slightly more.
pub fn calculate_weight(t: i64, tmin: i64, tmax: i64, min_weight: f64) -> f64 {
    let position = relative_position(t, tmin, tmax);

    min_weight + (1.0 - min_weight) * position.powi(2)
}

fn relative_position(t: i64, tmin: i64, tmax: i64) -> f64 {
    if tmax <= tmin {
        return 1.0;
    }

    let offset = (t - tmin) as f64;
    let span = (tmax - tmin) as f64;

    (offset / span).clamp(0.0, 1.0)
}

/// Weights for every match, in input order.
pub fn match_weights(matches: &[MatchRecord], min_weight: f64) -> Vec<f64> {
    let (tmin, tmax) = match time_span(matches) {
        Some(span) => span,
        None => return Vec::new()
    };

    matches
        .iter()
        .map(|m| calculate_weight(m.timestamp, tmin, tmax, min_weight))
        .collect()
}

fn time_span(matches: &[MatchRecord]) -> Option<(i64, i64)> {
    let tmin = matches.iter().map(|m| m.timestamp).min()?;
    let tmax = matches.iter().map(|m| m.timestamp).max()?;

    Some((tmin, tmax))
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{
    constants::UNKNOWN_PREDICTION,
    prediction::predict_ids,
    structures::{
        game_mode::GameMode,
        match_record::{ContestantId, Outcome},
        match_status::MatchStatus,
        rating_table::RatingTable
    }
};

/// Placed on coin-flip bets, where the model has nothing to say.
pub const MINIMUM_WAGER: u64 = 1;
pub const DEFAULT_WAGER: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetDecision {
    /// The side expected to win
    pub side: Outcome,
    pub wager: u64,
    /// Probability that B wins
    pub prediction: f64
}

/// Bets `wager` on whichever side the table favors. When the table has no
/// opinion a random side gets the minimum wager instead.
pub fn recommend<R: Rng>(
    table: &RatingTable,
    id_a: ContestantId,
    id_b: ContestantId,
    wager: u64,
    rng: &mut R
) -> BetDecision {
    let prediction = predict_ids(table, id_a, id_b);

    if prediction == UNKNOWN_PREDICTION {
        return coin_flip(rng);
    }

    let side = if prediction > UNKNOWN_PREDICTION {
        Outcome::BWon
    } else {
        Outcome::AWon
    };

    BetDecision {
        side,
        wager,
        prediction
    }
}

/// A random side for the minimum wager.
pub fn coin_flip<R: Rng>(rng: &mut R) -> BetDecision {
    let side = if rng.random_bool(0.5) {
        Outcome::BWon
    } else {
        Outcome::AWon
    };

    BetDecision {
        side,
        wager: MINIMUM_WAGER,
        prediction: UNKNOWN_PREDICTION
    }
}

/// Bets are only worth placing on rated matches still taking bets.
pub fn should_bet(mode: GameMode, status: MatchStatus) -> bool {
    mode.is_rated() && status == MatchStatus::Open
}

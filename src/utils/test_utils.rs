use rand::{seq::IndexedRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    model::structures::match_record::{ContestantId, MatchRecord, Outcome},
    registry::ContestantRegistry
};

/// `outcome` is 0 when A won and 1 when B won.
pub fn generate_match(id_a: ContestantId, id_b: ContestantId, outcome: i32, timestamp: i64) -> MatchRecord {
    let outcome = match Outcome::try_from(outcome) {
        Ok(o) => o,
        Err(_) => panic!("Expected outcome 0 or 1, got {}", outcome)
    };

    MatchRecord::new(id_a, id_b, outcome, timestamp)
}

/// Four matches among {0, 1, 2, 3}, won by A every time:
/// 0 beats 1, 0 beats 2, 1 beats 2, 0 beats 3.
pub fn scenario_matches() -> Vec<MatchRecord> {
    vec![
        generate_match(0, 1, 0, 1),
        generate_match(0, 2, 0, 2),
        generate_match(1, 2, 0, 3),
        generate_match(0, 3, 0, 4),
    ]
}

/// `n` random pairings drawn from `ids` with increasing timestamps. The
/// lower-indexed contestant in `ids` is favored so there is signal to fit.
pub fn generate_matches(n: usize, ids: &[ContestantId], seed: u64) -> Vec<MatchRecord> {
    if ids.len() < 2 {
        panic!("Expected at least two contestants to pair up");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut matches = Vec::with_capacity(n);

    for i in 0..n {
        let pair: Vec<ContestantId> = ids.choose_multiple(&mut rng, 2).copied().collect();
        let (a, b) = (pair[0], pair[1]);
        let rank_a = ids.iter().position(|id| *id == a).unwrap_or(0);
        let rank_b = ids.iter().position(|id| *id == b).unwrap_or(0);

        let a_favored = rank_a < rank_b;
        let a_wins = rng.random_bool(if a_favored { 0.75 } else { 0.25 });
        let outcome = if a_wins { 0 } else { 1 };

        matches.push(generate_match(a, b, outcome, 1_000 + i as i64 * 60));
    }

    matches
}

/// Registry where name `"Fighter {i}"` has id `i` for each id in `ids`.
pub fn generate_registry(ids: &[ContestantId]) -> ContestantRegistry {
    let mut registry = ContestantRegistry::new();
    for id in ids {
        registry.insert(format!("Fighter {}", id), *id);
    }

    registry
}

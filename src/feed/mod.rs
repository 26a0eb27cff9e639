pub mod classify;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    feed::classify::{identify_mode, identify_status},
    model::structures::{
        game_mode::GameMode,
        match_record::{ContestantId, MatchRecord, Outcome},
        match_status::MatchStatus
    },
    registry::ContestantRegistry
};

#[derive(Debug, Error, PartialEq)]
pub enum FeedError {
    #[error("Bet total {0:?} is not a number")]
    InvalidTotal(String)
}

/// One poll of the upstream state document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    pub p1name: String,
    pub p2name: String,
    /// Comma-grouped, e.g. `"1,234,567"`
    pub p1total: String,
    pub p2total: String,
    /// `"open"`, `"locked"`, or the winning side `"1"` / `"2"`
    pub status: String,
    /// Banner text describing where the schedule is
    pub remaining: String
}

/// A classified event. Ids are `None` for names the registry does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedState {
    pub mode: GameMode,
    pub status: MatchStatus,
    pub id_a: Option<ContestantId>,
    pub id_b: Option<ContestantId>,
    /// Only known once results are in
    pub winner: Option<Outcome>,
    pub bet_a: u64,
    pub bet_b: u64,
    pub timestamp: i64
}

impl ProcessedState {
    /// The match as it would enter history. `None` until both contestants
    /// are known and a winner is declared.
    pub fn to_match_record(&self) -> Option<MatchRecord> {
        Some(MatchRecord {
            id_a: self.id_a?,
            id_b: self.id_b?,
            outcome: self.winner?,
            bet_a: self.bet_a,
            bet_b: self.bet_b,
            timestamp: self.timestamp
        })
    }
}

pub fn process_state(
    event: &StateEvent,
    registry: &ContestantRegistry,
    timestamp: i64
) -> Result<ProcessedState, FeedError> {
    let status = identify_status(&event.status);
    let mode = identify_mode(&event.remaining, status);

    if status == MatchStatus::Unknown || mode == GameMode::Unknown {
        warn!(
            "Uncategorized state ({} {}): {:?}",
            mode.code(),
            status.code(),
            event
        );
    }

    let winner = match (status, event.status.as_str()) {
        (MatchStatus::Results, "1") => Some(Outcome::AWon),
        (MatchStatus::Results, "2") => Some(Outcome::BWon),
        _ => None
    };

    Ok(ProcessedState {
        mode,
        status,
        id_a: registry.id_of(&event.p1name),
        id_b: registry.id_of(&event.p2name),
        winner,
        bet_a: parse_total(&event.p1total)?,
        bet_b: parse_total(&event.p2total)?,
        timestamp
    })
}

/// Only rated results enter the match history.
pub fn should_record(mode: GameMode, status: MatchStatus) -> bool {
    mode.is_rated() && status == MatchStatus::Results
}

fn parse_total(total: &str) -> Result<u64, FeedError> {
    let digits: String = total.chars().filter(|c| *c != ',').collect();

    digits
        .trim()
        .parse()
        .map_err(|_| FeedError::InvalidTotal(total.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::{
        feed::{process_state, should_record, FeedError, StateEvent},
        model::structures::{
            game_mode::GameMode,
            match_record::{MatchRecord, Outcome},
            match_status::MatchStatus
        },
        registry::ContestantRegistry
    };

    fn event(status: &str, remaining: &str) -> StateEvent {
        StateEvent {
            p1name: "Ryu".to_string(),
            p2name: "Ken".to_string(),
            p1total: "1,234,567".to_string(),
            p2total: "890".to_string(),
            status: status.to_string(),
            remaining: remaining.to_string()
        }
    }

    #[test]
    fn test_results_state_builds_record() {
        let registry = ContestantRegistry::rebuild_from_names(&["Ken", "Ryu"]);
        let state = process_state(
            &event("2", "42 more matches until the next tournament!"),
            &registry,
            1_700_000_000
        )
        .unwrap();

        assert_eq!(state.mode, GameMode::Matchmaking);
        assert_eq!(state.status, MatchStatus::Results);
        assert_eq!(state.winner, Some(Outcome::BWon));
        assert_eq!(
            state.to_match_record(),
            Some(MatchRecord {
                id_a: 1,
                id_b: 0,
                outcome: Outcome::BWon,
                bet_a: 1_234_567,
                bet_b: 890,
                timestamp: 1_700_000_000
            })
        );
    }

    #[test]
    fn test_open_state_has_no_winner() {
        let registry = ContestantRegistry::rebuild_from_names(&["Ken", "Ryu"]);
        let state = process_state(&event("open", "25 exhibition matches left!"), &registry, 5).unwrap();

        assert_eq!(state.mode, GameMode::Exhibition);
        assert_eq!(state.winner, None);
        assert_eq!(state.to_match_record(), None);
    }

    #[test]
    fn test_unregistered_names_have_no_id() {
        let registry = ContestantRegistry::rebuild_from_names(&["Ryu"]);
        let state = process_state(&event("1", "FINAL ROUND! Stay tuned for exhibitions after the tournament!"), &registry, 5)
            .unwrap();

        assert_eq!(state.mode, GameMode::Tournament);
        assert_eq!(state.id_a, Some(0));
        assert_eq!(state.id_b, None);
        assert_eq!(state.to_match_record(), None);
    }

    #[test]
    fn test_malformed_total_is_an_error() {
        let mut bad = event("open", "");
        bad.p2total = "lots".to_string();

        assert_eq!(
            process_state(&bad, &ContestantRegistry::new(), 0),
            Err(FeedError::InvalidTotal("lots".to_string()))
        );
    }

    #[test]
    fn test_only_rated_results_are_recorded() {
        assert!(should_record(GameMode::Matchmaking, MatchStatus::Results));
        assert!(should_record(GameMode::Tournament, MatchStatus::Results));
        assert!(!should_record(GameMode::Exhibition, MatchStatus::Results));
        assert!(!should_record(GameMode::Unknown, MatchStatus::Results));
        assert!(!should_record(GameMode::Matchmaking, MatchStatus::Open));
    }

    #[test]
    fn test_state_json_field_names() {
        let json = r#"{"p1name":"Ryu","p2name":"Ken","p1total":"0","p2total":"0","status":"locked","remaining":"x"}"#;
        let parsed: StateEvent = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.status, "locked");
        assert_eq!(parsed.p2name, "Ken");
    }
}

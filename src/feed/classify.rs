use crate::model::structures::{game_mode::GameMode, match_status::MatchStatus};

// Banner texts of the `remaining` field
const MATCHMAKING_COUNTDOWN: &str = "more matches until the next tournament";
const TOURNAMENT_NEXT: &str = "Tournament mode will be activated after the next match!";
const BRACKET_COUNTDOWN: &str = "characters are left in the bracket!";
const FINAL_ROUND: &str = "FINAL ROUND! Stay tuned for exhibitions after the tournament!";
const EXHIBITION_COUNTDOWN: &str = "exhibition matches left!";
const MATCHMAKING_NEXT: &str = "Matchmaking mode will be activated after the next exhibition match!";

// Banners shown with the results of the last match of a mode, which already
// announce the first match of the next one
const FIRST_TOURNAMENT_MATCH: &str = "16 characters are left in the bracket!";
const FIRST_EXHIBITION_MATCH: &str = "25 exhibition matches left!";
const FIRST_MATCHMAKING_MATCH: &str = "100 more matches until the next tournament!";

pub fn identify_status(status: &str) -> MatchStatus {
    match status {
        "1" | "2" => MatchStatus::Results,
        "open" => MatchStatus::Open,
        "locked" => MatchStatus::Locked,
        _ => MatchStatus::Unknown
    }
}

/// Works out the game mode from the banner text.
///
/// While betting, the banner describes the current match. Once results are
/// in it already describes the next match, so the first-match banners of each
/// mode are attributed to the mode that just ended.
pub fn identify_mode(remaining: &str, status: MatchStatus) -> GameMode {
    match status {
        MatchStatus::Results => results_mode(remaining),
        MatchStatus::Open | MatchStatus::Locked => betting_mode(remaining),
        MatchStatus::Unknown => GameMode::Unknown
    }
}

fn results_mode(remaining: &str) -> GameMode {
    if (remaining.contains(MATCHMAKING_COUNTDOWN) && !remaining.starts_with("100"))
        || remaining == TOURNAMENT_NEXT
        || remaining == FIRST_TOURNAMENT_MATCH
    {
        GameMode::Matchmaking
    } else if (remaining.contains(BRACKET_COUNTDOWN) && !remaining.starts_with("16"))
        || remaining == FINAL_ROUND
        || remaining == FIRST_EXHIBITION_MATCH
    {
        GameMode::Tournament
    } else if (remaining.contains(EXHIBITION_COUNTDOWN) && !remaining.starts_with("25"))
        || remaining == MATCHMAKING_NEXT
        || remaining == FIRST_MATCHMAKING_MATCH
    {
        GameMode::Exhibition
    } else {
        GameMode::Unknown
    }
}

fn betting_mode(remaining: &str) -> GameMode {
    if remaining.contains(MATCHMAKING_COUNTDOWN) || remaining == TOURNAMENT_NEXT {
        GameMode::Matchmaking
    } else if remaining.contains(BRACKET_COUNTDOWN) || remaining == FINAL_ROUND {
        GameMode::Tournament
    } else if remaining.contains(EXHIBITION_COUNTDOWN) || remaining == MATCHMAKING_NEXT {
        GameMode::Exhibition
    } else {
        GameMode::Unknown
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        feed::classify::{identify_mode, identify_status},
        model::structures::{game_mode::GameMode, match_status::MatchStatus}
    };

    #[test]
    fn test_identify_status() {
        assert_eq!(identify_status("1"), MatchStatus::Results);
        assert_eq!(identify_status("2"), MatchStatus::Results);
        assert_eq!(identify_status("open"), MatchStatus::Open);
        assert_eq!(identify_status("locked"), MatchStatus::Locked);
        assert_eq!(identify_status("3"), MatchStatus::Unknown);
        assert_eq!(identify_status(""), MatchStatus::Unknown);
    }

    #[test]
    fn test_betting_banners() {
        let cases = [
            ("100 more matches until the next tournament!", GameMode::Matchmaking),
            ("Tournament mode will be activated after the next match!", GameMode::Matchmaking),
            ("16 characters are left in the bracket!", GameMode::Tournament),
            ("FINAL ROUND! Stay tuned for exhibitions after the tournament!", GameMode::Tournament),
            ("25 exhibition matches left!", GameMode::Exhibition),
            ("Matchmaking mode will be activated after the next exhibition match!", GameMode::Exhibition),
            ("Server maintenance", GameMode::Unknown),
        ];

        for (banner, expected) in cases {
            assert_eq!(identify_mode(banner, MatchStatus::Open), expected, "{}", banner);
            assert_eq!(identify_mode(banner, MatchStatus::Locked), expected, "{}", banner);
        }
    }

    #[test]
    fn test_results_banners_describe_next_match() {
        let cases = [
            ("99 more matches until the next tournament!", GameMode::Matchmaking),
            ("Tournament mode will be activated after the next match!", GameMode::Matchmaking),
            ("16 characters are left in the bracket!", GameMode::Matchmaking),
            ("15 characters are left in the bracket!", GameMode::Tournament),
            ("FINAL ROUND! Stay tuned for exhibitions after the tournament!", GameMode::Tournament),
            ("25 exhibition matches left!", GameMode::Tournament),
            ("24 exhibition matches left!", GameMode::Exhibition),
            ("Matchmaking mode will be activated after the next exhibition match!", GameMode::Exhibition),
            ("100 more matches until the next tournament!", GameMode::Exhibition),
            ("Server maintenance", GameMode::Unknown),
        ];

        for (banner, expected) in cases {
            assert_eq!(identify_mode(banner, MatchStatus::Results), expected, "{}", banner);
        }
    }

    #[test]
    fn test_unknown_status_has_unknown_mode() {
        assert_eq!(
            identify_mode("99 more matches until the next tournament!", MatchStatus::Unknown),
            GameMode::Unknown
        );
    }
}

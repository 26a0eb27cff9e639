use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use strum_macros::{Display, EnumIter};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum MatchStatus {
    /// Bets are being accepted
    Open,
    Locked,
    /// A winner has been announced
    Results,
    Unknown
}

impl MatchStatus {
    pub fn code(self) -> char {
        match self {
            MatchStatus::Open => 'O',
            MatchStatus::Locked => 'L',
            MatchStatus::Results => 'R',
            MatchStatus::Unknown => 'U'
        }
    }
}

impl TryFrom<char> for MatchStatus {
    type Error = ();

    fn try_from(v: char) -> Result<Self, Self::Error> {
        match v {
            'O' => Ok(MatchStatus::Open),
            'L' => Ok(MatchStatus::Locked),
            'R' => Ok(MatchStatus::Results),
            'U' => Ok(MatchStatus::Unknown),
            _ => Err(())
        }
    }
}

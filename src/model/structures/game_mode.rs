use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use strum_macros::{Display, EnumIter};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum GameMode {
    Matchmaking,
    Tournament,
    /// Custom team matchups; never attributed to individual contestants.
    Exhibition,
    Unknown
}

impl GameMode {
    /// Single-letter code used in the state logs.
    pub fn code(self) -> char {
        match self {
            GameMode::Matchmaking => 'M',
            GameMode::Tournament => 'T',
            GameMode::Exhibition => 'E',
            GameMode::Unknown => 'U'
        }
    }

    /// Whether results in this mode can be attributed to individual contestants.
    pub fn is_rated(self) -> bool {
        matches!(self, GameMode::Matchmaking | GameMode::Tournament)
    }
}

impl TryFrom<char> for GameMode {
    type Error = ();

    fn try_from(v: char) -> Result<Self, Self::Error> {
        match v {
            'M' => Ok(GameMode::Matchmaking),
            'T' => Ok(GameMode::Tournament),
            'E' => Ok(GameMode::Exhibition),
            'U' => Ok(GameMode::Unknown),
            _ => Err(())
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;

pub type ContestantId = u32;

/// Which side of a match won. Stored as `0` (A) / `1` (B) so it doubles as
/// the regression target for the probability that B wins.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Outcome {
    AWon = 0,
    BWon = 1
}

impl Outcome {
    pub fn as_f64(self) -> f64 {
        self as u8 as f64
    }
}

impl TryFrom<i32> for Outcome {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Outcome::AWon),
            1 => Ok(Outcome::BWon),
            _ => Err(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id_a: ContestantId,
    pub id_b: ContestantId,
    pub outcome: Outcome,
    /// Total wagered on A. Carried through, never used by the rating math.
    pub bet_a: u64,
    pub bet_b: u64,
    /// Unix epoch seconds
    pub timestamp: i64
}

impl MatchRecord {
    pub fn new(id_a: ContestantId, id_b: ContestantId, outcome: Outcome, timestamp: i64) -> MatchRecord {
        MatchRecord {
            id_a,
            id_b,
            outcome,
            bet_a: 0,
            bet_b: 0,
            timestamp
        }
    }

    pub fn winner(&self) -> ContestantId {
        match self.outcome {
            Outcome::AWon => self.id_a,
            Outcome::BWon => self.id_b
        }
    }

    pub fn loser(&self) -> ContestantId {
        match self.outcome {
            Outcome::AWon => self.id_b,
            Outcome::BWon => self.id_a
        }
    }
}

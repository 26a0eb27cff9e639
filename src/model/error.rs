use thiserror::Error;

use crate::model::structures::match_record::ContestantId;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Contestant {0} is referenced by a match but is not registered")]
    UnknownContestant(ContestantId),

    #[error("Contestant {0} does not appear in any match of the fitting set")]
    NonConcise(ContestantId),

    #[error("The fitting set contains no matches")]
    EmptyFittingSet,

    #[error("Cannot hold out {requested} of {available} matches for validation and testing")]
    SplitTooLarge { requested: usize, available: usize }
}

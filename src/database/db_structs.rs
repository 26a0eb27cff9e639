use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    rating_engine::FitParams,
    structures::{fit_result::FittedModel, match_record::MatchRecord}
};

/// Contents of `matches.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchHistory {
    pub matches: Vec<MatchRecord>
}

/// Contents of `model.json`: a fitted model and how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub trained_at: DateTime<Utc>,
    pub params: FitParams,
    /// Matches the model was fit on
    pub n_matches: usize,
    pub model: FittedModel
}

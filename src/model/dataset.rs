use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    model::{
        error::ModelError,
        evaluation::score,
        rating_engine::{FitParams, RatingEngine},
        structures::{
            fit_result::{FittedModel, TrainingHistory},
            match_record::{ContestantId, MatchRecord},
            score::Score
        }
    },
    registry::{health::concise_ids, ContestantRegistry}
};

/// Chronological partition of a match history.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSplit<'a> {
    pub train: &'a [MatchRecord],
    pub validation: &'a [MatchRecord],
    pub test: &'a [MatchRecord]
}

/// Everything one train/validate/test run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRun {
    pub model: FittedModel,
    pub history: TrainingHistory,
    pub train_score: Score,
    pub validation_score: Option<Score>,
    pub test_score: Option<Score>
}

/// The last `n_test` matches are held out for testing and the `n_val`
/// before them for validation. At least one match must be left to train on.
pub fn split(matches: &[MatchRecord], n_val: usize, n_test: usize) -> Result<MatchSplit<'_>, ModelError> {
    let held_out = n_val + n_test;
    if held_out >= matches.len() {
        return Err(ModelError::SplitTooLarge {
            requested: held_out,
            available: matches.len()
        });
    }

    let (rest, test) = matches.split_at(matches.len() - n_test);
    let (train, validation) = rest.split_at(rest.len() - n_val);

    Ok(MatchSplit {
        train,
        validation,
        test
    })
}

/// Splits `matches`, fits on the training part (early stopping on the
/// validation part when there is one) and scores every part.
pub fn run_model(
    matches: &[MatchRecord],
    registry: &ContestantRegistry,
    n_val: usize,
    n_test: usize,
    initial_ratings: &HashMap<ContestantId, f64>,
    params: FitParams
) -> Result<ModelRun, ModelError> {
    let parts = split(matches, n_val, n_test)?;
    let contestants = concise_ids(parts.train, registry);
    let validation = (!parts.validation.is_empty()).then_some(parts.validation);

    info!(
        "Running model: {} train / {} validation / {} test matches, {} contestants",
        parts.train.len(),
        parts.validation.len(),
        parts.test.len(),
        contestants.len()
    );

    let result = RatingEngine::new(params).fit(parts.train, &contestants, initial_ratings, validation)?;
    let table = &result.model.ratings;

    let train_score = score(table, parts.train);
    let validation_score = validation.map(|v| score(table, v));
    let test_score = (!parts.test.is_empty()).then(|| score(table, parts.test));

    info!(
        "Train accuracy {:.2}% (avg error {:.4})",
        train_score.accuracy() * 100.0,
        train_score.avg_error
    );
    if let Some(s) = validation_score {
        info!("Validation accuracy {:.2}% (avg error {:.4})", s.accuracy() * 100.0, s.avg_error);
    }
    if let Some(s) = test_score {
        info!(
            "Test: {} correct over {} matches, {:.2}% (avg error {:.4}, median {:.4})",
            s.num_correct,
            s.matches,
            s.accuracy() * 100.0,
            s.avg_error,
            s.median_error
        );
    }

    Ok(ModelRun {
        model: result.model,
        history: result.history,
        train_score,
        validation_score,
        test_score
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::{
        model::{
            dataset::{run_model, split},
            error::ModelError,
            rating_engine::FitParams
        },
        utils::test_utils::{generate_matches, generate_registry, scenario_matches}
    };

    #[test]
    fn test_split_takes_holdouts_from_the_end() {
        let matches = generate_matches(10, &[0, 1, 2], 1);
        let parts = split(&matches, 3, 2).unwrap();

        assert_eq!(parts.train, &matches[..5]);
        assert_eq!(parts.validation, &matches[5..8]);
        assert_eq!(parts.test, &matches[8..]);
    }

    #[test]
    fn test_split_without_holdouts() {
        let matches = scenario_matches();
        let parts = split(&matches, 0, 0).unwrap();

        assert_eq!(parts.train.len(), 4);
        assert!(parts.validation.is_empty());
        assert!(parts.test.is_empty());
    }

    #[test]
    fn test_split_must_leave_training_data() {
        let matches = scenario_matches();

        assert_eq!(
            split(&matches, 2, 2).unwrap_err(),
            ModelError::SplitTooLarge {
                requested: 4,
                available: 4
            }
        );
    }

    #[test]
    fn test_run_model_scores_every_part() {
        let ids: Vec<u32> = (0..6).collect();
        let matches = generate_matches(500, &ids, 21);
        let params = FitParams::builder().max_iter(40).build();
        let run = run_model(&matches, &generate_registry(&ids), 100, 100, &HashMap::new(), params).unwrap();

        assert_eq!(run.train_score.matches, 300);
        assert_eq!(run.validation_score.unwrap().matches, 100);
        assert_eq!(run.test_score.unwrap().matches, 100);
        assert!(run.history.best_epoch.is_some());
        // Lower ids win three times in four, which the fit should pick up
        let ratings = &run.model.ratings;
        assert!(ratings.get(0).unwrap() > ratings.get(5).unwrap());
        assert!(run.test_score.unwrap().accuracy() > 0.5);
    }

    #[test]
    fn test_run_model_without_validation() {
        let params = FitParams::builder().max_iter(10).build();
        let run = run_model(
            &scenario_matches(),
            &generate_registry(&[0, 1, 2, 3]),
            0,
            0,
            &HashMap::new(),
            params
        )
        .unwrap();

        assert!(run.validation_score.is_none());
        assert!(run.test_score.is_none());
        assert_eq!(run.history.epochs_completed, 10);
    }
}

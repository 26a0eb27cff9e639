use std::{collections::HashMap, fs, path::Path};

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    args::{Args, Command, FitArgs},
    database::{
        db::{Store, StoreError},
        db_structs::ModelBundle
    },
    feed::{process_state, should_record, FeedError, StateEvent},
    model::{dataset::run_model, error::ModelError},
    registry::{health::checkup, surgery::remove_teams, RegistryError},
    wager::{coin_flip, recommend, should_bet, BetDecision, DEFAULT_WAGER}
};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("No fitted model found, run the fit command first")]
    NoModel,

    #[error("Could not read state document {path}: {reason}")]
    State { path: String, reason: String }
}

/// What a command did, for the caller to report.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReport {
    Fitted { contestants: usize, epochs: usize },
    Predicted(BetDecision),
    Recorded { recorded: bool, bet: Option<BetDecision> },
    CheckedUp { healthy: bool, issues: usize },
    TeamsRemoved { removed: usize, saved: bool }
}

pub fn run(args: &Args) -> Result<CommandReport, CommandError> {
    let store = Store::open(&args.data_dir)?;

    match &args.command {
        Command::Fit {
            params,
            n_test,
            n_val,
            warm_start
        } => fit(&store, params, *n_val, *n_test, *warm_start),
        Command::Predict { a, b, wager } => predict(&store, a, b, *wager),
        Command::Record { state } => record(&store, state),
        Command::Checkup => run_checkup(&store),
        Command::RemoveTeams { dry_run } => run_remove_teams(&store, *dry_run)
    }
}

fn fit(
    store: &Store,
    args: &FitArgs,
    n_val: usize,
    n_test: usize,
    warm_start: bool
) -> Result<CommandReport, CommandError> {
    let matches = store.load_matches()?;
    let registry = store.load_registry()?;
    let params = args.to_params();

    let initial: HashMap<_, _> = match store.load_model()? {
        Some(bundle) if warm_start => bundle.model.ratings.iter().collect(),
        _ => HashMap::new()
    };

    let run = run_model(&matches, &registry, n_val, n_test, &initial, params.clone())?;
    let outcome = CommandReport::Fitted {
        contestants: run.model.stats.len(),
        epochs: run.history.epochs_completed
    };

    store.save_model(&ModelBundle {
        trained_at: Utc::now(),
        params,
        n_matches: matches.len() - n_val - n_test,
        model: run.model
    })?;

    Ok(outcome)
}

fn predict(store: &Store, a: &str, b: &str, wager: u64) -> Result<CommandReport, CommandError> {
    let registry = store.load_registry()?;
    let bundle = store.load_model()?.ok_or(CommandError::NoModel)?;

    let mut rng = rand::rng();
    let decision = match (registry.id_of(a), registry.id_of(b)) {
        (Some(id_a), Some(id_b)) => recommend(&bundle.model.ratings, id_a, id_b, wager, &mut rng),
        _ => {
            warn!("Unregistered contestant in {} vs {}", a, b);
            coin_flip(&mut rng)
        }
    };

    info!(
        "{} vs {}: P(B wins) = {:.4}, bet {} on {:?}",
        a, b, decision.prediction, decision.wager, decision.side
    );

    Ok(CommandReport::Predicted(decision))
}

fn record(store: &Store, path: &Path) -> Result<CommandReport, CommandError> {
    let event = read_state(path)?;
    let mut registry = store.load_registry()?;
    let mut state = process_state(&event, &registry, Utc::now().timestamp())?;

    let bet = match (store.load_model()?, state.id_a, state.id_b) {
        (Some(bundle), Some(id_a), Some(id_b)) if should_bet(state.mode, state.status) => {
            Some(recommend(&bundle.model.ratings, id_a, id_b, DEFAULT_WAGER, &mut rand::rng()))
        }
        _ => None
    };

    let mut recorded = false;
    if should_record(state.mode, state.status) {
        // Only names with a rated result enter the registry
        let known = registry.len();
        state.id_a = Some(registry.get_or_assign(&event.p1name));
        state.id_b = Some(registry.get_or_assign(&event.p2name));
        if registry.len() != known {
            store.save_registry(&registry)?;
        }

        match state.to_match_record() {
            Some(record) => {
                let total = store.append_match(record)?;
                info!("Recorded {} result, {} matches in history", state.mode, total);
                recorded = true;
            }
            None => warn!("Results state could not be turned into a match: {:?}", state)
        }
    }

    Ok(CommandReport::Recorded { recorded, bet })
}

fn read_state(path: &Path) -> Result<StateEvent, CommandError> {
    let state_error = |reason: String| CommandError::State {
        path: path.display().to_string(),
        reason
    };

    let contents = fs::read_to_string(path).map_err(|e| state_error(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| state_error(e.to_string()))
}

fn run_checkup(store: &Store) -> Result<CommandReport, CommandError> {
    let matches = store.load_matches()?;
    let registry = store.load_registry()?;
    let report = checkup(&matches, &registry);

    if report.is_healthy() {
        info!("Health check passed");
    } else {
        warn!("Health check failed with {} issue(s)", report.issues.len());
    }

    Ok(CommandReport::CheckedUp {
        healthy: report.is_healthy(),
        issues: report.issues.len()
    })
}

fn run_remove_teams(store: &Store, dry_run: bool) -> Result<CommandReport, CommandError> {
    let matches = store.load_matches()?;
    let registry = store.load_registry()?;
    let surgery = remove_teams(&matches, &registry)?;
    let removed = surgery.removed.len();

    if dry_run || removed == 0 {
        info!("{} teams found, nothing saved", removed);
        return Ok(CommandReport::TeamsRemoved { removed, saved: false });
    }

    store.save_registry(&surgery.registry)?;
    store.save_matches(&surgery.matches)?;

    Ok(CommandReport::TeamsRemoved { removed, saved: true })
}

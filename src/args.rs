use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::model::{
    constants::{
        DEFAULT_CONSTANT_FRACTION, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITER, DEFAULT_MIN_WEIGHT,
        DEFAULT_NEIGHBOR_REGULARIZATION, DEFAULT_PATIENCE, DEFAULT_SEED
    },
    rating_engine::FitParams
};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "Salt Processor",
    about = "Fits contestant ratings from match history and predicts matchups",
    long_about = "Fits Elo-style contestant ratings from a pairwise match history by gradient descent \
    and uses them to predict and bet on upcoming matches"
)]
pub struct Args {
    /// Directory holding players.json, matches.json and model.json
    #[arg(short, long, env = "SALT_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// Fit ratings on the stored history and save the model
    Fit {
        #[command(flatten)]
        params: FitArgs,

        /// Most recent matches held out for testing
        #[arg(long, env = "SALT_N_TEST", default_value_t = 0)]
        n_test: usize,

        /// Matches before the test set used for early stopping
        #[arg(long, env = "SALT_N_VAL", default_value_t = 0)]
        n_val: usize,

        /// Start from the saved model's ratings instead of the baseline
        #[arg(long, action = clap::ArgAction::SetTrue)]
        warm_start: bool
    },

    /// Predict a matchup with the saved model
    Predict {
        /// Name of contestant A (player 1)
        a: String,
        /// Name of contestant B (player 2)
        b: String,

        #[arg(short, long, default_value_t = 10)]
        wager: u64
    },

    /// Classify one state document and record it if it carries rated results
    Record {
        /// JSON file with p1name, p2name, p1total, p2total, status and remaining
        state: PathBuf
    },

    /// Check the registry and history for consistency
    Checkup,

    /// Remove team contestants and their matches, then re-index
    RemoveTeams {
        /// Report what would change without saving
        #[arg(long, action = clap::ArgAction::SetTrue)]
        dry_run: bool
    }
}

#[derive(ClapArgs, Clone, Debug, PartialEq)]
pub struct FitArgs {
    /// Pull of each rating toward its opponents' weighted average
    #[arg(long, env = "SALT_NEIGHBOR_REGULARIZATION", default_value_t = DEFAULT_NEIGHBOR_REGULARIZATION)]
    pub neighbor_regularization: f64,

    #[arg(long, env = "SALT_MAX_ITER", default_value_t = DEFAULT_MAX_ITER)]
    pub max_iter: usize,

    #[arg(long, env = "SALT_LEARNING_RATE", default_value_t = DEFAULT_LEARNING_RATE)]
    pub learning_rate: f64,

    /// Share of the learning rate that never decays
    #[arg(long, env = "SALT_CONSTANT_FRACTION", default_value_t = DEFAULT_CONSTANT_FRACTION)]
    pub constant_fraction: f64,

    /// Weight of the oldest match
    #[arg(long, env = "SALT_MIN_WEIGHT", default_value_t = DEFAULT_MIN_WEIGHT)]
    pub min_weight: f64,

    #[arg(long, env = "SALT_PATIENCE", default_value_t = DEFAULT_PATIENCE)]
    pub patience: usize,

    #[arg(long, env = "SALT_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64
}

impl FitArgs {
    pub fn to_params(&self) -> FitParams {
        FitParams::builder()
            .neighbor_regularization(self.neighbor_regularization)
            .max_iter(self.max_iter)
            .learning_rate(self.learning_rate)
            .constant_fraction(self.constant_fraction)
            .min_weight(self.min_weight)
            .patience(self.patience)
            .seed(self.seed)
            .build()
    }
}

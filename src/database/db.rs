use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf}
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::db_structs::{MatchHistory, ModelBundle};
use crate::{model::structures::match_record::MatchRecord, registry::ContestantRegistry};

pub const PLAYERS_FILE: &str = "players.json";
pub const MATCHES_FILE: &str = "matches.json";
pub const MODEL_FILE: &str = "model.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error)
}

/// JSON files under one data directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf
}

impl Store {
    /// Creates the data directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Store, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(io_error(&root))?;

        Ok(Store { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_registry(&self) -> Result<ContestantRegistry, StoreError> {
        let registry: ContestantRegistry = self.read_or_default(PLAYERS_FILE)?;
        info!("{} contestants loaded", registry.len());

        Ok(registry)
    }

    pub fn save_registry(&self, registry: &ContestantRegistry) -> Result<(), StoreError> {
        self.write(PLAYERS_FILE, registry)?;
        info!("{} contestants saved", registry.len());

        Ok(())
    }

    pub fn load_matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let history: MatchHistory = self.read_or_default(MATCHES_FILE)?;
        info!("{} match results loaded", history.matches.len());

        Ok(history.matches)
    }

    pub fn save_matches(&self, matches: &[MatchRecord]) -> Result<(), StoreError> {
        let history = MatchHistory {
            matches: matches.to_vec()
        };
        self.write(MATCHES_FILE, &history)?;
        info!("{} match results saved", matches.len());

        Ok(())
    }

    /// Appends one result to the stored history.
    pub fn append_match(&self, record: MatchRecord) -> Result<usize, StoreError> {
        let mut matches = self.load_matches()?;
        matches.push(record);
        self.save_matches(&matches)?;

        Ok(matches.len())
    }

    /// `None` when no model has been saved yet.
    pub fn load_model(&self) -> Result<Option<ModelBundle>, StoreError> {
        let path = self.path(MODEL_FILE);
        if !path.exists() {
            info!("{} not found, no model loaded", path.display());
            return Ok(None);
        }

        let bundle: ModelBundle = self.read(&path)?;
        info!("{} ratings loaded", bundle.model.ratings.len());

        Ok(Some(bundle))
    }

    pub fn save_model(&self, bundle: &ModelBundle) -> Result<(), StoreError> {
        self.write(MODEL_FILE, bundle)?;
        info!("{} ratings saved", bundle.model.ratings.len());

        Ok(())
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StoreError> {
        let path = self.path(file);
        if !path.exists() {
            info!("{} not found, starting empty", path.display());
            return Ok(T::default());
        }

        self.read(&path)
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T, StoreError> {
        let contents = fs::read_to_string(path).map_err(io_error(path))?;

        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes next to the target and renames over it, so readers only ever
    /// see the old file or the complete new one.
    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let path = self.path(file);
        let tmp = self.path(&format!("{}.tmp", file));
        let json = serde_json::to_vec_pretty(value)?;

        let mut handle = fs::File::create(&tmp).map_err(io_error(&tmp))?;
        handle.write_all(&json).map_err(io_error(&tmp))?;
        handle.sync_all().map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;

        debug!("Wrote {} bytes to {}", json.len(), path.display());

        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

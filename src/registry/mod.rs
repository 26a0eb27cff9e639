pub mod health;
pub mod surgery;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::structures::match_record::ContestantId;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Contestant name {0:?} is already registered")]
    DuplicateName(String),

    #[error("Registry failed its health check with {0} issue(s)")]
    Unhealthy(usize)
}

/// Bidirectional name <-> id mapping for every contestant ever seen.
///
/// Both directions are stored so a registry loaded from disk can be checked
/// for drift between them (see [`health`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContestantRegistry {
    id_by_name: IndexMap<String, ContestantId>,
    name_by_id: IndexMap<ContestantId, String>
}

impl ContestantRegistry {
    pub fn new() -> ContestantRegistry {
        ContestantRegistry::default()
    }

    /// Takes both directions verbatim, consistent or not.
    pub fn from_maps(
        id_by_name: IndexMap<String, ContestantId>,
        name_by_id: IndexMap<ContestantId, String>
    ) -> ContestantRegistry {
        ContestantRegistry { id_by_name, name_by_id }
    }

    /// Fresh dense registry: the i-th name gets id `i`.
    pub fn rebuild_from_names<S: AsRef<str>>(names: &[S]) -> ContestantRegistry {
        let mut registry = ContestantRegistry::new();
        for (i, name) in names.iter().enumerate() {
            registry.insert(name.as_ref().to_string(), i as ContestantId);
        }

        registry
    }

    pub fn id_of(&self, name: &str) -> Option<ContestantId> {
        self.id_by_name.get(name).copied()
    }

    pub fn name_of(&self, id: ContestantId) -> Option<&str> {
        self.name_by_id.get(&id).map(String::as_str)
    }

    /// Writes both directions without any checks.
    pub fn insert(&mut self, name: String, id: ContestantId) {
        self.name_by_id.insert(id, name.clone());
        self.id_by_name.insert(name, id);
    }

    pub fn next_id(&self) -> ContestantId {
        self.name_by_id.keys().max().map_or(0, |max| max + 1)
    }

    /// Registers `name` under one past the highest id in use.
    pub fn assign_new_id(&mut self, name: &str) -> Result<ContestantId, RegistryError> {
        if self.id_by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let id = self.next_id();
        self.insert(name.to_string(), id);

        Ok(id)
    }

    pub fn get_or_assign(&mut self, name: &str) -> ContestantId {
        if let Some(id) = self.id_of(name) {
            return id;
        }

        let id = self.next_id();
        self.insert(name.to_string(), id);

        id
    }

    pub fn len(&self) -> usize {
        self.name_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_by_id.is_empty()
    }

    /// Registered ids in insertion order.
    pub fn ids(&self) -> Vec<ContestantId> {
        self.name_by_id.keys().copied().collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.id_by_name.keys().map(String::as_str).collect()
    }

    pub fn id_by_name(&self) -> &IndexMap<String, ContestantId> {
        &self.id_by_name
    }

    pub fn name_by_id(&self) -> &IndexMap<ContestantId, String> {
        &self.name_by_id
    }
}

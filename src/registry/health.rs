use std::{collections::HashSet, fmt};

use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    model::structures::match_record::{ContestantId, MatchRecord},
    registry::ContestantRegistry
};

#[derive(Debug, Clone, PartialEq)]
pub enum HealthIssue {
    /// Several names map to the same id
    SharedId { id: ContestantId, names: Vec<String> },
    /// Several ids map to the same name
    SharedName { name: String, ids: Vec<ContestantId> },
    /// name -> id -> name does not come back to `name`
    NameNotReversible {
        name: String,
        id: ContestantId,
        found: Option<String>
    },
    /// id -> name -> id does not come back to `id`
    IdNotReversible {
        id: ContestantId,
        name: String,
        found: Option<ContestantId>
    },
    /// A match references an unregistered id
    Untranslatable { id: ContestantId },
    /// A registered id that never plays
    Orphaned { id: ContestantId, name: String }
}

impl fmt::Display for HealthIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthIssue::SharedId { id, names } => write!(f, "id {} is shared by names {:?}", id, names),
            HealthIssue::SharedName { name, ids } => write!(f, "name {:?} is shared by ids {:?}", name, ids),
            HealthIssue::NameNotReversible { name, id, found } => {
                write!(f, "name {:?} -> id {} -> {:?}", name, id, found)
            }
            HealthIssue::IdNotReversible { id, name, found } => write!(f, "id {} -> name {:?} -> {:?}", id, name, found),
            HealthIssue::Untranslatable { id } => write!(f, "id {} appears in a match but is not registered", id),
            HealthIssue::Orphaned { id, name } => write!(f, "{:?} (id {}) does not appear in any match", name, id)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthReport {
    pub issues: Vec<HealthIssue>,
    /// Registered ids with at least one match, in registry order
    pub concise_ids: Vec<ContestantId>
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Both directions must agree on every entry.
pub fn check_reversibility(registry: &ContestantRegistry) -> Vec<HealthIssue> {
    let mut issues = Vec::new();

    for (name, id) in registry.id_by_name() {
        let found = registry.name_of(*id);
        if found != Some(name.as_str()) {
            issues.push(HealthIssue::NameNotReversible {
                name: name.clone(),
                id: *id,
                found: found.map(str::to_string)
            });
        }
    }

    for (id, name) in registry.name_by_id() {
        let found = registry.id_of(name);
        if found != Some(*id) {
            issues.push(HealthIssue::IdNotReversible {
                id: *id,
                name: name.clone(),
                found
            });
        }
    }

    issues
}

/// Neither direction may map two keys onto one value.
pub fn check_value_uniqueness(registry: &ContestantRegistry) -> Vec<HealthIssue> {
    let shared_ids = registry
        .id_by_name()
        .iter()
        .map(|(name, id)| (*id, name.clone()))
        .into_group_map()
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .sorted_by_key(|(id, _)| *id)
        .map(|(id, names)| HealthIssue::SharedId { id, names });

    let shared_names = registry
        .name_by_id()
        .iter()
        .map(|(id, name)| (name.clone(), *id))
        .into_group_map()
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(name, ids)| HealthIssue::SharedName { name, ids });

    shared_ids.chain(shared_names).collect()
}

/// Every id a match references must be registered. Each missing id is
/// reported once.
pub fn check_translatability(matches: &[MatchRecord], registry: &ContestantRegistry) -> Vec<HealthIssue> {
    matches
        .iter()
        .flat_map(|m| [m.id_a, m.id_b])
        .filter(|id| registry.name_of(*id).is_none())
        .unique()
        .map(|id| HealthIssue::Untranslatable { id })
        .collect()
}

/// Splits registered ids into those that play (returned first) and orphans.
pub fn check_conciseness(
    matches: &[MatchRecord],
    registry: &ContestantRegistry
) -> (Vec<ContestantId>, Vec<HealthIssue>) {
    let seen: HashSet<ContestantId> = matches.iter().flat_map(|m| [m.id_a, m.id_b]).collect();
    let mut concise = Vec::new();
    let mut issues = Vec::new();

    for (id, name) in registry.name_by_id() {
        if seen.contains(id) {
            concise.push(*id);
        } else {
            issues.push(HealthIssue::Orphaned {
                id: *id,
                name: name.clone()
            });
        }
    }

    (concise, issues)
}

/// Registered ids that appear in `matches`, in registry order.
pub fn concise_ids(matches: &[MatchRecord], registry: &ContestantRegistry) -> Vec<ContestantId> {
    check_conciseness(matches, registry).0
}

/// Runs every check and logs each finding.
pub fn checkup(matches: &[MatchRecord], registry: &ContestantRegistry) -> HealthReport {
    let mut issues = check_value_uniqueness(registry);
    issues.extend(check_reversibility(registry));
    issues.extend(check_translatability(matches, registry));

    let (concise_ids, orphans) = check_conciseness(matches, registry);
    issues.extend(orphans);

    for issue in &issues {
        warn!("Registry health: {}", issue);
    }

    info!(
        "Checked {} names against {} matches: {} issue(s), {} concise ids",
        registry.len(),
        matches.len(),
        issues.len(),
        concise_ids.len()
    );

    HealthReport { issues, concise_ids }
}

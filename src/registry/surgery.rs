use tracing::{info, warn};

use crate::{
    model::structures::match_record::MatchRecord,
    registry::{
        health::{check_conciseness, checkup},
        ContestantRegistry, RegistryError
    }
};

pub const TEAM_PREFIX: &str = "Team";

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub matches: Vec<MatchRecord>,
    /// Matches dropped because a participant had no id in the new registry
    pub skipped: usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurgeryOutcome {
    pub matches: Vec<MatchRecord>,
    pub registry: ContestantRegistry,
    pub removed: Vec<String>,
    pub orphans_repaired: usize
}

/// Rewrites each match's ids from `old` into `new` by name.
pub fn translate_matches(matches: &[MatchRecord], old: &ContestantRegistry, new: &ContestantRegistry) -> Translation {
    let translate = |id| old.name_of(id).and_then(|name| new.id_of(name));
    let mut translated = Vec::with_capacity(matches.len());

    for m in matches {
        match (translate(m.id_a), translate(m.id_b)) {
            (Some(id_a), Some(id_b)) => translated.push(MatchRecord { id_a, id_b, ..m.clone() }),
            _ => warn!("Skipping match {} vs {}: no translation", m.id_a, m.id_b)
        }
    }

    let skipped = matches.len() - translated.len();
    info!("{} matches translated, {} skipped", translated.len(), skipped);

    Translation {
        matches: translated,
        skipped
    }
}

/// Drops every contestant whose name starts with `Team` along with the
/// matches they played, then re-indexes densely. Contestants whose only
/// matches were against teams are dropped in a second pass.
///
/// Refuses to operate on an unhealthy registry, and re-checks the result.
pub fn remove_teams(matches: &[MatchRecord], registry: &ContestantRegistry) -> Result<SurgeryOutcome, RegistryError> {
    let report = checkup(matches, registry);
    if !report.is_healthy() {
        return Err(RegistryError::Unhealthy(report.issues.len()));
    }

    let (teams, kept): (Vec<&str>, Vec<&str>) = registry
        .names()
        .into_iter()
        .partition(|name| name.starts_with(TEAM_PREFIX));

    if teams.is_empty() {
        info!("No teams found, nothing to remove");
        return Ok(SurgeryOutcome {
            matches: matches.to_vec(),
            registry: registry.clone(),
            removed: Vec::new(),
            orphans_repaired: 0
        });
    }

    info!("Removing {} teams: {:?}", teams.len(), teams);

    let mut new_registry = ContestantRegistry::rebuild_from_names(&kept);
    let mut new_matches = translate_matches(matches, registry, &new_registry).matches;

    let (concise, orphans) = check_conciseness(&new_matches, &new_registry);
    if !orphans.is_empty() {
        info!("Repairing {} names orphaned by team removal", orphans.len());

        let concise_names: Vec<String> = concise
            .iter()
            .filter_map(|id| new_registry.name_of(*id).map(str::to_string))
            .collect();
        let concise_registry = ContestantRegistry::rebuild_from_names(&concise_names);

        new_matches = translate_matches(&new_matches, &new_registry, &concise_registry).matches;
        new_registry = concise_registry;
    }

    let report = checkup(&new_matches, &new_registry);
    if !report.is_healthy() {
        return Err(RegistryError::Unhealthy(report.issues.len()));
    }

    Ok(SurgeryOutcome {
        matches: new_matches,
        registry: new_registry,
        removed: teams.into_iter().map(str::to_string).collect(),
        orphans_repaired: orphans.len()
    })
}

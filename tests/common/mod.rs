use std::sync::Once;

use salt_processor::{
    database::db::Store,
    model::structures::match_record::MatchRecord,
    registry::ContestantRegistry,
    utils::test_utils::generate_matches
};
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub const ROSTER: [&str; 6] = ["Ryu", "Ken", "Guile", "Chun-Li", "Dhalsim", "Blanka"];

/// A temporary data directory holding `ROSTER` and `n_matches` results in
/// which earlier roster entries tend to win.
pub fn seeded_store(n_matches: usize) -> (TempDir, Store, ContestantRegistry, Vec<MatchRecord>) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let registry = ContestantRegistry::rebuild_from_names(&ROSTER);
    let matches = generate_matches(n_matches, &registry.ids(), 1334);

    store.save_registry(&registry).unwrap();
    store.save_matches(&matches).unwrap();

    (dir, store, registry, matches)
}

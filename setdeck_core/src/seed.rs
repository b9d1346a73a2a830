//! First-run exercises.
//!
//! Used when no catalog or deck has been persisted yet.

use crate::{Catalog, Deck, ExerciseRecord};
use once_cell::sync::Lazy;

/// Cached seed catalog - built once and cloned on first run
static SEED_CATALOG: Lazy<Catalog> = Lazy::new(build_seed_catalog);

/// Get a reference to the cached seed catalog
pub fn seed_catalog() -> &'static Catalog {
    &SEED_CATALOG
}

/// Seed deck, ordered identically to the seed catalog
pub fn seed_deck() -> Deck {
    Deck::new(SEED_CATALOG.ids())
}

fn build_seed_catalog() -> Catalog {
    let exercise = |id: &str, name: &str, muscle: &str| ExerciseRecord {
        id: id.into(),
        name: name.into(),
        muscle: Some(muscle.into()),
        history: Vec::new(),
    };

    Catalog::new(vec![
        exercise("deadlift", "Deadlift", "Posterior chain"),
        exercise("back-squat", "Back Squat", "Quads & glutes"),
        exercise("bench-press", "Bench Press", "Chest"),
    ])
}

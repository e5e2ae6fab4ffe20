pub mod init;
pub mod invoice;
pub mod report;
pub mod sessions;
pub mod words;

use std::path::Path;

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use academy_core::model::Student;
use academy_core::roster::{load_roster, load_roster_directory};

/// Seeded RNG when a seed is given, entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Students from a roster file, or from `<dir>/<batch>.json` when `path` is a
/// directory of batch rosters.
pub fn read_students(path: &Path, batch: Option<&str>) -> Result<Vec<Student>> {
    if !path.is_dir() {
        return load_roster(path);
    }
    let batch = batch.ok_or_else(|| anyhow!("--batch is required when --roster is a directory"))?;
    let rosters = load_roster_directory(path)?;
    let available: Vec<&str> = rosters.iter().map(|(name, _)| name.as_str()).collect();
    let message = format!(
        "batch '{batch}' not found in {} (available: {})",
        path.display(),
        available.join(", ")
    );
    rosters
        .into_iter()
        .find(|(name, _)| name == batch)
        .map(|(_, students)| students)
        .ok_or_else(|| anyhow!(message))
}

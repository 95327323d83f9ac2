use analytics::RankingTable;
use anyhow::{Context, Result};
use core_types::{validate_records, RaceResult, RaceResultRecord};
use std::fs;
use std::path::Path;

/// Reads a JSON array of raw result records and validates it.
///
/// Invalid records are skipped; the rest of the file is still used. Each reject
/// is logged once by `validate_records`, followed by one summary line here.
pub fn load_results(path: &Path) -> Result<Vec<RaceResult>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read result store {}", path.display()))?;
    let records: Vec<RaceResultRecord> = serde_json::from_str(&text)
        .with_context(|| format!("Result store {} is not a JSON array of results", path.display()))?;

    let report = validate_records(records);
    tracing::info!(
        path = %path.display(),
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "Loaded result store."
    );
    Ok(report.accepted)
}

/// Reads a ranking table previously written with [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<RankingTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Snapshot {} is malformed", path.display()))
}

pub fn save_snapshot(path: &Path, table: &RankingTable) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(table)?;
    fs::write(path, json).with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved ranking snapshot.");
    Ok(())
}

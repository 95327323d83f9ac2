//! # Crewrank Compliance Export
//!
//! Writes a ranking snapshot in the exact CSV layout expected by the governing-body
//! submission workflow. The layout is fixed: column order, number formats and the
//! file name convention must not drift.

use analytics::TeamRanking;
use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod error;

pub use error::ExportError;

/// Column headers, in order.
pub const HEADER: [&str; 6] = [
    "Institution",
    "Boat Class",
    "Rank",
    "Speed (m/s)",
    "Sample Size",
    "Last Updated",
];

/// Written in the speed column when a team has no adjusted speed.
pub const MISSING_SPEED: &str = "N/A";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `ncaa-rankings-{yyyy-MM-dd}.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("ncaa-rankings-{}.csv", date.format(DATE_FORMAT))
}

/// Formats a speed to exactly three decimals, rounding half away from zero.
pub fn format_speed(speed: Option<f64>) -> String {
    let Some(decimal) = speed.and_then(Decimal::from_f64) else {
        return MISSING_SPEED.to_string();
    };
    let mut rounded = decimal.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(3);
    rounded.to_string()
}

/// The six fields of one ranking, in column order.
fn row_fields(ranking: &TeamRanking) -> [String; 6] {
    [
        ranking.team_name.clone(),
        ranking.boat_class.clone(),
        ranking.rank.to_string(),
        format_speed(ranking.adjusted_speed),
        ranking.sample_count.to_string(),
        ranking.last_calculated_at.date_naive().format(DATE_FORMAT).to_string(),
    ]
}

/// Writes the header and one record per ranking, in the order given.
///
/// Fields are quoted only when they contain a delimiter, quote or line break.
pub fn write_rankings<W: Write>(
    writer: &mut csv::Writer<W>,
    rankings: &[TeamRanking],
) -> Result<(), ExportError> {
    writer.write_record(HEADER)?;
    for ranking in rankings {
        writer.write_record(row_fields(ranking))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `ncaa-rankings-{date}.csv` into `dir`, creating the directory if needed.
///
/// Returns the path of the written file.
pub fn export_to_dir(dir: &Path, rankings: &[TeamRanking], date: NaiveDate) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(date));
    let io_err = |source| ExportError::Io { path: path.clone(), source };

    fs::create_dir_all(dir).map_err(io_err)?;
    let file = fs::File::create(&path).map_err(io_err)?;
    let mut writer = csv::Writer::from_writer(file);
    write_rankings(&mut writer, rankings)?;

    tracing::info!(path = %path.display(), rows = rankings.len(), "Wrote compliance export.");
    Ok(path)
}

use analytics::{
    boat_lengths_for, calculate_margin, estimate_speed, head_to_head, race_margins, MarginDisplay,
    RankingEngine,
};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use configuration::{Config, ConfigArgs};
use core_types::{ShellClass, Side};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod display;
mod store;

/// The main entry point for the Crewrank CLI.
fn main() -> Result<()> {
    // A missing .env file is normal; it only carries optional overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config.resolve().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.trim()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Rank(args) => handle_rank(args, &config),
        Commands::HeadToHead(args) => handle_head_to_head(args),
        Commands::Margin(args) => handle_margin(args),
        Commands::Race(args) => handle_race(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Speed normalization and ranking for rowing race results.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every team in a boat class by adjusted speed.
    Rank(RankArgs),
    /// Show the direct-race record of two teams.
    HeadToHead(HeadToHeadArgs),
    /// Compute the margin between two finish times.
    Margin(MarginArgs),
    /// Show finishing order and gaps for one race.
    Race(RaceArgs),
}

#[derive(Parser)]
struct RankArgs {
    /// JSON file holding the result store (an array of race results).
    #[arg(long, short)]
    input: PathBuf,

    /// Boat class to rank (e.g. "8+").
    #[arg(long)]
    class: String,

    /// A snapshot written by an earlier run, used to report rank movement.
    #[arg(long)]
    previous: Option<PathBuf>,

    /// Write this run's table as a snapshot for the next run.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Also write the compliance CSV into the configured export directory.
    #[arg(long)]
    export: bool,

    /// Calculate the table as of this date (format: YYYY-MM-DD). Stamped on the
    /// snapshot, every export row and the export file name. Defaults to now.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Parser)]
struct HeadToHeadArgs {
    #[arg(long, short)]
    input: PathBuf,

    #[arg(long)]
    class: String,

    #[arg(long)]
    team_a: String,

    #[arg(long)]
    team_b: String,

    /// Show exact seconds and lengths instead of the conventional label.
    #[arg(long)]
    exact: bool,
}

#[derive(Parser)]
struct MarginArgs {
    #[arg(long)]
    time_a: f64,

    #[arg(long)]
    time_b: f64,

    /// Race distance in meters, used to derive the leader's speed.
    #[arg(long)]
    distance: f64,

    /// Shell class of both boats; must be a known class code.
    #[arg(long, default_value = "8+")]
    class: ShellClass,

    #[arg(long, default_value = "A")]
    name_a: String,

    #[arg(long, default_value = "B")]
    name_b: String,

    #[arg(long)]
    exact: bool,
}

#[derive(Parser)]
struct RaceArgs {
    #[arg(long, short)]
    input: PathBuf,

    #[arg(long)]
    race_id: String,
}

fn display_mode(exact: bool) -> MarginDisplay {
    if exact {
        MarginDisplay::Exact
    } else {
        MarginDisplay::Qualitative
    }
}

/// Midnight UTC of an explicit `--date`, otherwise the current time.
fn calculated_at(date: Option<NaiveDate>) -> DateTime<Utc> {
    match date {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_rank(args: RankArgs, config: &Config) -> Result<()> {
    let results = store::load_results(&args.input)?;
    let previous = args.previous.as_deref().map(store::load_snapshot).transpose()?;

    let engine = RankingEngine::new(config.ranking.aggregation);
    let table = engine.rank(&args.class, &results, previous.as_ref(), calculated_at(args.date))?;

    if table.is_empty() {
        println!("No results recorded for boat class {}.", args.class);
        return Ok(());
    }

    println!("{}", display::ranking_table(&table));

    if let Some(path) = &args.save {
        store::save_snapshot(path, &table)?;
    }

    if args.export {
        let date = table.calculated_at.date_naive();
        let path = exporter::export_to_dir(&config.export.output_dir, &table.rankings, date)?;
        println!("Export written to {}", path.display());
    }

    Ok(())
}

fn handle_head_to_head(args: HeadToHeadArgs) -> Result<()> {
    let results = store::load_results(&args.input)?;
    let summary = head_to_head(&results, &args.class, &args.team_a, &args.team_b)?;

    if summary.is_empty() {
        println!(
            "{} and {} have not raced each other in the {}.",
            summary.team_a, summary.team_b, summary.boat_class
        );
        return Ok(());
    }

    println!("{}", display::head_to_head_table(&summary, display_mode(args.exact)));
    println!(
        "Record: {} {} - {} {}",
        summary.team_a,
        summary.wins(Side::A),
        summary.wins(Side::B),
        summary.team_b
    );
    if let Some(delta) = summary.mean_time_delta_seconds() {
        println!("Mean gap: {:+.2}s (positive favours {})", delta, summary.team_a);
    }
    Ok(())
}

fn handle_margin(args: MarginArgs) -> Result<()> {
    let reference_speed = estimate_speed(args.time_a.min(args.time_b), args.distance);
    let margin = calculate_margin(args.time_a, args.time_b, reference_speed, &args.name_a, &args.name_b);
    let lengths = boat_lengths_for(margin.distance_meters, args.class);

    tracing::debug!(?margin, lengths, "Calculated margin.");
    println!(
        "{} ahead of {}: {}",
        margin.faster_name,
        margin.slower_name,
        margin.render(display_mode(args.exact), args.class.code())
    );
    Ok(())
}

fn handle_race(args: RaceArgs) -> Result<()> {
    let results = store::load_results(&args.input)?;
    let margins = race_margins(&results, &args.race_id);

    if margins.is_empty() {
        println!("No results recorded for race {}.", args.race_id);
        return Ok(());
    }

    println!("{}", display::race_table(&margins));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn explicit_date_sets_calculation_time() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let stamped = calculated_at(Some(date));
        assert_eq!(stamped, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(stamped.date_naive(), date);
    }

    #[test]
    fn missing_date_uses_current_time() {
        let before = Utc::now();
        let stamped = calculated_at(None);
        assert!(stamped >= before);
        assert!(stamped.year() >= 2024);
    }

    #[test]
    fn margin_command_rejects_unknown_class() {
        let parsed = Cli::try_parse_from([
            "crewrank", "margin", "--time-a", "400", "--time-b", "395", "--distance", "2000",
            "--class", "9+",
        ]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "crewrank", "margin", "--time-a", "400", "--time-b", "395", "--distance", "2000",
            "--class", "4x",
        ])
        .unwrap();
        let Commands::Margin(args) = cli.command else {
            panic!("expected the margin command");
        };
        assert_eq!(args.class, ShellClass::Quad);
    }
}

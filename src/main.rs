mod config;
mod geometry;
mod magnitude;
mod report;
mod sampler;

use chrono::{DateTime, Duration, Local, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::config::{parse_duration, Config, ConfigError};
use crate::geometry::{
    load_tle_file, select, GeometryError, GeometrySource, PassWindow, Sgp4Source, TleEntry,
    ISS_2020_08_20,
};
use crate::magnitude::MagnitudeModel;
use crate::sampler::{PassSampler, SampleRecord, SamplerError};

/// How far back to restart the pass search when the satellite is already up.
const IN_PROGRESS_ROLLBACK: Duration = Duration::minutes(60);

#[derive(Parser)]
#[command(name = "sat-o-mag")]
#[command(about = "Satellite pass brightness predictions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample the current or next pass and print its brightness profile
    Pass {
        #[command(flatten)]
        common: CommonArgs,
        /// Search start (RFC 3339), defaults to now
        #[arg(long)]
        from: Option<String>,
        /// Sample interval, e.g. "10s"
        #[arg(long)]
        step: Option<String>,
    },
    /// Print a single sample for one instant
    Now {
        #[command(flatten)]
        common: CommonArgs,
        /// Instant to evaluate (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Validate a configuration file and its element set
    Validate {
        #[arg(short, long)]
        config: String,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Station configuration (YAML)
    #[arg(short, long)]
    config: String,
    /// Element set file, overrides `tle_file` from the configuration
    #[arg(long)]
    tle: Option<PathBuf>,
    /// Satellite name or NORAD id, overrides `satellite`
    #[arg(long)]
    satellite: Option<String>,
    /// Emit one JSON object per sample instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("sampler: {0}")]
    Sampler(#[from] SamplerError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid timestamp '{0}': {1}")]
    Timestamp(String, chrono::ParseError),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pass { common, from, step } => pass(&common, from.as_deref(), step.as_deref()),
        Commands::Now { common, at } => now(&common, at.as_deref()),
        Commands::Validate { config } => validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn pass(common: &CommonArgs, from: Option<&str>, step: Option<&str>) -> Result<(), CliError> {
    let config = Config::from_file(&common.config)?;
    let source = load_source(&config, common)?;
    let from = parse_time(from)?.unwrap_or_else(Utc::now);
    let step = match step {
        Some(s) => parse_duration(s)?,
        None => config.step()?,
    };
    log::info!("start time: {}", from.with_timezone(&Local));

    let window = current_or_next_pass(&source, from)?;
    let sampler = PassSampler::new(
        window,
        &source,
        step,
        MagnitudeModel::new(config.base_magnitude),
    );

    if !common.json {
        println!(
            "{}",
            report::pass_header(
                source.satellite_name(),
                source.station(),
                sampler.window(),
                &Local
            )
        );
        println!("{}", report::table_header());
    }

    let (mut total, mut lit) = (0, 0);
    let mut brightest: Option<f64> = None;
    for record in sampler.sample()? {
        let record = record?;
        total += 1;
        if record.magnitude.is_valid() {
            lit += 1;
        }
        if let Some(m) = record.magnitude.value() {
            brightest = Some(brightest.map_or(m, |b| b.min(m)));
        }
        print_record(&record, common.json)?;
    }
    if !common.json {
        println!("{}", report::table_footer());
    }
    log::info!("{} of {} samples with a magnitude estimate", lit, total);
    if let Some(m) = brightest {
        log::info!("peak brightness {:.2}", m);
    }
    Ok(())
}

fn now(common: &CommonArgs, at: Option<&str>) -> Result<(), CliError> {
    let config = Config::from_file(&common.config)?;
    let source = load_source(&config, common)?;
    let at = parse_time(at)?.unwrap_or_else(Utc::now);

    let snapshot = source.snapshot(at)?;
    let record =
        SampleRecord::from_snapshot(at, &snapshot, &MagnitudeModel::new(config.base_magnitude));
    if !common.json {
        println!("{}", report::table_header());
    }
    print_record(&record, common.json)
}

fn validate(path: &str) -> Result<(), CliError> {
    let config = Config::from_file(path)?;
    let station = config.ground_station()?;
    config.step()?;
    config.search_window()?;
    println!(
        "Configuration is valid: station {} at {:.4}, {:.4}",
        config.station.name.as_deref().unwrap_or("(unnamed)"),
        station.latitude_deg,
        station.longitude_deg
    );

    if let Some(path) = &config.tle_file {
        let entries = load_tle_file(path)?;
        println!("  {} element set(s) in {}", entries.len(), path.display());
        let entry = select(entries, config.satellite.as_deref())?;
        println!("  selected {} (NORAD {})", entry.name, entry.norad_id);
    }
    Ok(())
}

fn load_source(config: &Config, common: &CommonArgs) -> Result<Sgp4Source, CliError> {
    let station = config.ground_station()?;
    let selector = common.satellite.as_deref().or(config.satellite.as_deref());
    let entry = match common.tle.as_ref().or(config.tle_file.as_ref()) {
        Some(path) => select(load_tle_file(path)?, selector)?,
        None => {
            log::warn!("no element set configured, using the built-in ISS set from 2020-08-20");
            TleEntry::parse(ISS_2020_08_20)?
        }
    };
    log::info!("tracking {} (NORAD {})", entry.name, entry.norad_id);

    Ok(Sgp4Source::new(station, entry)
        .with_horizon_deg(config.min_horizon_deg)
        .with_atmosphere(config.atmosphere())
        .with_search_window(config.search_window()?))
}

/// Pass in progress at `now`, or else the next one.
///
/// Pass prediction skips a pass that is already under way, so the search
/// restarts an hour earlier and walks forward to the first pass that has
/// not yet set.
fn current_or_next_pass<S: GeometrySource + ?Sized>(
    source: &S,
    now: DateTime<Utc>,
) -> Result<PassWindow, GeometryError> {
    let mut window = source.next_pass(now - IN_PROGRESS_ROLLBACK)?;
    while window.set <= now {
        window = source.next_pass(window.set)?;
    }
    if window.rise < now {
        log::info!("pass already in progress, rose at {}", window.rise);
    }
    Ok(window)
}

fn parse_time(s: Option<&str>) -> Result<Option<DateTime<Utc>>, CliError> {
    s.map(|s| {
        DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CliError::Timestamp(s.to_string(), e))
    })
    .transpose()
}

fn print_record(record: &SampleRecord, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", report::json_line(record)?);
    } else {
        println!("{}", report::table_row(record, &Local));
    }
    Ok(())
}

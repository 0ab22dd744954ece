use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use closest_points::config::{LoggingSettings, Settings};
use closest_points::core::{convert, DistanceMetric, Matcher};
use closest_points::models::{Axis, Direction, DmsAngle, InputFormat, MatchResponse, PointSet};
use closest_points::services::{CsvPointSource, LinePointSource, PointSource};

#[derive(Parser, Debug)]
#[command(author, version, about = "Nearest-neighbor matching between two point sets")]
struct Cli {
    /// Read settings from this file instead of config/default.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match every point of CSV file A to its closest point in CSV file B
    Match {
        #[arg(long = "a")]
        points_a: PathBuf,
        #[arg(long = "b")]
        points_b: PathBuf,
        #[command(flatten)]
        options: MatchOptions,
    },
    /// Read set A, a blank line, then set B from stdin
    Interactive {
        #[command(flatten)]
        options: MatchOptions,
    },
    /// Convert a DMS angle to decimal degrees
    ToDecimal {
        degrees: f64,
        #[arg(default_value_t = 0.0)]
        minutes: f64,
        #[arg(default_value_t = 0.0)]
        seconds: f64,
        #[arg(default_value = "N")]
        direction: Direction,
    },
    /// Convert decimal degrees to a DMS angle
    ToDms {
        #[arg(allow_negative_numbers = true)]
        decimal: f64,
        /// Pass `longitude` to get E/W instead of N/S
        #[arg(long, default_value = "latitude")]
        axis: Axis,
    },
    /// Print the effective configuration
    ShowConfig,
}

#[derive(clap::Args, Debug)]
struct MatchOptions {
    /// Distance metric (euclidean or haversine)
    #[arg(long)]
    metric: Option<DistanceMetric>,
    /// Shorthand for `--metric haversine`
    #[arg(long, conflicts_with = "metric")]
    haversine: bool,
    /// Point representation (decimal or degrees)
    #[arg(long)]
    format: Option<InputFormat>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl MatchOptions {
    fn metric(&self, settings: &Settings) -> DistanceMetric {
        if self.haversine {
            DistanceMetric::Haversine
        } else {
            self.metric.unwrap_or(settings.matching.metric)
        }
    }

    fn format(&self, settings: &Settings) -> InputFormat {
        self.format.unwrap_or(settings.matching.input_format)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load configuration")?;

    init_tracing(&settings.logging);

    match cli.command {
        Command::Match {
            points_a,
            points_b,
            options,
        } => handle_match(&settings, &points_a, &points_b, &options).await,
        Command::Interactive { options } => handle_interactive(&settings, &options).await,
        Command::ToDecimal {
            degrees,
            minutes,
            seconds,
            direction,
        } => {
            let angle = DmsAngle::new(degrees, minutes, seconds, direction);
            let decimal = convert::dms_to_decimal(&angle, direction.axis())?;
            println!("{decimal}");
            Ok(())
        }
        Command::ToDms { decimal, axis } => {
            let angle = convert::decimal_to_dms(decimal, axis);
            println!("{angle}");
            Ok(())
        }
        Command::ShowConfig => {
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

async fn handle_match(settings: &Settings, path_a: &Path, path_b: &Path, options: &MatchOptions) -> Result<()> {
    let format = options.format(settings);
    let points_a = load_csv(settings, path_a, format)?;
    let points_b = load_csv(settings, path_b, format)?;

    run_matching(settings, &points_a, &points_b, options).await
}

async fn handle_interactive(settings: &Settings, options: &MatchOptions) -> Result<()> {
    let format = options.format(settings);
    let (points_a, points_b) = {
        let mut source = LinePointSource::new(io::stdin().lock());

        eprintln!("{}", prompt(format, "first"));
        let points_a = source.load(format)?;
        eprintln!("{}", prompt(format, "second"));
        let points_b = source.load(format)?;

        if source.rejected() > 0 {
            info!("Skipped {} unreadable lines", source.rejected());
        }
        (points_a, points_b)
    };

    run_matching(settings, &points_a, &points_b, options).await
}

fn prompt(format: InputFormat, which: &str) -> String {
    match format {
        InputFormat::Decimal => format!(
            "Enter {which} set as `lat lon` in decimal degrees, one per line. Empty line to finish:"
        ),
        InputFormat::Degrees => format!(
            "Enter {which} set as `lat_deg lat_min lat_sec lat_dir lon_deg lon_min lon_sec lon_dir` \
             (e.g. 42 21 36 N 71 3 32 W), one per line. Empty line to finish:"
        ),
    }
}

fn load_csv(settings: &Settings, path: &Path, format: InputFormat) -> Result<PointSet> {
    let delimiter = settings.loader.delimiter_byte()?;
    let mut source = CsvPointSource::from_path(path, &settings.loader.lat_column, &settings.loader.lon_column)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_delimiter(delimiter);

    source
        .load(format)
        .with_context(|| format!("failed to read points from {}", path.display()))
}

async fn run_matching(
    settings: &Settings,
    points_a: &PointSet,
    points_b: &PointSet,
    options: &MatchOptions,
) -> Result<()> {
    let metric = options.metric(settings);
    let matcher = Matcher::new(metric);

    info!(
        "Matching {} points against {} candidates using {} distance",
        points_a.len(),
        points_b.len(),
        metric
    );

    let report = matcher
        .find_closest_concurrent(points_a, points_b, settings.matching.workers)
        .await
        .context("matching failed")?;

    info!("Computed {} distances", report.comparisons);

    let response = MatchResponse::new(metric, report);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        let suffix = match metric.unit() {
            "" => String::new(),
            unit => format!(" {unit}"),
        };
        for m in &response.matches {
            println!("{} -> {}: {:.6}{}", m.index_a, m.index_b, m.distance, suffix);
        }
    }

    Ok(())
}

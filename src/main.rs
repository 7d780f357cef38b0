use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::ExitCode;

use windtrail::buckets::{parse_hour_file, samples_from_triplets, IngestError, RawTriplet, HOURS};
use windtrail::forecast::median_p90;
use windtrail::index::{BBox, IndexItem, SegmentIndex};
use windtrail::tracks::{build_segments, chain_tracks};
use windtrail::trails::{TrailSession, TrailSettings};
use windtrail::web::{run_server, AppState};
use windtrail::Config;

#[derive(Parser)]
#[command(name = "windtrail")]
#[command(about = "Balloon trail reconstruction and forecast wind comparison")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the trail and comparison API
    Serve,
    /// Link a directory of hourly files (00.json .. 23.json) and print statistics
    Summarize { dir: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve => serve(config),
        Commands::Summarize { dir } => summarize(config, &dir),
    }
}

fn serve(config: Config) -> ExitCode {
    let state = match AppState::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error creating forecast client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_server(state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_hour(dir: &Path, hour: u8) -> Result<Option<Vec<RawTriplet>>, IngestError> {
    let path = dir.join(format!("{:02}.json", hour));
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(parse_hour_file(&content)?))
}

fn summarize(config: Config, dir: &str) -> ExitCode {
    let dir = Path::new(dir);
    let batch_time = Utc::now();
    let mut session = TrailSession::new(TrailSettings::from(&config));

    for hour in 0..HOURS {
        let raw = match load_hour(dir, hour) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("hour {:02} missing", hour);
                continue;
            }
            Err(e) => {
                log::warn!("Skipping hour {:02}: {}", hour, e);
                continue;
            }
        };
        let samples = samples_from_triplets(hour, batch_time, &raw);
        if let Err(e) = session.ingest_hour(hour, samples) {
            log::warn!("Skipping hour {:02}: {}", hour, e);
        }
    }

    let status = session.status();
    println!(
        "Loaded {} hours, {} samples",
        status.buckets.len(),
        session.store().total_samples()
    );
    for pair_hour in &status.linked_pairs {
        let segments = session.pair_segments(*pair_hour);
        println!(
            "  {:02}-{:02}: {} segments, median speed {:.1} m/s",
            pair_hour,
            pair_hour + 1,
            segments.len(),
            median(&segments.iter().map(|s| s.speed_ms).collect::<Vec<_>>())
        );
    }

    let tracks = chain_tracks(session.store(), config.tracking.max_km_per_hour);
    let longest = tracks.iter().map(|t| t.samples.len()).max().unwrap_or(0);
    let segments: Vec<_> = tracks.iter().flat_map(build_segments).collect();
    let index = SegmentIndex::bulk_load(
        segments
            .iter()
            .map(|s| IndexItem::from_segment(s, s.h0))
            .collect(),
    );
    println!(
        "Chained {} tracks (longest {} hours), {} segments, {} indexed worldwide",
        tracks.len(),
        longest,
        segments.len(),
        index.query(&BBox::world()).len()
    );

    ExitCode::SUCCESS
}

fn median(values: &[f64]) -> f64 {
    median_p90(values).0
}

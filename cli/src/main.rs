//! Headless Emergency Department Simulation
//!
//! Runs the engine for a simulated duration with a fixed one-second real
//! tick, logs hourly progress, and prints a JSON summary on stdout.
//!
//! Usage:
//!   hospital-simulator [CONFIG.json] [--hours N] [--seed N] [--verbose]

use hospital_simulator_core_rs::stats::{format_minutes, format_percentage};
use hospital_simulator_core_rs::{
    EngineConfig, SimulationEngine, SimulationError, StaffHeadcount, SECONDS_PER_HOUR,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, Level};

const DEFAULT_HOURS: f64 = 8.0;
const REAL_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Failed to encode summary: {0}")]
    Encode(serde_json::Error),
}

#[derive(Debug)]
struct Args {
    config_path: Option<PathBuf>,
    hours: f64,
    seed: Option<u64>,
    verbose: bool,
}

fn parse_args() -> Result<Args, CliError> {
    let mut args = Args {
        config_path: None,
        hours: DEFAULT_HOURS,
        seed: None,
        verbose: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => args.verbose = true,
            "--hours" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::InvalidArgument("--hours needs a value".into()))?;
                args.hours = value
                    .parse()
                    .ok()
                    .filter(|h: &f64| h.is_finite() && *h > 0.0)
                    .ok_or_else(|| {
                        let message = format!("--hours must be positive, got {}", value);
                        CliError::InvalidArgument(message)
                    })?;
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::InvalidArgument("--seed needs a value".into()))?;
                args.seed = Some(value.parse().map_err(|_| {
                    CliError::InvalidArgument(format!("--seed must be an integer, got {}", value))
                })?);
            }
            other if other.starts_with('-') => {
                return Err(CliError::InvalidArgument(format!("unknown flag {}", other)));
            }
            path => args.config_path = Some(PathBuf::from(path)),
        }
    }

    Ok(args)
}

/// Config from file, or defaults staffed like a small department
fn load_config(args: &Args) -> Result<EngineConfig, CliError> {
    let mut config = match &args.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| CliError::Parse {
                path: path.clone(),
                source,
            })?
        }
        None => EngineConfig {
            initial_staff: StaffHeadcount {
                doctors: 2,
                nurses: 3,
                receptionists: 1,
            },
            ..Default::default()
        },
    };

    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    info!(
        arrival_rate = config.arrival_rate_per_hour,
        speed = config.simulation_speed,
        seed = config.rng_seed,
        staff = config.initial_staff.total(),
        hours = args.hours,
        "Starting simulation"
    );

    let mut engine = SimulationEngine::new(config)?;
    let duration = args.hours * SECONDS_PER_HOUR;
    let mut next_report = SECONDS_PER_HOUR;

    engine.start();
    while engine.current_time() < duration {
        engine.tick(REAL_TICK)?;

        if engine.current_time() >= next_report {
            let stats = engine.stats();
            info!(
                hour = (next_report / SECONDS_PER_HOUR) as u64,
                arrived = stats.total_patients,
                treated = stats.treated_patients,
                queue = stats.queue_length,
                avg_wait = %format_minutes(stats.average_wait_time / 60.0),
                "Progress"
            );
            next_report += SECONDS_PER_HOUR;
        }
    }
    engine.pause();

    let stats = engine.stats();
    let waits = engine.wait_time_summary();
    let summary = json!({
        "simulated_hours": engine.current_time() / SECONDS_PER_HOUR,
        "ticks": engine.tick_count(),
        "stats": stats,
        "wait_times": waits,
        "display": {
            "average_wait": format_minutes(stats.average_wait_time / 60.0),
            "max_wait": format_minutes(stats.max_wait_time / 60.0),
            "p90_wait": format_minutes(waits.p90 / 60.0),
            "doctor_utilization": format_percentage(stats.staff_utilization.doctor, 1),
            "nurse_utilization": format_percentage(stats.staff_utilization.nurse, 1),
            "receptionist_utilization": format_percentage(stats.staff_utilization.receptionist, 1),
        },
    });

    let text = serde_json::to_string_pretty(&summary).map_err(CliError::Encode)?;
    println!("{}", text);
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: hospital-simulator [CONFIG.json] [--hours N] [--seed N] [--verbose]");
            return ExitCode::from(2);
        }
    };

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Simulation failed");
            ExitCode::FAILURE
        }
    }
}

// FireSense Sim - Command-line driver
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # FireSense Sim
//!
//! Command-line driver for FireSense sensor-field experiments.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a synthetic field and a random deployment
//! firesense-sim generate --out data/ --scenario grassland --seed 42 --deploy
//!
//! # Run one experiment over a window
//! SIM_START="2016-05-02 23:00:00" firesense-sim run --field data/ \
//!     --deployment data/sensor_deployment.csv --out results/
//!
//! # Sweep KL thresholds and error-history lengths
//! firesense-sim sweep --field data/ --deployment data/sensor_deployment.csv --out results/
//! ```

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use firesense::{Location, RunConfig};
use firesense_sim::logs::write_csv;
use firesense_sim::sweep::SWEEP_SUMMARY;
use firesense_sim::{
    parse_timestamp, run_sweep, Deployment, Result, SimError, Simulation, SweepConfig, TimeWindow,
};
use firesense_testdata::{generate_field, FireField, FireScenario, GeneratorConfig, GridSpec};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Default deployment file name written by `generate --deploy`.
const DEPLOYMENT_FILE: &str = "sensor_deployment.csv";

/// FireSense experiment driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic fire field
    Generate(GenerateArgs),
    /// Run one experiment
    Run(RunArgs),
    /// Sweep KL thresholds and error-history lengths
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Output directory
    #[arg(short, long)]
    out: PathBuf,

    /// Scenario preset (calm, grassland, wind_driven)
    #[arg(long, default_value = "grassland")]
    scenario: String,

    /// Grid columns
    #[arg(long, default_value = "40")]
    cols: usize,

    /// Grid rows
    #[arg(long, default_value = "40")]
    rows: usize,

    /// Cell edge length in metres
    #[arg(long, default_value = "500.0")]
    cell_size: f64,

    /// Number of timesteps
    #[arg(long, default_value = "192")]
    timesteps: usize,

    /// Seconds between timesteps
    #[arg(long, default_value = "3600")]
    interval_secs: i64,

    /// First timestamp
    #[arg(long, value_parser = parse_timestamp)]
    start: Option<DateTime<Utc>>,

    /// Also write a random sensor deployment
    #[arg(long)]
    deploy: bool,

    /// Baseline sensors to deploy
    #[arg(long, default_value = "1000")]
    typical: usize,

    /// Adaptive sensors to deploy
    #[arg(long, default_value = "1000")]
    universal: usize,

    /// Deployment radius around the grid centre (metres)
    #[arg(long, default_value = "10000.0")]
    radius: f64,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RunConfigArgs {
    /// Fire field directory
    #[arg(short, long)]
    field: PathBuf,

    /// Deployment CSV
    #[arg(short, long)]
    deployment: PathBuf,

    /// JSON run configuration (missing keys take defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window start
    #[arg(long, env = "SIM_START", value_parser = parse_timestamp)]
    start: Option<DateTime<Utc>>,

    /// Window end
    #[arg(long, env = "SIM_END", value_parser = parse_timestamp)]
    end: Option<DateTime<Utc>>,

    /// Output directory
    #[arg(short, long, default_value = "results")]
    out: PathBuf,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: RunConfigArgs,

    /// KL divergence threshold
    #[arg(long, env = "KL_THRESHOLD")]
    kl_threshold: Option<f64>,

    /// Error history length
    #[arg(long, env = "ERROR_HISTORY")]
    error_history: Option<usize>,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    common: RunConfigArgs,

    /// KL thresholds to sweep
    #[arg(long, value_delimiter = ',', default_value = "0.5,1.0,1.5,2.0")]
    thresholds: Vec<f64>,

    /// Error-history lengths to sweep
    #[arg(long, value_delimiter = ',', default_value = "5,10,20,30")]
    histories: Vec<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match cli.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("FireSense Sim v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Command::Generate(args) => generate(args),
        Command::Run(args) => run(args),
        Command::Sweep(args) => sweep(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let grid = GridSpec::new(Location::new(0.0, 0.0), args.cell_size, args.cols, args.rows);
    let scenario = FireScenario::preset(&args.scenario, &grid).ok_or_else(|| {
        SimError::Field(firesense_testdata::FieldError::InvalidConfig {
            name: "scenario",
            message: format!(
                "unknown preset '{}', expected one of {:?}",
                args.scenario,
                FireScenario::PRESETS
            ),
        })
    })?;

    let mut config = GeneratorConfig::new()
        .with_interval_secs(args.interval_secs)
        .with_num_timesteps(args.timesteps);
    if let Some(start) = args.start {
        config = config.with_start(start);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let field = generate_field(&grid, &scenario, &config)?;
    field.save(&args.out)?;
    info!(
        "Generated '{}' field: {} timesteps, {} hotspot entries -> {}",
        scenario.name,
        field.len(),
        field.hotspot_count(),
        args.out.display()
    );

    if args.deploy {
        let deployment = Deployment::scatter(
            grid.center(),
            args.radius,
            args.typical,
            args.universal,
            args.seed,
        )?;
        let path = args.out.join(DEPLOYMENT_FILE);
        deployment.save(&path)?;
        info!("Sensor deployment saved to {}", path.display());
    }
    Ok(())
}

/// Load the run configuration, field, deployment and window.
fn prepare(common: &RunConfigArgs) -> Result<(RunConfig, FireField, Deployment, TimeWindow)> {
    let config = match common.config {
        Some(ref path) => RunConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => RunConfig::default(),
    };
    let field = FireField::load(&common.field)?;
    let deployment = Deployment::load(&common.deployment)?;
    let window = TimeWindow::new(common.start, common.end)?;
    info!(
        "Field '{}' loaded: {} timesteps",
        field.manifest().name,
        field.len()
    );
    Ok((config, field, deployment, window))
}

fn run(args: RunArgs) -> Result<()> {
    let (mut config, field, deployment, window) = prepare(&args.common)?;
    if let Some(kl) = args.kl_threshold {
        config = config.with_kl_threshold(kl);
    }
    if let Some(history) = args.error_history {
        config = config.with_max_error_history(history);
    }
    info!(
        "KL threshold {}, error history {}",
        config.kl_threshold, config.max_error_history
    );

    let mut sim = Simulation::new(&deployment, &config, window, args.common.seed)?;
    let log = sim.run(&field, field.timestamps());
    log.save(&args.common.out)?;
    Ok(())
}

fn sweep(args: SweepArgs) -> Result<()> {
    let (config, field, deployment, window) = prepare(&args.common)?;
    let grid = SweepConfig {
        kl_thresholds: args.thresholds,
        error_histories: args.histories,
    };

    let rows = run_sweep(
        &grid,
        &config,
        &deployment,
        &field,
        field.timestamps(),
        window,
        args.common.seed,
    )?;

    std::fs::create_dir_all(&args.common.out)?;
    let path = args.common.out.join(SWEEP_SUMMARY);
    write_csv(&path, &rows)?;
    info!("Sweep completed and saved to {}", path.display());
    Ok(())
}

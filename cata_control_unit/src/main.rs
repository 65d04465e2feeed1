//! # Catapult Control Unit
//!
//! Runs the launcher control loop against the simulated rig. Useful for
//! exercising the state machine and telemetry without robot hardware:
//! with `--auto <rpm>` the loop starts in match-load fire and paces
//! itself against the simulated feeder; without it the launcher idles
//! cocked.
//!
//! On a robot coprocessor, build with the `rt` feature and pass
//! `--rt-priority` to run the loop under SCHED_FIFO.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cata_common::config::LauncherConfig;
use cata_control_unit::adapters::sim::SimLauncherRig;
use cata_control_unit::config::load_config;
use cata_control_unit::controller::CatapultController;
use cata_control_unit::cycle::{CycleRunner, rt_setup};
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Catapult Control Unit — launcher firing loop (simulated rig)
#[derive(Parser, Debug)]
#[command(name = "cata_control_unit")]
#[command(version)]
#[command(about = "Fixed-period firing control for a catapult launcher")]
struct Args {
    /// Path to the launcher configuration TOML.
    #[arg(default_value = "config/catapult.toml")]
    config: PathBuf,

    /// Start continuous fire at this velocity [rpm] via the autonomous
    /// intent handle.
    #[arg(long, value_name = "RPM")]
    auto: Option<i32>,

    /// Feeder reload delay for the simulated rig [ms].
    #[arg(long, default_value_t = 800)]
    reload_ms: u64,

    /// SCHED_FIFO priority (`rt` feature builds only).
    #[arg(long, default_value_t = 50)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Catapult Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Catapult Control Unit shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) if !args.config.exists() => {
            info!("no config at {} ({e}), using defaults", args.config.display());
            LauncherConfig::default()
        }
        Err(e) => return Err(Box::new(e)),
    };
    info!(
        "Config OK: cycle_time={}ms, max_velocity={}rpm, reset={:?}",
        config.cycle_time_ms, config.max_velocity, config.reset_style
    );

    rt_setup(args.rt_priority).map_err(|e| format!("RT setup failed: {e}"))?;

    let mut rig = SimLauncherRig::new(args.reload_ms, config.load_distance_mm);
    let controller = CatapultController::new(
        config.clone(),
        rig.limit.clone(),
        rig.distance.clone(),
        rig.motor.clone(),
    );
    let mut runner = CycleRunner::new(&config, controller);

    let auto = runner.controller().intent_handle();
    if let Some(rpm) = args.auto {
        info!("starting match-load fire at {rpm} rpm");
        auto.spin_cata_auto(rpm);
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let dt_ms = config.cycle_time_ms;
    runner.run(&running, move |_controller| {
        rig.step(dt_ms);
    });

    let stats = runner.stats();
    info!(
        "{} cycles, avg {}ns, max {}ns, {} overruns",
        stats.cycle_count,
        stats.avg_cycle_ns(),
        stats.max_cycle_ns,
        stats.overruns
    );

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

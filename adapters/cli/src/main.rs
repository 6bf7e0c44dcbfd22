#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Dolphin Run session.
//!
//! A scripted trainer plays the first part of the run, teaching the dolphin
//! by example, then hands control to the autopilot which replays what it
//! learned.

mod config;
mod presenter;
mod summary;
mod trainer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dolphin_run_rendering::{Presenter, Scene};
use dolphin_run_world::{self as world, query, Ground, World};

use crate::{config::Settings, presenter::LogPresenter, summary::RunSummary, trainer::Trainer};

/// Runs a headless Dolphin Run session.
#[derive(Debug, Parser)]
#[command(name = "dolphin-run", version, about)]
struct Args {
    /// TOML settings file; missing tables and fields use built-in tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,
    /// Seed for the trainer's reaction distances.
    #[arg(long)]
    seed: Option<u64>,
    /// Tick at which the trainer hands control to the autopilot.
    #[arg(long, value_name = "TICK")]
    autopilot_after: Option<u64>,
    /// Writes a JSON run summary to the given path.
    #[arg(long, value_name = "PATH")]
    summary_json: Option<PathBuf>,
    /// Logs a scene summary every N ticks.
    #[arg(long, value_name = "N", default_value_t = 60)]
    log_every: u64,
    /// Raises the default log filter to `debug`.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("invalid settings in {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(ticks) = self.ticks {
            settings.run.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            settings.run.seed = seed;
        }
        if let Some(tick) = self.autopilot_after {
            settings.run.autopilot_after = Some(tick);
        }
        Ok(settings)
    }
}

/// Entry point for the Dolphin Run command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = args.settings()?;
    let mut world = World::with_config(settings.world_config(), settings.track());
    println!("{}", query::welcome_banner(&world));

    let mut presenter = LogPresenter::new(args.log_every);
    let summary = run(&mut world, &settings, &mut presenter)?;
    log::info!(
        "run finished after {} ticks: {} manual jumps, {} imitation jumps, {} waves spawned",
        summary.ticks,
        summary.manual_jumps,
        summary.imitation_jumps,
        summary.spawned
    );

    if let Some(path) = &args.summary_json {
        summary.write(path)?;
    }
    Ok(())
}

fn run<G: Ground>(
    world: &mut World<G>,
    settings: &Settings,
    presenter: &mut impl Presenter,
) -> Result<RunSummary> {
    let script = &settings.run;
    let mut trainer = Trainer::new(
        script.seed,
        script.reaction_min,
        script.reaction_max,
        script.autopilot_after,
    );
    let dt = settings.timestep();
    let mut summary = RunSummary::default();
    let mut events = Vec::new();

    for tick in 0..script.ticks {
        let input = trainer.input(
            tick,
            query::pose(world),
            query::nearest_obstacle_ahead(world),
        );
        for command in input.into_commands(dt) {
            world::apply(world, command, &mut events);
        }
        summary.record(&events);
        events.clear();

        let scene = Scene::new(
            query::pose(world),
            &query::obstacle_view(world),
            query::pilot_mode(world),
            query::session_phase(world),
        );
        presenter
            .present(tick, &scene)
            .with_context(|| format!("failed to present tick {tick}"))?;
    }
    presenter.finish()?;

    summary.final_mode = query::pilot_mode(world);
    summary.memory = query::jump_memory(world).to_vec();
    Ok(summary)
}

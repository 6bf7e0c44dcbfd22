#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Dolphin Run.
//!
//! The world owns the obstacle spawner, the character controller and the
//! ground collaborator. Adapters mutate it exclusively through [`apply`] and
//! observe it through the [`query`] module.

use dolphin_run_core::{Command, Event, SessionPhase, WELCOME_BANNER};
use dolphin_run_system_pilot::{self as pilot, CharacterController};
use dolphin_run_system_spawning::{self as spawning, ObstacleSpawner};

mod track;

pub use track::{FlatTrack, Ground};

/// Tuning applied to every component when the world is constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldConfig {
    /// Obstacle cadence and geometry.
    pub spawning: spawning::Config,
    /// Character physics and imitation thresholds.
    pub pilot: pilot::Config,
}

/// Represents the authoritative Dolphin Run world state.
#[derive(Debug)]
pub struct World<G = FlatTrack> {
    banner: &'static str,
    spawner: ObstacleSpawner,
    controller: CharacterController,
    ground: G,
    phase: SessionPhase,
    tick_index: u64,
}

impl World {
    /// Creates a new world with default tuning on a flat track.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default(), FlatTrack::default())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Ground> World<G> {
    /// Creates a new world from explicit tuning and ground geometry.
    #[must_use]
    pub fn with_config(config: WorldConfig, ground: G) -> Self {
        Self {
            banner: WELCOME_BANNER,
            spawner: ObstacleSpawner::new(config.spawning),
            controller: CharacterController::new(config.pilot),
            ground,
            phase: SessionPhase::Running,
            tick_index: 0,
        }
    }

    fn tick(&mut self, dt: std::time::Duration, jump_requested: bool, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let reference_x = self.controller.config().reference_x();
        let before = self.controller.pose();
        // A rising character has left the surface even while still within contact range.
        let grounded =
            before.velocity_y >= 0.0 && self.ground.is_grounded(reference_x, before.y);

        let _ = self.spawner.advance(dt, out_events);
        let nearest = self.spawner.nearest_obstacle_ahead(reference_x);

        let step = self
            .controller
            .update(dt, jump_requested, grounded, nearest);
        if let Some(trigger) = step.jump {
            out_events.push(Event::Jumped {
                trigger,
                position_y: before.y,
            });
        }

        let moved = self.controller.pose();
        if moved.velocity_y >= 0.0 && self.ground.is_grounded(reference_x, moved.y) {
            self.controller.settle(self.ground.surface_y(reference_x));
        }
        let pose = self.controller.pose();
        log::trace!(
            "tick {} pose y={:.2} vy={:.2}",
            self.tick_index,
            pose.y,
            pose.velocity_y
        );
        out_events.push(Event::PoseUpdated { pose });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply<G: Ground>(world: &mut World<G>, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt, jump_requested } => {
            if world.phase == SessionPhase::Paused {
                return;
            }
            world.tick(dt, jump_requested, out_events);
        }
        Command::ToggleAutopilot => {
            let mode = world.controller.toggle_autopilot();
            out_events.push(Event::PilotModeChanged { mode });
        }
        Command::SetSessionPhase { phase } => {
            if world.phase == phase {
                return;
            }
            log::info!("session {:?} -> {phase:?}", world.phase);
            world.phase = phase;
            out_events.push(Event::SessionPhaseChanged { phase });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dolphin_run_core::{CharacterPose, ObstacleView, PilotMode, SessionPhase};
    use dolphin_run_system_pilot::DolphinMemory;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner<G>(world: &World<G>) -> &'static str {
        world.banner
    }

    /// Pose of the character at the end of the last tick.
    #[must_use]
    pub fn pose<G>(world: &World<G>) -> CharacterPose {
        world.controller.pose()
    }

    /// Mode currently driving the character's jump decisions.
    #[must_use]
    pub fn pilot_mode<G>(world: &World<G>) -> PilotMode {
        world.controller.mode()
    }

    /// Whether ticks currently advance the simulation.
    #[must_use]
    pub fn session_phase<G>(world: &World<G>) -> SessionPhase {
        world.phase
    }

    /// Captures a read-only view of the alive obstacles.
    #[must_use]
    pub fn obstacle_view<G>(world: &World<G>) -> ObstacleView {
        world.spawner.view()
    }

    /// Distance from the character to the nearest obstacle ahead, if any.
    #[must_use]
    pub fn nearest_obstacle_ahead<G>(world: &World<G>) -> Option<f32> {
        world
            .spawner
            .nearest_obstacle_ahead(world.controller.config().reference_x())
    }

    /// Samples recorded from manual jumps, oldest first.
    #[must_use]
    pub fn jump_memory<G>(world: &World<G>) -> &DolphinMemory {
        world.controller.memory()
    }

    /// Number of ticks that advanced the simulation.
    #[must_use]
    pub fn tick_index<G>(world: &World<G>) -> u64 {
        world.tick_index
    }

    /// Total number of obstacles spawned so far.
    #[must_use]
    pub fn spawned_total<G>(world: &World<G>) -> u64 {
        world.spawner.spawned_total()
    }
}

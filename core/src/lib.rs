#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dolphin Run engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the simulation systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened during the tick. Rendering and collision
//! collaborators consume [`CharacterPose`] and [`ObstacleView`] snapshots.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dolphin Run.";

/// Default tuning values shared by the systems and adapters.
pub mod tuning {
    use std::time::Duration;

    /// Downward acceleration applied while airborne, in units per second squared.
    pub const GRAVITY: f32 = 900.0;
    /// Vertical velocity assigned by a jump. Negative values point up.
    pub const JUMP_FORCE: f32 = -450.0;
    /// Number of jump samples retained for imitation.
    pub const JUMP_MEMORY_CAPACITY: usize = 50;
    /// Maximum vertical offset between a sample and the character for a match.
    pub const IMITATION_HEIGHT_TOLERANCE: f32 = 40.0;
    /// Obstacle distance below which a sample or situation is considered imminent.
    pub const IMITATION_DISTANCE_HORIZON: f32 = 200.0;
    /// Horizontal speed of every obstacle, in units per second.
    pub const OBSTACLE_SPEED: f32 = 250.0;
    /// Horizontal coordinate at which obstacles are spawned.
    pub const OBSTACLE_SPAWN_X: f32 = 800.0;
    /// Vertical coordinate at which obstacles are spawned.
    pub const OBSTACLE_SPAWN_Y: f32 = 380.0;
    /// Obstacles whose horizontal position falls below this value are destroyed.
    pub const OBSTACLE_DESTRUCTION_X: f32 = -100.0;
    /// Time between two obstacle spawns.
    pub const SPAWN_INTERVAL: Duration = Duration::from_secs(1);
    /// Fixed horizontal coordinate of the character.
    pub const CHARACTER_X: f32 = 100.0;
    /// Height of the flat track surface the character rests on.
    pub const TRACK_SURFACE_Y: f32 = 380.0;
    /// Fixed simulation timestep used by headless drivers.
    pub const FIXED_TIMESTEP: Duration = Duration::from_nanos(16_666_667);
}

/// Source of jump decisions for the character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PilotMode {
    /// Jumps follow external input and are recorded into the jump memory.
    #[default]
    Manual,
    /// Jumps follow the imitation policy replaying recorded samples.
    Autopilot,
}

impl PilotMode {
    /// Returns the opposite mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Autopilot,
            Self::Autopilot => Self::Manual,
        }
    }
}

/// Whether the session currently advances time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ticks advance the spawner and the character.
    #[default]
    Running,
    /// Ticks are ignored until the session resumes.
    Paused,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one fixed timestep.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Whether the external input collaborator requested a jump this tick.
        jump_requested: bool,
    },
    /// Flips the character between manual control and autopilot.
    ToggleAutopilot,
    /// Requests that the session enter the provided phase.
    SetSessionPhase {
        /// Phase the session should activate.
        phase: SessionPhase,
    },
}

/// What caused a jump to happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpTrigger {
    /// The external input collaborator requested the jump.
    Manual,
    /// The imitation policy matched a recorded sample.
    Imitation {
        /// Position of the matching sample within the memory, oldest first.
        sample_index: usize,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the spawner created a new obstacle.
    ObstacleSpawned {
        /// Identifier assigned to the obstacle.
        obstacle: ObstacleId,
        /// Horizontal coordinate the obstacle starts at.
        x: f32,
        /// Vertical coordinate the obstacle travels along.
        y: f32,
    },
    /// Confirms that an obstacle left the playfield and was removed.
    ObstacleDestroyed {
        /// Identifier of the removed obstacle.
        obstacle: ObstacleId,
    },
    /// Reports that the character jumped during the tick.
    Jumped {
        /// Origin of the jump decision.
        trigger: JumpTrigger,
        /// Vertical position at the instant of the jump.
        position_y: f32,
    },
    /// Reports the character pose after physics integration.
    PoseUpdated {
        /// Pose of the character at the end of the tick.
        pose: CharacterPose,
    },
    /// Announces that the character switched pilot mode.
    PilotModeChanged {
        /// Mode that became active.
        mode: PilotMode,
    },
    /// Announces that the session entered a new phase.
    SessionPhaseChanged {
        /// Phase that became active.
        phase: SessionPhase,
    },
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Recorded state at the instant a manual jump was executed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpSample {
    position_y: f32,
    vertical_velocity: f32,
    obstacle_distance: f32,
}

impl JumpSample {
    /// Captures a new sample.
    ///
    /// `obstacle_distance` is `f32::INFINITY` when no obstacle was ahead.
    #[must_use]
    pub const fn new(position_y: f32, vertical_velocity: f32, obstacle_distance: f32) -> Self {
        Self {
            position_y,
            vertical_velocity,
            obstacle_distance,
        }
    }

    /// Vertical position of the character when it jumped.
    #[must_use]
    pub const fn position_y(&self) -> f32 {
        self.position_y
    }

    /// Vertical velocity of the character right after the jump impulse.
    #[must_use]
    pub const fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Distance to the nearest obstacle ahead when the character jumped.
    #[must_use]
    pub const fn obstacle_distance(&self) -> f32 {
        self.obstacle_distance
    }
}

/// Position and velocity of the character handed to presentation collaborators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPose {
    /// Fixed horizontal coordinate of the character.
    pub x: f32,
    /// Vertical coordinate of the character.
    pub y: f32,
    /// Vertical velocity of the character. Horizontal velocity is always zero.
    pub velocity_y: f32,
    /// Whether the ground collaborator reported contact this tick.
    pub grounded: bool,
}

/// Immutable representation of a single obstacle used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    /// Identifier assigned to the obstacle.
    pub id: ObstacleId,
    /// Horizontal coordinate of the obstacle.
    pub x: f32,
    /// Vertical coordinate of the obstacle.
    pub y: f32,
    /// Leftward speed of the obstacle.
    pub speed: f32,
}

/// Read-only snapshot describing all alive obstacles.
#[derive(Clone, Debug, Default)]
pub struct ObstacleView {
    snapshots: Vec<ObstacleSnapshot>,
}

impl ObstacleView {
    /// Creates a new obstacle view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ObstacleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured obstacle snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ObstacleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of obstacles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

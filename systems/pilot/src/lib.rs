#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Character controller that owns the dolphin's vertical physics and the
//! imitation memory used while flying on autopilot.
//!
//! Each tick the controller first decides whether to jump, then integrates
//! velocity and position. In [`PilotMode::Manual`] jumps come from external
//! input and every executed jump is recorded as a [`JumpSample`]. In
//! [`PilotMode::Autopilot`] the [`ImitationPolicy`] scans the recorded samples
//! and replays the first one that fits the current situation.

use std::time::Duration;

use dolphin_run_core::{tuning, CharacterPose, JumpSample, JumpTrigger, PilotMode};

mod imitation;
mod memory;

pub use imitation::ImitationPolicy;
pub use memory::JumpMemory;

/// Jump memory sized for the dolphin.
pub type DolphinMemory = JumpMemory<{ tuning::JUMP_MEMORY_CAPACITY }>;

/// Configuration parameters required to construct the character controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    gravity: f32,
    jump_force: f32,
    reference_x: f32,
    start_y: f32,
    policy: ImitationPolicy,
}

impl Config {
    /// Creates a new configuration from physics constants and imitation thresholds.
    #[must_use]
    pub const fn new(
        gravity: f32,
        jump_force: f32,
        reference_x: f32,
        start_y: f32,
        policy: ImitationPolicy,
    ) -> Self {
        Self {
            gravity,
            jump_force,
            reference_x,
            start_y,
            policy,
        }
    }

    /// Downward acceleration applied while airborne.
    #[must_use]
    pub const fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Fixed horizontal coordinate of the character.
    #[must_use]
    pub const fn reference_x(&self) -> f32 {
        self.reference_x
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            tuning::GRAVITY,
            tuning::JUMP_FORCE,
            tuning::CHARACTER_X,
            tuning::TRACK_SURFACE_Y,
            ImitationPolicy::new(
                tuning::IMITATION_HEIGHT_TOLERANCE,
                tuning::IMITATION_DISTANCE_HORIZON,
            ),
        )
    }
}

/// Outcome of a single controller update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PilotStep {
    /// Pose after physics integration.
    pub pose: CharacterPose,
    /// Origin of the jump executed during the tick, if any.
    pub jump: Option<JumpTrigger>,
}

/// Owns the dolphin's physics state, pilot mode and jump memory.
#[derive(Clone, Debug)]
pub struct CharacterController {
    config: Config,
    position_y: f32,
    velocity_y: f32,
    grounded: bool,
    mode: PilotMode,
    memory: DolphinMemory,
}

impl CharacterController {
    /// Creates a controller resting at the configured start height in manual mode.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            position_y: config.start_y,
            velocity_y: 0.0,
            grounded: false,
            mode: PilotMode::Manual,
            memory: DolphinMemory::new(),
        }
    }

    /// Places the controller at an explicit height and velocity.
    #[must_use]
    pub fn with_state(mut self, position_y: f32, velocity_y: f32) -> Self {
        self.position_y = position_y;
        self.velocity_y = velocity_y;
        self
    }

    /// Advances the controller by one fixed timestep.
    ///
    /// `grounded` comes from the ground collaborator and `obstacle_distance`
    /// from the spawner's nearest-obstacle query; `None` means nothing is ahead.
    pub fn update(
        &mut self,
        dt: Duration,
        jump_requested: bool,
        grounded: bool,
        obstacle_distance: Option<f32>,
    ) -> PilotStep {
        let seconds = dt.as_secs_f32();
        debug_assert!(seconds.is_finite(), "timestep must be finite");
        self.grounded = grounded;
        let distance = obstacle_distance.unwrap_or(f32::INFINITY);

        let jump = self.decide(jump_requested, distance);
        if let Some(trigger) = jump {
            self.jump(trigger, distance);
        }

        self.integrate(seconds);

        PilotStep {
            pose: self.pose(),
            jump,
        }
    }

    fn decide(&self, jump_requested: bool, distance: f32) -> Option<JumpTrigger> {
        if !self.grounded {
            return None;
        }
        match self.mode {
            PilotMode::Manual => jump_requested.then_some(JumpTrigger::Manual),
            PilotMode::Autopilot => self
                .config
                .policy
                .first_match(self.memory.iter(), self.position_y, distance)
                .map(|sample_index| JumpTrigger::Imitation { sample_index }),
        }
    }

    fn jump(&mut self, trigger: JumpTrigger, distance: f32) {
        self.velocity_y = self.config.jump_force;
        log::debug!(
            "jump {trigger:?} at y={:.1} with obstacle at {distance:.1}",
            self.position_y
        );

        if self.mode == PilotMode::Manual {
            let sample = JumpSample::new(self.position_y, self.velocity_y, distance);
            if let Some(evicted) = self.memory.push(sample) {
                log::trace!("jump memory full, evicted sample at y={:.1}", evicted.position_y());
            }
        }
    }

    fn integrate(&mut self, seconds: f32) {
        if !self.grounded {
            self.velocity_y += self.config.gravity * seconds;
        } else if self.velocity_y > 0.0 {
            self.velocity_y = 0.0;
        }
        self.position_y += self.velocity_y * seconds;
    }

    /// Places the character exactly on a surface it touched or sank into.
    pub fn settle(&mut self, surface_y: f32) {
        self.position_y = surface_y;
    }

    /// Flips between manual control and autopilot, returning the new mode.
    pub fn toggle_autopilot(&mut self) -> PilotMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Activates the provided pilot mode.
    pub fn set_mode(&mut self, mode: PilotMode) {
        if self.mode != mode {
            log::info!("pilot mode {:?} -> {mode:?}", self.mode);
        }
        self.mode = mode;
    }

    /// Currently active pilot mode.
    #[must_use]
    pub const fn mode(&self) -> PilotMode {
        self.mode
    }

    /// Snapshot of the character for presentation collaborators.
    #[must_use]
    pub const fn pose(&self) -> CharacterPose {
        CharacterPose {
            x: self.config.reference_x,
            y: self.position_y,
            velocity_y: self.velocity_y,
            grounded: self.grounded,
        }
    }

    /// Recorded jump samples.
    #[must_use]
    pub const fn memory(&self) -> &DolphinMemory {
        &self.memory
    }

    /// Configuration the controller was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

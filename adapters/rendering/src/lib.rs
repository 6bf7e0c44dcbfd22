#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Dolphin Run adapters.

use std::time::Duration;

use anyhow::Result as AnyResult;
use dolphin_run_core::{CharacterPose, Command, ObstacleId, ObstacleView, PilotMode, SessionPhase};
use glam::Vec2;

const DOLPHIN_COLOR: Color = Color::from_rgb_u8(0x4a, 0x90, 0xd9);
const WAVE_COLOR: Color = Color::from_rgb_u8(0x1c, 0x4e, 0x80);
const AUTOPILOT_TINT: f32 = 0.35;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before advancing the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the jump action is held on this frame.
    pub jump_pressed: bool,
    /// Whether the adapter detected an autopilot toggle press on this frame.
    pub autopilot_toggle: bool,
}

impl FrameInput {
    /// Translates the frame input into the commands for one tick.
    ///
    /// The toggle is applied before the tick so the new mode drives the
    /// tick's jump decision.
    #[must_use]
    pub fn into_commands(self, dt: Duration) -> Vec<Command> {
        let mut commands = Vec::with_capacity(2);
        if self.autopilot_toggle {
            commands.push(Command::ToggleAutopilot);
        }
        commands.push(Command::Tick {
            dt,
            jump_requested: self.jump_pressed,
        });
        commands
    }
}

/// Dolphin descriptor positioned in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DolphinPresentation {
    /// Position of the dolphin.
    pub position: Vec2,
    /// Velocity of the dolphin.
    pub velocity: Vec2,
    /// Whether the dolphin rests on the track.
    pub grounded: bool,
    /// Body color, tinted while on autopilot.
    pub color: Color,
}

/// Wave descriptor positioned in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavePresentation {
    /// Identifier of the obstacle the wave represents.
    pub id: ObstacleId,
    /// Position of the wave.
    pub position: Vec2,
    /// Fill color of the wave.
    pub color: Color,
}

/// Scene description combining the dolphin and every live wave.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// The player character.
    pub dolphin: DolphinPresentation,
    /// Waves currently on the playfield, ordered by identifier.
    pub waves: Vec<WavePresentation>,
    /// Mode driving the dolphin's jumps.
    pub pilot_mode: PilotMode,
    /// Whether the session is advancing.
    pub phase: SessionPhase,
}

impl Scene {
    /// Builds a scene from world snapshots.
    #[must_use]
    pub fn new(
        pose: CharacterPose,
        obstacles: &ObstacleView,
        pilot_mode: PilotMode,
        phase: SessionPhase,
    ) -> Self {
        let color = match pilot_mode {
            PilotMode::Manual => DOLPHIN_COLOR,
            PilotMode::Autopilot => DOLPHIN_COLOR.lighten(AUTOPILOT_TINT),
        };
        let dolphin = DolphinPresentation {
            position: Vec2::new(pose.x, pose.y),
            velocity: Vec2::new(0.0, pose.velocity_y),
            grounded: pose.grounded,
            color,
        };
        let waves = obstacles
            .iter()
            .map(|obstacle| WavePresentation {
                id: obstacle.id,
                position: Vec2::new(obstacle.x, obstacle.y),
                color: WAVE_COLOR,
            })
            .collect();

        Self {
            dolphin,
            waves,
            pilot_mode,
            phase,
        }
    }

    /// Horizontal gap between the dolphin and the closest wave in front of it.
    #[must_use]
    pub fn closest_wave_gap(&self) -> Option<f32> {
        self.waves
            .iter()
            .map(|wave| wave.position.x - self.dolphin.position.x)
            .filter(|gap| *gap > 0.0)
            .min_by(f32::total_cmp)
    }
}

/// Presentation backend that consumes one scene per tick.
pub trait Presenter {
    /// Presents the scene produced by the tick with the given index.
    fn present(&mut self, tick: u64, scene: &Scene) -> AnyResult<()>;

    /// Flushes any buffered output once the run ends.
    fn finish(&mut self) -> AnyResult<()> {
        Ok(())
    }
}

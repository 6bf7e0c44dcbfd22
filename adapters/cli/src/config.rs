use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use dolphin_run_core::tuning;
use dolphin_run_system_pilot::{self as pilot, ImitationPolicy};
use dolphin_run_system_spawning as spawning;
use dolphin_run_world::{FlatTrack, WorldConfig};
use serde::Deserialize;
use thiserror::Error;

const MAX_DURATION_SECS: f64 = 3_600.0;

/// Failures raised while loading or validating run settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}")]
    Read {
        /// Location that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for the expected layout.
    #[error("failed to parse settings toml")]
    Parse(#[from] toml::de::Error),
    /// A tuning value must be strictly positive and finite.
    #[error("`{field}` must be positive and finite, got {value}")]
    NotPositive {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value found in the settings.
        value: f64,
    },
    /// A duration exceeds the longest supported interval.
    #[error("`{field}` must not exceed {max} seconds, got {value}", max = MAX_DURATION_SECS)]
    TooLong {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value found in the settings.
        value: f64,
    },
    /// A duration rounds down to zero nanoseconds.
    #[error("`{field}` is shorter than one nanosecond, got {value}")]
    TooShort {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value found in the settings.
        value: f64,
    },
    /// A tuning value must be finite.
    #[error("`{field}` must be finite, got {value}")]
    NotFinite {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value found in the settings.
        value: f64,
    },
    /// The trainer reaction window is empty.
    #[error("reaction window {min}..{max} is empty")]
    EmptyReactionWindow {
        /// Lower bound of the window.
        min: f32,
        /// Upper bound of the window.
        max: f32,
    },
}

/// Run settings loaded from a TOML file. Every field has a default so
/// partial files are accepted.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) physics: PhysicsSettings,
    pub(crate) imitation: ImitationSettings,
    pub(crate) obstacles: ObstacleSettings,
    pub(crate) run: RunSettings,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PhysicsSettings {
    pub(crate) gravity: f32,
    pub(crate) jump_force: f32,
    pub(crate) character_x: f32,
    pub(crate) track_surface_y: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: tuning::GRAVITY,
            jump_force: tuning::JUMP_FORCE,
            character_x: tuning::CHARACTER_X,
            track_surface_y: tuning::TRACK_SURFACE_Y,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ImitationSettings {
    pub(crate) height_tolerance: f32,
    pub(crate) distance_horizon: f32,
}

impl Default for ImitationSettings {
    fn default() -> Self {
        Self {
            height_tolerance: tuning::IMITATION_HEIGHT_TOLERANCE,
            distance_horizon: tuning::IMITATION_DISTANCE_HORIZON,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ObstacleSettings {
    pub(crate) spawn_interval_secs: f64,
    pub(crate) spawn_x: f32,
    pub(crate) spawn_y: f32,
    pub(crate) speed: f32,
    pub(crate) destruction_x: f32,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            spawn_interval_secs: tuning::SPAWN_INTERVAL.as_secs_f64(),
            spawn_x: tuning::OBSTACLE_SPAWN_X,
            spawn_y: tuning::OBSTACLE_SPAWN_Y,
            speed: tuning::OBSTACLE_SPEED,
            destruction_x: tuning::OBSTACLE_DESTRUCTION_X,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunSettings {
    pub(crate) ticks: u64,
    pub(crate) timestep_secs: f64,
    pub(crate) seed: u64,
    /// Tick at which the trainer hands over to the autopilot.
    pub(crate) autopilot_after: Option<u64>,
    pub(crate) reaction_min: f32,
    pub(crate) reaction_max: f32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: 3_600,
            timestep_secs: tuning::FIXED_TIMESTEP.as_secs_f64(),
            seed: 0,
            autopilot_after: Some(1_800),
            reaction_min: 110.0,
            reaction_max: 180.0,
        }
    }
}

impl Settings {
    /// Reads and validates settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parses and validates settings from TOML source.
    pub(crate) fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every tuning value can drive a simulation.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        positive("physics.gravity", f64::from(self.physics.gravity))?;
        finite("physics.jump_force", f64::from(self.physics.jump_force))?;
        finite("physics.character_x", f64::from(self.physics.character_x))?;
        finite(
            "physics.track_surface_y",
            f64::from(self.physics.track_surface_y),
        )?;
        positive(
            "imitation.height_tolerance",
            f64::from(self.imitation.height_tolerance),
        )?;
        positive(
            "imitation.distance_horizon",
            f64::from(self.imitation.distance_horizon),
        )?;
        duration(
            "obstacles.spawn_interval_secs",
            self.obstacles.spawn_interval_secs,
        )?;
        finite("obstacles.spawn_x", f64::from(self.obstacles.spawn_x))?;
        finite("obstacles.spawn_y", f64::from(self.obstacles.spawn_y))?;
        positive("obstacles.speed", f64::from(self.obstacles.speed))?;
        finite(
            "obstacles.destruction_x",
            f64::from(self.obstacles.destruction_x),
        )?;
        duration("run.timestep_secs", self.run.timestep_secs)?;

        let (min, max) = (self.run.reaction_min, self.run.reaction_max);
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigError::EmptyReactionWindow { min, max });
        }
        Ok(())
    }

    /// Duration of one simulation tick.
    #[must_use]
    pub(crate) fn timestep(&self) -> Duration {
        Duration::from_secs_f64(self.run.timestep_secs)
    }

    /// Ground geometry for the configured track.
    #[must_use]
    pub(crate) fn track(&self) -> FlatTrack {
        FlatTrack::new(self.physics.track_surface_y)
    }

    /// Converts the settings into world tuning.
    #[must_use]
    pub(crate) fn world_config(&self) -> WorldConfig {
        let physics = &self.physics;
        let obstacles = &self.obstacles;
        WorldConfig {
            spawning: spawning::Config::new(
                Duration::from_secs_f64(obstacles.spawn_interval_secs),
                obstacles.spawn_x,
                obstacles.spawn_y,
                obstacles.speed,
                obstacles.destruction_x,
            ),
            pilot: pilot::Config::new(
                physics.gravity,
                physics.jump_force,
                physics.character_x,
                physics.track_surface_y,
                ImitationPolicy::new(
                    self.imitation.height_tolerance,
                    self.imitation.distance_horizon,
                ),
            ),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn duration(field: &'static str, value: f64) -> Result<(), ConfigError> {
    positive(field, value)?;
    if value > MAX_DURATION_SECS {
        return Err(ConfigError::TooLong { field, value });
    }
    if Duration::from_secs_f64(value).is_zero() {
        return Err(ConfigError::TooShort { field, value });
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::from_toml("").expect("empty settings are valid");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.world_config(), WorldConfig::default());
        let drift = settings
            .timestep()
            .as_nanos()
            .abs_diff(tuning::FIXED_TIMESTEP.as_nanos());
        assert!(drift <= 1, "timestep drifted by {drift}ns");
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let settings = Settings::from_toml(
            r#"
            [physics]
            gravity = 1200.0

            [run]
            ticks = 10
            autopilot_after = 5
            "#,
        )
        .expect("partial settings are valid");

        assert_eq!(settings.physics.gravity, 1200.0);
        assert_eq!(settings.physics.jump_force, tuning::JUMP_FORCE);
        assert_eq!(settings.run.ticks, 10);
        assert_eq!(settings.run.autopilot_after, Some(5));
        assert_eq!(settings.world_config().pilot.gravity(), 1200.0);
    }

    #[test]
    fn zero_spawn_interval_is_rejected() {
        let error = Settings::from_toml("[obstacles]\nspawn_interval_secs = 0.0\n")
            .expect_err("zero interval must fail");
        assert!(matches!(
            error,
            ConfigError::NotPositive {
                field: "obstacles.spawn_interval_secs",
                ..
            }
        ));
    }

    #[test]
    fn overlong_timestep_is_rejected() {
        let error = Settings::from_toml("[run]\ntimestep_secs = 1e12\n")
            .expect_err("huge timestep must fail");
        assert!(matches!(error, ConfigError::TooLong { .. }));
    }

    #[test]
    fn sub_nanosecond_spawn_interval_is_rejected() {
        let error = Settings::from_toml("[obstacles]\nspawn_interval_secs = 1e-12\n")
            .expect_err("interval rounding to zero must fail");
        assert!(matches!(
            error,
            ConfigError::TooShort {
                field: "obstacles.spawn_interval_secs",
                ..
            }
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Settings::from_toml("[physics]\ngravty = 3.0\n")
            .expect_err("typo must fail");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_reaction_window_is_rejected() {
        let error = Settings::from_toml("[run]\nreaction_min = 200.0\nreaction_max = 100.0\n")
            .expect_err("inverted window must fail");
        assert!(matches!(error, ConfigError::EmptyReactionWindow { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("definitely/not/here.toml");
        let error = Settings::load(path).expect_err("missing file must fail");
        assert!(error.to_string().contains("definitely/not/here.toml"));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that owns the set of incoming obstacles.

use std::time::Duration;

use dolphin_run_core::{tuning, Event, ObstacleId, ObstacleSnapshot, ObstacleView};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    spawn_interval: Duration,
    spawn_x: f32,
    spawn_y: f32,
    speed: f32,
    destruction_x: f32,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and geometry.
    #[must_use]
    pub const fn new(
        spawn_interval: Duration,
        spawn_x: f32,
        spawn_y: f32,
        speed: f32,
        destruction_x: f32,
    ) -> Self {
        Self {
            spawn_interval,
            spawn_x,
            spawn_y,
            speed,
            destruction_x,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            tuning::SPAWN_INTERVAL,
            tuning::OBSTACLE_SPAWN_X,
            tuning::OBSTACLE_SPAWN_Y,
            tuning::OBSTACLE_SPEED,
            tuning::OBSTACLE_DESTRUCTION_X,
        )
    }
}

/// A single wave travelling toward the character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    id: ObstacleId,
    x: f32,
    y: f32,
    speed: f32,
    alive: bool,
}

impl Obstacle {
    /// Creates a live obstacle at the provided coordinates.
    #[must_use]
    pub const fn new(id: ObstacleId, x: f32, y: f32, speed: f32) -> Self {
        Self {
            id,
            x,
            y,
            speed,
            alive: true,
        }
    }

    /// Moves the obstacle left and marks it dead once it passes `destruction_x`.
    pub fn update(&mut self, dt: f32, destruction_x: f32) {
        self.x -= self.speed * dt;
        if self.x < destruction_x {
            self.alive = false;
        }
    }

    /// Current horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Reports whether the obstacle is still on the playfield.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    fn snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot {
            id: self.id,
            x: self.x,
            y: self.y,
            speed: self.speed,
        }
    }
}

/// Owns the spawn timer and the active obstacle set.
#[derive(Debug)]
pub struct ObstacleSpawner {
    config: Config,
    remaining: Duration,
    obstacles: Vec<Obstacle>,
    next_id: u32,
    spawned_total: u64,
}

impl ObstacleSpawner {
    /// Creates a new spawner with a full countdown and no obstacles.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            remaining: config.spawn_interval,
            obstacles: Vec::new(),
            next_id: 0,
            spawned_total: 0,
        }
    }

    /// Advances obstacles and the spawn timer by `dt`.
    ///
    /// Existing obstacles move first and dead ones are pruned before the timer
    /// runs, so a fresh obstacle always appears exactly at the spawn point.
    /// Returns the identifier of the obstacle spawned during this call, if any.
    pub fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> Option<ObstacleId> {
        let seconds = dt.as_secs_f32();
        let destruction_x = self.config.destruction_x;
        for obstacle in &mut self.obstacles {
            obstacle.update(seconds, destruction_x);
        }

        self.obstacles.retain(|obstacle| {
            if obstacle.alive {
                return true;
            }
            log::debug!("obstacle {} destroyed at x={:.1}", obstacle.id.get(), obstacle.x);
            out_events.push(Event::ObstacleDestroyed {
                obstacle: obstacle.id,
            });
            false
        });

        if dt < self.remaining {
            self.remaining -= dt;
            return None;
        }

        // Overshoot is discarded: a single spawn and a full reset.
        self.remaining = self.config.spawn_interval;
        Some(self.spawn(out_events))
    }

    fn spawn(&mut self, out_events: &mut Vec<Event>) -> ObstacleId {
        let id = ObstacleId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.spawned_total = self.spawned_total.saturating_add(1);

        let obstacle = Obstacle::new(
            id,
            self.config.spawn_x,
            self.config.spawn_y,
            self.config.speed,
        );
        log::debug!("obstacle {} spawned at x={:.1}", id.get(), obstacle.x);
        out_events.push(Event::ObstacleSpawned {
            obstacle: id,
            x: obstacle.x,
            y: obstacle.y,
        });
        self.obstacles.push(obstacle);
        id
    }

    /// Distance from `reference_x` to the closest obstacle strictly ahead of it.
    ///
    /// Returns `None` when no alive obstacle is ahead.
    #[must_use]
    pub fn nearest_obstacle_ahead(&self, reference_x: f32) -> Option<f32> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.alive && obstacle.x > reference_x)
            .map(|obstacle| obstacle.x - reference_x)
            .min_by(f32::total_cmp)
    }

    /// Captures a read-only view of the alive obstacles.
    #[must_use]
    pub fn view(&self) -> ObstacleView {
        ObstacleView::from_snapshots(self.obstacles.iter().map(Obstacle::snapshot).collect())
    }

    /// Obstacles currently owned by the spawner, in spawn order.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Total number of obstacles spawned since construction.
    #[must_use]
    pub const fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Time left before the next spawn.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }
}

impl Default for ObstacleSpawner {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

//! Imitation policy replaying recorded manual jumps.

use dolphin_run_core::JumpSample;

/// Thresholds that decide when a recorded sample applies to the present.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImitationPolicy {
    height_tolerance: f32,
    distance_horizon: f32,
}

impl ImitationPolicy {
    /// Creates a policy with the provided matching thresholds.
    #[must_use]
    pub const fn new(height_tolerance: f32, distance_horizon: f32) -> Self {
        Self {
            height_tolerance,
            distance_horizon,
        }
    }

    /// Reports whether `sample` was recorded in a situation like the current one.
    #[must_use]
    pub fn matches(&self, sample: &JumpSample, position_y: f32) -> bool {
        (sample.position_y() - position_y).abs() < self.height_tolerance
            && sample.obstacle_distance() < self.distance_horizon
    }

    /// Index of the first matching sample, scanning oldest first.
    ///
    /// Nothing matches while the nearest obstacle is outside the horizon, so
    /// the character never hops with an empty playfield ahead.
    pub fn first_match<'a, I>(
        &self,
        samples: I,
        position_y: f32,
        obstacle_distance: f32,
    ) -> Option<usize>
    where
        I: IntoIterator<Item = &'a JumpSample>,
    {
        if obstacle_distance.is_nan() || obstacle_distance >= self.distance_horizon {
            return None;
        }
        samples
            .into_iter()
            .position(|sample| self.matches(sample, position_y))
    }
}

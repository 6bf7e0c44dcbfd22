//! Ground collaborators that tell the world where the character can rest.

use dolphin_run_core::tuning;

/// Tolerance under which the character counts as touching the surface.
const CONTACT_EPSILON: f32 = 0.01;

/// Geometry the character rests on.
///
/// The world probes the ground before each decision step and settles the
/// character onto the surface after integration.
pub trait Ground {
    /// Height of the surface beneath horizontal coordinate `x`.
    fn surface_y(&self, x: f32) -> f32;

    /// Reports whether a character at (`x`, `position_y`) touches the surface.
    fn is_grounded(&self, x: f32, position_y: f32) -> bool {
        position_y >= self.surface_y(x) - CONTACT_EPSILON
    }
}

/// Flat horizontal track spanning the whole playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatTrack {
    surface_y: f32,
}

impl FlatTrack {
    /// Creates a track whose surface lies at `surface_y`.
    #[must_use]
    pub const fn new(surface_y: f32) -> Self {
        Self { surface_y }
    }
}

impl Default for FlatTrack {
    fn default() -> Self {
        Self::new(tuning::TRACK_SURFACE_Y)
    }
}

impl Ground for FlatTrack {
    fn surface_y(&self, _x: f32) -> f32 {
        self.surface_y
    }
}

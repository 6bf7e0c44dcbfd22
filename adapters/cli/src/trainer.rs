use dolphin_run_core::CharacterPose;
use dolphin_run_rendering::FrameInput;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scripted player that teaches the dolphin before handing over to the autopilot.
///
/// The trainer presses jump once the nearest obstacle is closer than its
/// current reaction distance, then draws a fresh reaction distance from the
/// configured window so the recorded samples vary between jumps.
#[derive(Debug)]
pub(crate) struct Trainer {
    rng: ChaCha8Rng,
    reaction_min: f32,
    reaction_max: f32,
    reaction: f32,
    handover_tick: Option<u64>,
}

impl Trainer {
    /// Creates a trainer seeded for reproducible runs.
    ///
    /// The window must be non-empty; settings validation guarantees it.
    pub(crate) fn new(
        seed: u64,
        reaction_min: f32,
        reaction_max: f32,
        handover_tick: Option<u64>,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let reaction = rng.gen_range(reaction_min..reaction_max);
        Self {
            rng,
            reaction_min,
            reaction_max,
            reaction,
            handover_tick,
        }
    }

    /// Produces the input for the tick with the given zero-based index.
    pub(crate) fn input(
        &mut self,
        tick: u64,
        pose: CharacterPose,
        nearest_obstacle: Option<f32>,
    ) -> FrameInput {
        let autopilot_toggle = self.handover_tick == Some(tick);
        if autopilot_toggle {
            log::info!("trainer hands over to the autopilot at tick {tick}");
        }
        if self.handed_over(tick) {
            return FrameInput {
                jump_pressed: false,
                autopilot_toggle,
            };
        }

        let close = nearest_obstacle.is_some_and(|distance| distance < self.reaction);
        let jump_pressed = pose.grounded && close;
        if jump_pressed {
            self.reaction = self.rng.gen_range(self.reaction_min..self.reaction_max);
        }

        FrameInput {
            jump_pressed,
            autopilot_toggle,
        }
    }

    fn handed_over(&self, tick: u64) -> bool {
        self.handover_tick.is_some_and(|handover| tick >= handover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> CharacterPose {
        CharacterPose {
            x: 100.0,
            y: 380.0,
            velocity_y: 0.0,
            grounded: true,
        }
    }

    #[test]
    fn presses_inside_reaction_window() {
        let mut trainer = Trainer::new(7, 120.0, 121.0, None);
        assert!(!trainer.input(0, grounded(), Some(300.0)).jump_pressed);
        assert!(!trainer.input(1, grounded(), None).jump_pressed);
        assert!(trainer.input(2, grounded(), Some(100.0)).jump_pressed);
    }

    #[test]
    fn waits_for_ground_contact() {
        let mut trainer = Trainer::new(7, 120.0, 121.0, None);
        let airborne = CharacterPose {
            grounded: false,
            ..grounded()
        };
        assert!(!trainer.input(0, airborne, Some(50.0)).jump_pressed);
    }

    #[test]
    fn hands_over_exactly_once() {
        let mut trainer = Trainer::new(1, 150.0, 190.0, Some(3));
        let inputs: Vec<_> = (0..6)
            .map(|tick| trainer.input(tick, grounded(), Some(10.0)))
            .collect();

        let toggles: Vec<_> = inputs.iter().map(|input| input.autopilot_toggle).collect();
        assert_eq!(toggles, [false, false, false, true, false, false]);
        assert!(inputs[..3].iter().all(|input| input.jump_pressed));
        assert!(inputs[3..].iter().all(|input| !input.jump_pressed));
    }

    #[test]
    fn same_seed_same_presses() {
        let script = |seed| {
            let mut trainer = Trainer::new(seed, 50.0, 200.0, None);
            (0..400)
                .map(|tick| {
                    let distance = 200.0 - (tick % 200) as f32;
                    trainer.input(tick, grounded(), Some(distance)).jump_pressed
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(script(42), script(42));
    }
}

use std::time::Duration;

use dolphin_run_core::{JumpTrigger, PilotMode};
use dolphin_run_system_pilot::{CharacterController, Config, ImitationPolicy};
use proptest::prelude::*;

const DT: Duration = Duration::from_millis(10);

fn controller() -> CharacterController {
    CharacterController::new(Config::new(
        900.0,
        -450.0,
        100.0,
        380.0,
        ImitationPolicy::new(40.0, 200.0),
    ))
}

/// Records one manual jump at `position_y` with an obstacle `distance` ahead.
fn record_jump(
    controller: CharacterController,
    position_y: f32,
    distance: f32,
) -> CharacterController {
    let mut controller = controller.with_state(position_y, 0.0);
    let step = controller.update(DT, true, true, Some(distance));
    assert_eq!(step.jump, Some(JumpTrigger::Manual));
    controller
}

#[test]
fn manual_jump_requires_ground_contact() {
    let mut controller = controller();

    let airborne = controller.update(DT, true, false, Some(150.0));
    assert_eq!(airborne.jump, None);
    assert!(controller.memory().is_empty());

    let mut controller = controller.with_state(380.0, 0.0);
    let grounded = controller.update(DT, true, true, Some(150.0));
    assert_eq!(grounded.jump, Some(JumpTrigger::Manual));
    assert_eq!(grounded.pose.velocity_y, -450.0);
}

#[test]
fn manual_jump_records_sample() {
    let controller = record_jump(controller(), 380.0, 175.0);

    let samples = controller.memory().to_vec();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].position_y(), 380.0);
    assert_eq!(samples[0].vertical_velocity(), -450.0);
    assert_eq!(samples[0].obstacle_distance(), 175.0);
}

#[test]
fn jump_without_obstacle_records_infinite_distance() {
    let mut controller = controller().with_state(380.0, 0.0);
    let _ = controller.update(DT, true, true, None);

    let samples = controller.memory().to_vec();
    assert!(samples[0].obstacle_distance().is_infinite());
}

#[test]
fn memory_drops_first_sample_after_fifty_one_jumps() {
    let mut controller = controller();
    for jump in 0..51 {
        controller = record_jump(controller, 380.0, jump as f32);
    }

    let samples = controller.memory().to_vec();
    assert_eq!(samples.len(), 50);
    assert_eq!(samples[0].obstacle_distance(), 1.0);
    assert!(samples.iter().all(|sample| sample.obstacle_distance() != 0.0));
}

#[test]
fn imitation_jumps_when_obstacle_is_close() {
    let mut controller = record_jump(controller(), 100.0, 150.0);
    assert_eq!(controller.toggle_autopilot(), PilotMode::Autopilot);

    let mut controller = controller.with_state(105.0, 0.0);
    let step = controller.update(DT, false, true, Some(180.0));

    assert_eq!(step.jump, Some(JumpTrigger::Imitation { sample_index: 0 }));
    assert_eq!(step.pose.velocity_y, -450.0);
}

#[test]
fn imitation_holds_when_obstacle_is_far() {
    let mut controller = record_jump(controller(), 100.0, 150.0);
    let _ = controller.toggle_autopilot();

    let mut controller = controller.with_state(105.0, 0.0);
    let step = controller.update(DT, false, true, Some(250.0));

    assert_eq!(step.jump, None);
    assert_eq!(step.pose.velocity_y, 0.0);
}

#[test]
fn autopilot_ignores_external_requests_and_does_not_record() {
    let mut controller = record_jump(controller(), 380.0, 150.0);
    controller.set_mode(PilotMode::Autopilot);

    let mut controller = controller.with_state(200.0, 0.0);
    let step = controller.update(DT, true, true, Some(150.0));
    assert_eq!(step.jump, None, "no sample near y=200");

    let mut controller = controller.with_state(380.0, 0.0);
    let step = controller.update(DT, false, true, Some(150.0));
    assert!(matches!(step.jump, Some(JumpTrigger::Imitation { .. })));
    assert_eq!(controller.memory().len(), 1, "autopilot jumps are not recorded");
}

#[test]
fn imitation_requires_ground_contact() {
    let mut controller = record_jump(controller(), 100.0, 150.0);
    controller.set_mode(PilotMode::Autopilot);

    let mut controller = controller.with_state(100.0, 10.0);
    let step = controller.update(DT, false, false, Some(150.0));
    assert_eq!(step.jump, None);
}

#[test]
fn toggling_twice_restores_behaviour() {
    let base = record_jump(controller(), 380.0, 150.0);

    let mut untouched = base.clone().with_state(380.0, 0.0);
    let mut toggled = base.with_state(380.0, 0.0);
    let _ = toggled.toggle_autopilot();
    let _ = toggled.toggle_autopilot();
    assert_eq!(toggled.mode(), PilotMode::Manual);

    for (jump_requested, grounded, distance) in [
        (false, true, Some(150.0)),
        (true, true, Some(150.0)),
        (false, false, None),
        (true, false, Some(90.0)),
    ] {
        let expected = untouched.update(DT, jump_requested, grounded, distance);
        let actual = toggled.update(DT, jump_requested, grounded, distance);
        assert_eq!(actual, expected);
    }
    assert_eq!(toggled.memory().to_vec(), untouched.memory().to_vec());
}

#[test]
fn grounded_character_rests_in_place() {
    let mut controller = controller().with_state(380.0, 0.0);
    for _ in 0..10 {
        let step = controller.update(DT, false, true, None);
        assert_eq!(step.pose.y, 380.0);
        assert_eq!(step.pose.velocity_y, 0.0);
    }
}

#[test]
fn settle_keeps_velocity() {
    let mut controller = controller().with_state(380.004, 120.0);
    controller.settle(380.0);
    assert_eq!(controller.pose().y, 380.0);
    assert_eq!(controller.pose().velocity_y, 120.0);

    let step = controller.update(DT, false, true, None);
    assert_eq!(step.pose.velocity_y, 0.0, "landing velocity is clamped next tick");
}

proptest! {
    #[test]
    fn memory_never_exceeds_capacity(jumps in 0usize..200) {
        let mut controller = controller();
        for jump in 0..jumps {
            let mut next = controller.with_state(380.0, 0.0);
            let _ = next.update(DT, true, true, Some(jump as f32));
            prop_assert!(next.memory().len() <= 50);
            controller = next;
        }
        prop_assert_eq!(controller.memory().len(), jumps.min(50));
    }

    #[test]
    fn grounded_clamp_zeroes_downward_velocity(velocity in 0.001f32..5_000.0, millis in 1u64..100) {
        let mut controller = controller().with_state(380.0, velocity);
        let step = controller.update(Duration::from_millis(millis), false, true, None);
        prop_assert_eq!(step.pose.velocity_y, 0.0);
        prop_assert_eq!(step.pose.y, 380.0);
    }

    #[test]
    fn airborne_velocity_grows_by_gravity(velocity in -1_000.0f32..1_000.0, millis in 1u64..100) {
        let dt = Duration::from_millis(millis);
        let mut controller = controller().with_state(200.0, velocity);
        let step = controller.update(dt, true, false, Some(50.0));
        let expected = velocity + 900.0 * dt.as_secs_f32();
        prop_assert_eq!(step.pose.velocity_y, expected);
        prop_assert!(step.pose.velocity_y > velocity);
        prop_assert_eq!(step.jump, None);
    }
}

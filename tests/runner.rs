// Integration tests (native) for the ragdoll runner.
// These drive the public simulation API only; no browser APIs are touched.

use canvas_arcade::{DriveInput, RunnerParams, RunnerSim, StepOutcome};

fn within(angle: f64, min_deg: f64, max_deg: f64) -> bool {
    angle >= min_deg.to_radians() - 1e-12 && angle <= max_deg.to_radians() + 1e-12
}

// Cheap deterministic key mashing.
fn mash(step: u64) -> DriveInput {
    let h = step.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(17);
    DriveInput {
        left_thigh: h & 1 != 0,
        right_thigh: h & 2 != 0,
        left_calf: h & 4 != 0,
        right_calf: h & 8 != 0,
    }
}

#[test]
fn joint_angles_never_leave_their_ranges() {
    let mut sim = RunnerSim::default();
    for step in 0..3000 {
        if sim.is_game_over() {
            sim.reset();
        }
        sim.step(&mash(step / 7));
        let b = sim.body();
        for leg in [&b.left, &b.right] {
            assert!(within(leg.thigh.angle, -60.0, 90.0), "thigh {} at step {step}", leg.thigh.angle);
            assert!(within(leg.calf.angle, -9.0, 90.0), "calf {} at step {step}", leg.calf.angle);
        }
    }
}

#[test]
fn grounded_feet_never_sink_below_ground() {
    let mut sim = RunnerSim::default();
    let ground = sim.params().ground_y;
    for step in 0..3000 {
        if sim.is_game_over() {
            sim.reset();
        }
        sim.step(&mash(step / 11));
        let pose = sim.pose();
        let b = sim.body();
        for (contact, foot) in [(b.left.contact, pose.left.foot), (b.right.contact, pose.right.foot)] {
            if contact {
                assert!(foot.y <= ground + 1e-9, "foot at {} below ground at step {step}", foot.y);
            }
        }
    }
}

#[test]
fn distance_never_decreases_within_a_run() {
    let mut sim = RunnerSim::default();
    let mut last = 0;
    for step in 0..2000 {
        if sim.step(&mash(step / 5)) != StepOutcome::Running {
            break;
        }
        assert!(sim.distance() >= last);
        last = sim.distance();
    }
}

#[test]
fn knees_and_feet_follow_the_hip() {
    let mut sim = RunnerSim::default();
    for step in 0..50 {
        sim.step(&mash(step));
        let p = sim.params();
        let pose = sim.pose();
        for leg in [pose.left, pose.right] {
            let thigh = (leg.knee.x - pose.hip.x).hypot(leg.knee.y - pose.hip.y);
            let calf = (leg.foot.x - leg.knee.x).hypot(leg.foot.y - leg.knee.y);
            assert!((thigh - p.thigh_length).abs() < 1e-9);
            assert!((calf - p.calf_length).abs() < 1e-9);
        }
    }
}

#[test]
fn fallen_runner_is_frozen() {
    let mut sim = RunnerSim::default();
    let mut steps = 0;
    while !sim.is_game_over() && steps < 1000 {
        sim.step(&DriveInput::ALL);
        steps += 1;
    }
    assert!(sim.is_game_over());
    let frozen = sim.body().clone();
    let distance = sim.distance();
    let reason = sim.fall_reason().unwrap();
    for _ in 0..20 {
        assert_eq!(sim.step(&DriveInput::ALL), StepOutcome::Fallen(reason));
        assert_eq!(sim.step(&DriveInput::NONE), StepOutcome::Fallen(reason));
    }
    assert_eq!(sim.body(), &frozen);
    assert_eq!(sim.distance(), distance);
}

#[test]
fn reset_restores_the_starting_state() {
    let mut sim = RunnerSim::default();
    for step in 0..400 {
        sim.step(&mash(step));
    }
    sim.reset();
    let p = sim.params().clone();
    let b = sim.body();
    assert_eq!((b.hip.x, b.hip.y), (p.start_x, p.start_y));
    assert_eq!((b.hip_velocity.x, b.hip_velocity.y), (0.0, 0.0));
    for leg in [&b.left, &b.right] {
        assert_eq!(leg.thigh.velocity, 0.0);
        assert_eq!(leg.calf.velocity, 0.0);
    }
    assert_eq!(b.rotation, 0.0);
    assert_eq!(b.rotation_velocity, 0.0);
    assert!(!sim.is_game_over());
    assert_eq!(sim.distance(), 0);
    assert_eq!(sim.steps(), 0);
}

#[test]
fn idle_runner_stays_upright() {
    let mut sim = RunnerSim::default();
    for _ in 0..200 {
        assert_eq!(sim.step(&DriveInput::NONE), StepOutcome::Running);
    }
    assert!(sim.body().rotation.abs() < 1e-6);
    assert!(!sim.is_game_over());
    // The stock pose settles onto both feet, and grounded feet push.
    assert!(sim.body().left.contact && sim.body().right.contact);
    assert!(sim.body().hip_velocity.x > 0.0);
}

#[test]
fn idle_runner_with_feet_off_the_ground_goes_nowhere() {
    // Ground far below: a free fall with no contact, so no push and no tumble.
    let params = RunnerParams { ground_y: 10_000.0, ..RunnerParams::default() };
    let mut sim = RunnerSim::new(params);
    for _ in 0..50 {
        sim.step(&DriveInput::NONE);
    }
    assert!(!sim.body().grounded());
    assert_eq!(sim.distance(), 0);
    assert_eq!(sim.body().rotation, 0.0);
}

#[test]
fn driving_every_joint_ends_the_run() {
    let mut sim = RunnerSim::default();
    let fell = (0..500).any(|_| sim.step(&DriveInput::ALL) != StepOutcome::Running);
    assert!(fell);
    assert!(sim.is_game_over());
}

#[test]
fn held_thigh_stops_at_its_limit() {
    let mut sim = RunnerSim::default();
    let hold = DriveInput { left_thigh: true, ..DriveInput::NONE };
    let max = sim.params().thigh_range.max_rad();
    for _ in 0..40 {
        assert_eq!(sim.step(&hold), StepOutcome::Running);
        assert!(sim.body().left.thigh.angle <= max + 1e-12);
    }
    let thigh = sim.body().left.thigh;
    assert!((thigh.angle - max).abs() < 1e-12);
    // The clip does not touch the velocity; it keeps pushing into the stop.
    assert!(thigh.velocity > 0.1);

    for _ in 0..40 {
        sim.step(&DriveInput::NONE);
    }
    let thigh = sim.body().left.thigh;
    assert!((thigh.angle - max).abs() < 1e-12);
    assert!(thigh.velocity < 0.01);
}

#[test]
fn held_calf_stops_at_its_limit() {
    let mut sim = RunnerSim::default();
    let hold = DriveInput { right_calf: true, ..DriveInput::NONE };
    let max = sim.params().calf_range.max_rad();
    for _ in 0..40 {
        sim.step(&hold);
        assert!(sim.body().right.calf.angle <= max + 1e-12);
    }
    assert!((sim.body().right.calf.angle - max).abs() < 1e-12);
}

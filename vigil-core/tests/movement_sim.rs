//! End-to-end movement simulation scenarios over a flat test world.

mod common;

use common::{run_mirrored, FlatCodec, Harness, ScriptStep};
use glam::{Vec2, Vec3};
use vigil_core::SessionConfig;
use vigil_protocol::packets::input_flags;

const IDLE: ScriptStep = (Vec2::ZERO, 0);

fn idle_steps(n: usize) -> Vec<ScriptStep> {
    vec![IDLE; n]
}

#[test]
fn clean_jump_peaks_and_lands_without_correction() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let mut script = idle_steps(5);
    // One tick of jump input, then hands off the keys.
    script.push((Vec2::ZERO, input_flags::JUMP_DOWN | input_flags::START_JUMPING));
    script.extend(idle_steps(20));

    let (replay, trajectory) = run_mirrored(
        || FlatCodec::new(64),
        spawn,
        SessionConfig::default(),
        &script,
    );

    let jump_tick = 5;
    let peak = trajectory[jump_tick..]
        .iter()
        .map(|(p, _)| p.y)
        .fold(f32::MIN, f32::max);
    assert!(
        (peak - (65.0 + 1.252)).abs() < 0.01,
        "jump peak was {peak}, expected 65 + 1.252"
    );
    // The peak is reached within 8 ticks of the jump.
    let peak_offset = trajectory[jump_tick..]
        .iter()
        .position(|(p, _)| (p.y - peak).abs() < 1e-6)
        .unwrap();
    assert!(peak_offset <= 8, "peak came {peak_offset} ticks after the jump");

    // Landed back on the floor within 15 ticks of the jump, grounded.
    let landed_offset = trajectory[jump_tick + peak_offset..]
        .iter()
        .position(|(p, _)| (p.y - 65.0).abs() < 1e-4)
        .expect("the jump must land");
    assert!(peak_offset + landed_offset <= 15);
    let grounded = replay.session.with_player(|p| p.movement.on_ground);
    assert!(grounded, "the player must be grounded after landing");

    assert_eq!(replay.sink.corrections(), 0, "an honest jump is never corrected");
}

#[test]
fn sneaking_never_walks_off_a_one_block_floor() {
    // The floor exists only in the x = 0 block cell; everything else is a
    // drop. The player strafes towards +X while sneaking; the edge
    // back-off must keep its box overlapping the floor.
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let codec = || {
        let mut codec = FlatCodec::new(64);
        codec.only_x = Some(0);
        codec
    };

    let sneak = input_flags::SNEAK_DOWN | input_flags::START_SNEAKING;
    let mut script: Vec<ScriptStep> = vec![(Vec2::ZERO, sneak); 3];
    script.extend(vec![
        (Vec2::new(0.98, 0.0), input_flags::SNEAK_DOWN);
        30
    ]);

    let (replay, trajectory) = run_mirrored(codec, spawn, SessionConfig::default(), &script);

    for (position, _) in &trajectory {
        assert!(
            position.x - 0.3 < 1.0,
            "sneaking player's box left the floor at x = {}",
            position.x
        );
        assert!(
            (position.y - 65.0).abs() < 1e-4,
            "sneaking player fell off the floor to y = {}",
            position.y
        );
    }

    // The walk converges instead of creeping over the edge forever.
    let (last, _) = trajectory[trajectory.len() - 1];
    let (prev, _) = trajectory[trajectory.len() - 2];
    assert!((last.x - prev.x).abs() < 1e-3, "sneak walk must stall at the edge");
    assert_eq!(replay.sink.corrections(), 0);
}

#[test]
fn step_up_climbs_a_half_step_and_decays_the_clip_offset() {
    // A half-height step two cells ahead on the +X walk line; low enough
    // for the 0.6 step height, so the walk flows onto it without a jump.
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let codec = || {
        let mut codec = FlatCodec::new(64);
        codec.extra = vec![(2, 65, 0, common::SLAB)];
        codec
    };

    let mut script = idle_steps(3);
    script.extend(vec![(Vec2::new(0.98, 0.0), 0); 12]);
    script.extend(idle_steps(12));

    let (replay, trajectory) = run_mirrored(codec, spawn, SessionConfig::default(), &script);

    let max_y = trajectory.iter().map(|(p, _)| p.y).fold(f32::MIN, f32::max);
    assert!(
        (max_y - 65.5).abs() < 1e-3,
        "player should step onto the lip at y = 65.5, reached {max_y}"
    );

    let clipped = trajectory.iter().any(|(p, _)| p.y > 65.0 + 1e-3);
    assert!(clipped, "the ascent must pass through stepped positions");

    let clip = replay.session.with_player(|p| p.movement.step_clip_offset);
    assert!(
        clip < 1e-4,
        "step-clip offset must decay after the step, still {clip}"
    );
    assert_eq!(replay.sink.corrections(), 0);
}

#[test]
fn deadzone_zeroes_a_tiny_seeded_velocity() {
    use vigil_protocol::packets::{ServerPacket, SetActorMotion};

    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());
    harness.session.set_detections(vec![]);
    for _ in 0..3 {
        harness.honest_input(Vec2::ZERO, 0);
    }

    // An impulse below the deadzone: applied on the next step, then
    // zeroed outright rather than decaying forever.
    harness.server(ServerPacket::SetActorMotion(SetActorMotion {
        entity_runtime_id: common::SELF_RUNTIME_ID,
        velocity: Vec3::new(0.002, 0.0, 0.002),
        tick: 0,
    }));
    harness.ack_last_probe();
    harness.honest_input(Vec2::ZERO, 0);
    harness.honest_input(Vec2::ZERO, 0);

    let velocity = harness.session.with_player(|p| p.movement.server_movement);
    assert_eq!(velocity.x, 0.0);
    assert_eq!(velocity.z, 0.0);
}

#[test]
fn liquid_contact_suppresses_corrections() {
    // The player stands in a pool; whatever it reports is adopted.
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let codec = {
        let mut codec = FlatCodec::new(64);
        codec.extra = vec![(0, 65, 0, common::WATER)];
        codec
    };
    let harness = Harness::ready(codec, spawn, SessionConfig::default());
    harness.session.set_detections(vec![]);

    // Oscillate between two claims 0.4 blocks apart, both inside the
    // pool. Dry, this would be corrected every input; in a liquid the
    // prediction snaps to the claim instead.
    for i in 0..10 {
        let claim = spawn + Vec3::new(0.4 * (i % 2) as f32, 0.0, 0.0);
        harness.input(claim, Vec3::new(0.4, 0.0, 0.0), Vec2::ZERO, 0);
    }

    let unsupported = harness
        .session
        .with_player(|p| p.movement.in_unsupported_rewind_scenario);
    assert!(unsupported, "liquid contact must mark the unsupported scenario");
    assert_eq!(harness.sink.corrections(), 0);
}

#[test]
fn divergence_beyond_threshold_is_corrected() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());
    harness.session.set_detections(vec![]);

    // Settle the simulation honestly first.
    for _ in 0..4 {
        harness.honest_input(Vec2::ZERO, 0);
    }
    assert_eq!(harness.sink.corrections(), 0);

    // Then claim a position a full block away from the prediction.
    let feet = harness.server_feet();
    harness.input(feet + Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, Vec2::ZERO, 0);
    assert!(
        harness.sink.corrections() >= 1,
        "a one-block divergence must trigger a correction"
    );
}

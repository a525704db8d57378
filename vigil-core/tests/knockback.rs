//! Knockback round-trip scenarios for the velocity checks.

mod common;

use common::{FlatCodec, Harness, SELF_RUNTIME_ID};
use glam::{Vec2, Vec3};
use vigil_core::detection::velocity_b::VelocityB;
use vigil_core::session::events::EVENT_FLAGGED;
use vigil_core::SessionConfig;
use vigil_protocol::packets::{ServerPacket, SetActorMotion};

const IMPULSE: Vec3 = Vec3::new(0.4, 0.0, 0.3);

fn knockback_harness() -> Harness {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());
    harness.session.set_detections(vec![Box::new(VelocityB::new())]);
    // Settle the simulation before throwing impulses at it.
    for _ in 0..5 {
        harness.honest_input(Vec2::ZERO, 0);
    }
    harness
}

fn send_knockback(harness: &Harness, velocity: Vec3) {
    harness.server(ServerPacket::SetActorMotion(SetActorMotion {
        entity_runtime_id: SELF_RUNTIME_ID,
        velocity,
        tick: 0,
    }));
    harness.ack_last_probe();
}

fn flagged_events(harness: &Harness) -> usize {
    harness
        .control
        .events
        .lock()
        .iter()
        .filter(|e| e.identifier == EVENT_FLAGGED)
        .count()
}

#[test]
fn honest_knockback_replay_does_not_flag() {
    let harness = knockback_harness();

    // The client applies each impulse in full, so its reported movement is
    // exactly what the simulation predicts.
    let mut client_feet = harness.server_feet();
    for _ in 0..5 {
        send_knockback(&harness, IMPULSE);
        client_feet += IMPULSE;
        harness.input(client_feet, IMPULSE, Vec2::ZERO, 0);
    }

    assert_eq!(flagged_events(&harness), 0, "an honest replay must not flag");
    assert!(!harness.session.is_closed());
}

#[test]
fn halved_knockback_flags_after_three_offending_inputs() {
    let harness = knockback_harness();

    // The client swallows half of every impulse.
    let half = IMPULSE * 0.5;
    let mut client_feet = harness.server_feet();
    for _ in 0..3 {
        send_knockback(&harness, IMPULSE);
        client_feet += half;
        harness.input(client_feet, half, Vec2::ZERO, 0);
    }

    assert_eq!(
        flagged_events(&harness),
        1,
        "the third offending input must emit exactly one flag event"
    );

    let event = harness
        .control
        .events
        .lock()
        .iter()
        .find(|e| e.identifier == EVENT_FLAGGED)
        .cloned()
        .unwrap();
    let extra = event.data["extra"].as_str().unwrap();
    assert!(extra.contains("x=0.5"), "ratio x missing from {extra}");
    assert!(extra.contains("z=0.5"), "ratio z missing from {extra}");
    assert_eq!(event.data["check_main"], "Velocity");
    assert_eq!(event.data["check_sub"], "B");
}

#[test]
fn knockback_during_teleport_is_exempt() {
    let harness = knockback_harness();

    let half = IMPULSE * 0.5;
    let mut client_feet = harness.server_feet();
    for _ in 0..5 {
        send_knockback(&harness, IMPULSE);
        harness.session.with_player(|p| p.movement.teleporting = true);
        client_feet += half;
        harness.input(client_feet, half, Vec2::ZERO, 0);
    }

    assert_eq!(flagged_events(&harness), 0, "teleporting inputs are exempt");
}

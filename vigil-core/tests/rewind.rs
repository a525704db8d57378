//! Entity tracking, acknowledgement gating and rewind-backed reach checks.

mod common;

use common::{FlatCodec, Harness};
use glam::{Vec2, Vec3};
use vigil_core::config::AuthorityMode;
use vigil_core::detection::reach_a::ReachA;
use vigil_core::session::events::EVENT_FLAGGED;
use vigil_core::SessionConfig;
use vigil_protocol::packets::{
    ActorMetadata, AddPlayer, ClientPacket, InventoryTransaction, MovePlayer, ServerPacket,
    TransactionData, MOVE_PLAYER_MODE_NORMAL,
};

const TARGET_RID: u64 = 7;

fn add_player_packet(feet: Vec3) -> ServerPacket {
    ServerPacket::AddPlayer(AddPlayer {
        uuid: "00000000-0000-0000-0000-000000000007".to_string(),
        username: "Target".to_string(),
        entity_runtime_id: TARGET_RID,
        position: feet + Vec3::new(0.0, 1.62, 0.0),
        velocity: Vec3::ZERO,
        pitch: 0.0,
        yaw: 0.0,
        head_yaw: 0.0,
        metadata: ActorMetadata::default(),
    })
}

fn attack(harness: &Harness) {
    harness.client(ClientPacket::InventoryTransaction(InventoryTransaction {
        data: TransactionData::UseItemOnEntity {
            target_entity_runtime_id: TARGET_RID,
            action_type: 1,
            click_position: Vec3::ZERO,
        },
    }));
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
fn entity_spawns_land_only_after_the_client_ack() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());

    let mut packet = add_player_packet(Vec3::new(2.5, 65.0, 0.5));
    harness.session.handle_server(&mut packet);

    let before = harness
        .session
        .with_player(|p| p.entities.find(TARGET_RID).is_some());
    assert!(!before, "the spawn must wait for the client ack");

    harness.ack_last_probe();
    let after = harness
        .session
        .with_player(|p| p.entities.find(TARGET_RID).map(|e| e.position));
    let position = after.expect("entity must exist after the ack");
    assert!((position.y - 65.0).abs() < 1e-5, "player samples store feet, got {position:?}");
}

#[test]
fn semi_authority_defers_moves_until_the_ack() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let config = SessionConfig {
        authority: AuthorityMode::Semi,
        ..SessionConfig::default()
    };
    let harness = Harness::ready(FlatCodec::new(64), spawn, config);
    harness.session.set_detections(vec![]);

    harness.server(add_player_packet(Vec3::new(2.5, 65.0, 0.5)));
    harness.ack_last_probe();

    harness.server(ServerPacket::MovePlayer(MovePlayer {
        entity_runtime_id: TARGET_RID,
        position: Vec3::new(6.5, 66.62, 0.5),
        pitch: 0.0,
        yaw: 0.0,
        head_yaw: 0.0,
        mode: MOVE_PLAYER_MODE_NORMAL,
        on_ground: true,
        ridden_entity_runtime_id: 0,
        tick: 0,
    }));

    let stale = harness
        .session
        .with_player(|p| p.entities.find(TARGET_RID).unwrap().position);
    assert!((stale.x - 2.5).abs() < 1e-5, "move must wait for the ack");

    harness.ack_last_probe();
    let fresh = harness
        .session
        .with_player(|p| p.entities.find(TARGET_RID).unwrap().position);
    assert!((fresh.x - 6.5).abs() < 1e-5, "move must land after the ack");
}

#[test]
fn close_range_attacks_do_not_flag() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());
    harness.session.set_detections(vec![Box::new(ReachA::new())]);

    harness.server(add_player_packet(Vec3::new(2.5, 65.0, 0.5)));
    harness.ack_last_probe();

    // A few inputs so the rewind ring has samples at the click tick.
    for _ in 0..4 {
        harness.honest_input(Vec2::ZERO, 0);
    }

    for _ in 0..5 {
        attack(&harness);
    }
    assert_eq!(flagged_events(&harness), 0);
}

#[test]
fn attacks_beyond_reach_flag_through_the_rewound_position() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());
    harness.session.set_detections(vec![Box::new(ReachA::new())]);

    harness.server(add_player_packet(Vec3::new(5.5, 65.0, 0.5)));
    harness.ack_last_probe();

    for _ in 0..4 {
        harness.honest_input(Vec2::ZERO, 0);
    }

    // Fail buffer is 2: the second long-range hit crosses it.
    attack(&harness);
    assert_eq!(flagged_events(&harness), 0, "one hit stays inside the buffer");
    attack(&harness);
    assert_eq!(flagged_events(&harness), 1, "sustained long reach must flag");
}

//! World shadow maintenance through the packet surface.

mod common;

use bytes::Bytes;
use common::{FlatCodec, Harness, STONE};
use glam::{IVec3, Vec2, Vec3};
use vigil_core::error::DisconnectReason;
use vigil_core::SessionConfig;
use vigil_protocol::packets::{ChunkPos, LevelChunk, ServerPacket, UpdateBlock};

fn chunk_packet(pos: ChunkPos, payload: &'static [u8], cache_enabled: bool) -> ServerPacket {
    ServerPacket::LevelChunk(LevelChunk {
        position: pos,
        sub_chunk_count: 24,
        cache_enabled,
        payload: Bytes::from_static(payload),
    })
}

#[test]
fn distant_chunks_are_evicted_on_input() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());
    harness.session.set_detections(vec![]);

    harness.server(chunk_packet(ChunkPos::new(40, 0), &[0x01], false));
    harness.ack_last_probe();
    assert!(harness
        .session
        .with_player(|p| p.world.chunk_loaded(ChunkPos::new(40, 0))));

    // The next input cleans chunks outside radius + slack around the
    // player's chunk; column (40, 0) is far outside.
    harness.honest_input(Vec2::ZERO, 0);
    harness.session.with_player(|p| {
        assert!(!p.world.chunk_loaded(ChunkPos::new(40, 0)));
        assert!(p.world.chunk_loaded(ChunkPos::new(0, 0)), "nearby columns stay");
    });
}

#[test]
fn block_overrides_shadow_the_column() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());

    harness.server(ServerPacket::UpdateBlock(UpdateBlock {
        position: IVec3::new(3, 70, 3),
        new_block_runtime_id: STONE,
        flags: 0,
        layer: 0,
    }));
    harness.ack_last_probe();

    harness.session.with_player(|p| {
        assert_eq!(p.world.block_at(IVec3::new(3, 70, 3)), STONE);
        // A re-sent column supersedes the override.
        assert_eq!(p.world.block_at(IVec3::new(3, 64, 3)), STONE);
    });

    harness.server(chunk_packet(ChunkPos::new(0, 0), &[0x01], false));
    harness.ack_last_probe();
    harness.session.with_player(|p| {
        assert_eq!(
            p.world.block_at(IVec3::new(3, 70, 3)),
            vigil_core::block::AIR_RUNTIME_ID
        );
    });
}

#[test]
fn cache_enabled_chunks_disconnect_the_session() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());

    harness.server(chunk_packet(ChunkPos::new(2, 2), &[0x01], true));
    harness.ack_last_probe();

    assert!(harness.session.is_closed());
    assert_eq!(
        harness.sink.disconnect_message().as_deref(),
        Some(DisconnectReason::ChunkCacheUnsupported.to_string().as_str())
    );
}

#[test]
fn undecodable_chunks_disconnect_with_the_decode_error() {
    let spawn = Vec3::new(0.5, 65.0, 0.5);
    let harness = Harness::ready(FlatCodec::new(64), spawn, SessionConfig::default());

    // The test codec fails on an 0xFF payload.
    harness.server(chunk_packet(ChunkPos::new(2, 2), &[0xFF], false));
    harness.ack_last_probe();

    assert!(harness.session.is_closed());
    let message = harness.sink.disconnect_message().unwrap();
    assert!(
        message.contains("failed to decode chunk"),
        "unexpected reason: {message}"
    );
    assert!(message.contains("truncated palette"));
}

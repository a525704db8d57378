//! Shared fixtures: a recording transport, a flat-world chunk codec and a
//! minimal block table.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use glam::{Vec2, Vec3};
use vigil_core::block::{BlockInfo, BlockTable, ChunkCodec, ChunkColumn, AIR_RUNTIME_ID};
use vigil_core::error::ChunkDecodeError;
use vigil_core::session::{events::RemoteEvent, ControlSink, PacketSink};
use vigil_core::{Session, SessionConfig};
use vigil_protocol::packets::{
    ChunkPos, ClientPacket, LevelChunk, NetworkStackLatency, PlayerAuthInput, PlayerMovementMode,
    PlayerMovementSettings, ServerPacket, StartGame,
};
use vigil_utils::locks::SyncMutex;

pub const STONE: u32 = 1;
pub const LADDER: u32 = 2;
pub const WATER: u32 = 3;
pub const SLAB: u32 = 4;

/// Registers the test block set. Safe to call from every test.
pub fn setup_blocks() {
    let mut table = BlockTable::new();
    table.insert(STONE, BlockInfo::solid("minecraft:stone"));
    table.insert(LADDER, BlockInfo::climbable("minecraft:ladder"));
    table.insert(WATER, BlockInfo::liquid("minecraft:water"));
    table.insert(SLAB, BlockInfo::slab("minecraft:stone_slab"));
    // Another test binary thread may have won the race; the table is the
    // same either way.
    let _ = BlockTable::init(table);
}

/// Records everything written towards the client.
#[derive(Default)]
pub struct RecordingSink {
    pub packets: SyncMutex<Vec<ServerPacket>>,
    pub closed: AtomicBool,
}

impl PacketSink for RecordingSink {
    fn write_packet(&self, packet: &ServerPacket) -> std::io::Result<()> {
        self.packets.lock().push(packet.clone());
        Ok(())
    }

    fn latency_ms(&self) -> i64 {
        20
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl RecordingSink {
    pub fn drain(&self) -> Vec<ServerPacket> {
        std::mem::take(&mut *self.packets.lock())
    }

    /// The most recent probe timestamp sent to the client.
    pub fn last_probe(&self) -> Option<i64> {
        self.packets.lock().iter().rev().find_map(|p| match p {
            ServerPacket::NetworkStackLatency(probe) if probe.needs_response => {
                Some(probe.timestamp)
            }
            _ => None,
        })
    }

    pub fn corrections(&self) -> usize {
        self.packets
            .lock()
            .iter()
            .filter(|p| matches!(p, ServerPacket::CorrectPlayerMovePrediction(_)))
            .count()
    }

    pub fn disconnect_message(&self) -> Option<String> {
        self.packets.lock().iter().rev().find_map(|p| match p {
            ServerPacket::Disconnect(d) => Some(d.message.clone()),
            _ => None,
        })
    }
}

/// Records remote events sent upstream.
#[derive(Default)]
pub struct RecordingControl {
    pub events: SyncMutex<Vec<RemoteEvent>>,
}

impl ControlSink for RecordingControl {
    fn send_remote_event(&self, event: &RemoteEvent) {
        self.events.lock().push(event.clone());
    }
}

/// A column with stone up to and including `surface`, a configurable set of
/// extra cells, and air elsewhere.
pub struct FlatColumn {
    pub surface: i32,
    pub extra: Vec<(u8, i32, u8, u32)>,
    pub only_x: Option<u8>,
}

impl ChunkColumn for FlatColumn {
    fn block(&self, x: u8, y: i32, z: u8) -> u32 {
        for (ex, ey, ez, id) in &self.extra {
            if *ex == x && *ey == y && *ez == z {
                return *id;
            }
        }
        if let Some(only_x) = self.only_x {
            if x != only_x {
                return AIR_RUNTIME_ID;
            }
        }
        if y <= self.surface {
            STONE
        } else {
            AIR_RUNTIME_ID
        }
    }
}

/// Chunk codec for tests: the payload's first byte selects the column
/// shape. A payload of `[0xFF]` fails to decode.
pub struct FlatCodec {
    pub surface: i32,
    pub extra: Vec<(u8, i32, u8, u32)>,
    pub only_x: Option<u8>,
}

impl FlatCodec {
    pub fn new(surface: i32) -> Self {
        Self {
            surface,
            extra: Vec::new(),
            only_x: None,
        }
    }
}

impl ChunkCodec for FlatCodec {
    fn decode(
        &self,
        payload: &[u8],
        _sub_chunk_count: u32,
        _scratch: &mut Vec<u8>,
    ) -> Result<Box<dyn ChunkColumn>, ChunkDecodeError> {
        if payload == [0xFF] {
            return Err(ChunkDecodeError("truncated palette".to_string()));
        }
        Ok(Box::new(FlatColumn {
            surface: self.surface,
            extra: self.extra.clone(),
            only_x: self.only_x,
        }))
    }

    fn apply_sub_chunk(
        &self,
        _column: Option<Box<dyn ChunkColumn>>,
        _y_index: i8,
        payload: &[u8],
        _scratch: &mut Vec<u8>,
    ) -> Result<Box<dyn ChunkColumn>, ChunkDecodeError> {
        if payload == [0xFF] {
            return Err(ChunkDecodeError("truncated palette".to_string()));
        }
        Ok(Box::new(FlatColumn {
            surface: self.surface,
            extra: self.extra.clone(),
            only_x: self.only_x,
        }))
    }
}

/// A session plus its recording sinks.
pub struct Harness {
    pub session: Session,
    pub sink: Arc<RecordingSink>,
    pub control: Arc<RecordingControl>,
}

pub const SELF_RUNTIME_ID: u64 = 1;
pub const SELF_UNIQUE_ID: i64 = 1;

impl Harness {
    /// Builds a ready-to-simulate session: flat world at `surface`, world
    /// joined at `spawn_feet`, first chunk acked, loaded-chunk grace
    /// already served.
    pub fn ready(codec: FlatCodec, spawn_feet: Vec3, config: SessionConfig) -> Self {
        setup_blocks();
        let sink = Arc::new(RecordingSink::default());
        let control = Arc::new(RecordingControl::default());
        let session = Session::new(
            "Steve",
            sink.clone(),
            control.clone(),
            Arc::new(codec),
            config,
        );
        let harness = Self {
            session,
            sink,
            control,
        };

        harness.server(ServerPacket::StartGame(StartGame {
            entity_unique_id: SELF_UNIQUE_ID,
            entity_runtime_id: SELF_RUNTIME_ID,
            player_game_mode: 0,
            player_position: spawn_feet + Vec3::new(0.0, 1.62, 0.0),
            pitch: 0.0,
            yaw: 0.0,
            movement_settings: PlayerMovementSettings {
                movement_type: PlayerMovementMode::Server,
                rewind_history_size: 0,
                server_authoritative_block_breaking: false,
            },
        }));

        // Deliver the spawn chunk and every neighbour the player can reach
        // during a test, then ack them.
        let spawn_chunk = ChunkPos::new(
            (spawn_feet.x / 16.0).floor() as i32,
            (spawn_feet.z / 16.0).floor() as i32,
        );
        for dx in -1..=1 {
            for dz in -1..=1 {
                harness.server(ServerPacket::LevelChunk(LevelChunk {
                    position: ChunkPos::new(spawn_chunk.x + dx, spawn_chunk.y + dz),
                    sub_chunk_count: 24,
                    cache_enabled: false,
                    payload: Bytes::from_static(&[0x01]),
                }));
                harness.ack_last_probe();
            }
        }

        harness.session.with_player(|p| {
            assert!(p.ready, "chunk ack must mark the session ready");
            p.in_loaded_chunk_ticks = 120;
        });
        harness
    }

    pub fn server(&self, mut packet: ServerPacket) {
        self.session.handle_server(&mut packet);
    }

    pub fn client(&self, mut packet: ClientPacket) {
        self.session.handle_client(&mut packet);
    }

    /// Echoes the latest probe back, executing its deferred batch.
    pub fn ack_last_probe(&self) {
        let ts = self.sink.last_probe().expect("a probe must have been sent");
        self.client(ClientPacket::NetworkStackLatency(NetworkStackLatency {
            timestamp: ts,
            needs_response: false,
        }));
    }

    /// Sends one authoritative input with the client mirroring `feet` and
    /// `delta`, holding `flags` and pushing `move_vector`.
    pub fn input(&self, feet: Vec3, delta: Vec3, move_vector: Vec2, flags: u64) {
        let tick = self.session.with_player(|p| p.client_tick);
        self.client(ClientPacket::PlayerAuthInput(PlayerAuthInput {
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            position: feet + Vec3::new(0.0, 1.62, 0.0),
            move_vector,
            input_data: flags,
            input_mode: 1,
            delta,
            tick: tick + 1,
        }));
    }

    /// Sends one input that honestly mirrors the server's own prediction,
    /// as a vanilla client tracking the simulation would.
    pub fn honest_input(&self, move_vector: Vec2, flags: u64) {
        let (feet, delta) = self
            .session
            .with_player(|p| (p.movement.server_position, p.movement.server_movement));
        self.input(feet, delta, move_vector, flags);
    }

    pub fn server_feet(&self) -> Vec3 {
        self.session.with_player(|p| p.movement.server_position)
    }
}

/// One scripted input: a move vector and the held input flags.
pub type ScriptStep = (Vec2, u64);

/// Drives `script` twice: a first pass records the simulated trajectory,
/// a second identical session replays it with the client reporting exactly
/// that trajectory, the way a vanilla client running the same physics
/// would. Returns the second harness and the per-tick `(position,
/// velocity)` trajectory.
///
/// The simulated path depends only on the world and the inputs, never on
/// the client-reported positions (outside exempt snaps), so both passes
/// produce bit-identical predictions.
pub fn run_mirrored(
    codec: impl Fn() -> FlatCodec,
    spawn_feet: Vec3,
    config: SessionConfig,
    script: &[ScriptStep],
) -> (Harness, Vec<(Vec3, Vec3)>) {
    let reference = Harness::ready(codec(), spawn_feet, config.clone());
    reference.session.set_detections(vec![]);
    let mut trajectory = Vec::with_capacity(script.len());
    for (move_vector, flags) in script {
        reference.honest_input(*move_vector, *flags);
        trajectory.push(
            reference
                .session
                .with_player(|p| (p.movement.server_position, p.movement.server_movement)),
        );
    }

    let replay = Harness::ready(codec(), spawn_feet, config);
    replay.session.set_detections(vec![]);
    let mut prev = spawn_feet;
    for ((move_vector, flags), (position, _)) in script.iter().zip(&trajectory) {
        replay.input(*position, *position - prev, *move_vector, *flags);
        prev = *position;
    }
    (replay, trajectory)
}

//! The acknowledgement engine.
//!
//! The client's view of the world trails the server's by a network round
//! trip. Any server-side state change the client will only observe later (a
//! freshly spawned entity, a knockback impulse still in flight) must not
//! land in the shadow state until the client has confirmed receipt of all
//! packets sent before it. The engine batches such changes as commands,
//! stamps each batch with a latency-probe timestamp, and applies the batch
//! when the client echoes that timestamp back.
//!
//! Deferred work is expressed as plain [`AckCommand`] values rather than
//! closures: a command is a pure function of its payload applied to the
//! session that owns the engine, so nothing captured can outlive the player.

use std::time::Instant;

use bytes::Bytes;
use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;
use vigil_protocol::packets::ChunkPos;

use crate::entity::Entity;

/// A deferred state mutation, applied when the client acks the probe that
/// was sent after it was registered.
pub enum AckCommand {
    /// The client finished receiving its first chunk data and the movement
    /// simulation may begin.
    PlayerInitialized,
    /// Measure the game-stack latency against the probe round trip.
    UpdateLatency {
        /// When the probe carrying this command was flushed.
        sent_at: Instant,
    },
    /// Insert a tracked entity.
    AddEntity {
        /// The entity's runtime ID.
        runtime_id: u64,
        /// The entity value to insert.
        entity: Box<Entity>,
    },
    /// Move a tracked entity.
    MoveEntity {
        /// The entity's runtime ID.
        runtime_id: u64,
        /// The new position, at eye level for players.
        position: Vec3,
    },
    /// Update the last received velocity of a tracked entity.
    EntityMotion {
        /// The entity's runtime ID.
        runtime_id: u64,
        /// The velocity the server sent.
        velocity: Vec3,
    },
    /// Resize a tracked entity's bounding box from actor metadata.
    EntityBounds {
        /// The entity's runtime ID.
        runtime_id: u64,
        /// New width, if the metadata carried one.
        width: Option<f32>,
        /// New height, if the metadata carried one.
        height: Option<f32>,
        /// New scale, if the metadata carried one.
        scale: Option<f32>,
    },
    /// Remove a tracked entity.
    RemoveEntity {
        /// The entity's runtime ID.
        runtime_id: u64,
    },
    /// Teleport the session's own player.
    SelfTeleport {
        /// The new head position.
        position: Vec3,
        /// Whether the move was an explicit teleport.
        teleport: bool,
    },
    /// Seed the session's own movement with a server-sent impulse.
    SelfMotion {
        /// The impulse velocity.
        velocity: Vec3,
    },
    /// Toggle the immobile actor flag on the session's own player.
    SelfImmobile {
        /// The new immobile state.
        immobile: bool,
    },
    /// Apply an ability update to the session's own player.
    SelfAbilities {
        /// Whether the player is flying.
        flying: bool,
        /// Whether the player clips through blocks.
        no_clip: bool,
    },
    /// Apply an attribute update to the session's own player.
    SelfAttributes {
        /// New ground movement speed, if the update carried one.
        movement_speed: Option<f32>,
        /// New death state, if the update carried a health value.
        dead: Option<bool>,
    },
    /// Apply a single-block update to the world shadow.
    SetBlock {
        /// Position of the block.
        position: IVec3,
        /// The new runtime ID.
        runtime_id: u32,
    },
    /// Decode a chunk payload and insert it into the world shadow.
    DecodeChunk {
        /// The column coordinate.
        position: ChunkPos,
        /// Sub-chunk count from the packet.
        sub_chunk_count: u32,
        /// Whether the payload needs the client cache protocol.
        cache_enabled: bool,
        /// The serialized column.
        payload: Bytes,
    },
    /// Fold a batch of sub-chunk payloads into the world shadow.
    DecodeSubChunks {
        /// Base position of the batch, in sub-chunks.
        position: IVec3,
        /// `(offset, result, payload)` triples from the packet.
        entries: Vec<([i8; 3], u8, Bytes)>,
        /// Whether the payloads need the client cache protocol.
        cache_enabled: bool,
    },
    /// Change the player's game mode.
    SetGameMode {
        /// The new game type.
        game_type: i32,
    },
    /// Apply or remove a status effect on the player.
    Effect {
        /// One of the `MOB_EFFECT_*` operations.
        operation: u8,
        /// The effect type identifier.
        effect_type: i32,
        /// Effect amplifier, zero-based.
        amplifier: i32,
        /// Remaining duration in ticks.
        duration: i32,
    },
}

/// Timestamp allocator and pending-batch store.
///
/// Timestamps are negative, odd and strictly decreasing so they can never
/// collide with timestamps the upstream server emits (positive) or the
/// even-numbered ones some clients generate themselves.
pub struct AckEngine {
    current: Vec<AckCommand>,
    pending: FxHashMap<i64, Vec<AckCommand>>,
    next_timestamp: i64,
}

impl AckEngine {
    /// Creates an engine whose first probe timestamp is −1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
            pending: FxHashMap::default(),
            next_timestamp: -1,
        }
    }

    /// Appends a command to the batch that will ride the next probe.
    pub fn defer(&mut self, cmd: AckCommand) {
        self.current.push(cmd);
    }

    /// Returns whether any commands await the next probe.
    #[must_use]
    pub fn has_batch(&self) -> bool {
        !self.current.is_empty()
    }

    /// Seals the current batch under a fresh timestamp and returns it; the
    /// caller emits the probe carrying that timestamp. Returns `None` when
    /// there is nothing to flush.
    pub fn flush(&mut self) -> Option<i64> {
        if self.current.is_empty() {
            return None;
        }
        let ts = self.allocate_timestamp();
        let previous = self.pending.insert(ts, std::mem::take(&mut self.current));
        debug_assert!(previous.is_none(), "probe timestamps are never reused");
        Some(ts)
    }

    /// Takes the batch registered under `ts`, in registration order.
    /// Returns `None` for timestamps the engine never issued (the client is
    /// echoing something that is not ours).
    pub fn execute(&mut self, ts: i64) -> Option<Vec<AckCommand>> {
        self.pending.remove(&ts)
    }

    /// Drops every batch, sealed or not, without executing anything. Called
    /// on disconnect so no deferred mutation can run after the player is
    /// gone.
    pub fn drop_all(&mut self) {
        self.current.clear();
        self.pending.clear();
    }

    /// Number of sealed batches awaiting an echo.
    #[must_use]
    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }

    fn allocate_timestamp(&mut self) -> i64 {
        let ts = self.next_timestamp;
        self.next_timestamp = -((-self.next_timestamp + 2) | 1);
        ts
    }
}

impl Default for AckEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_negative_odd_and_strictly_decreasing() {
        let mut engine = AckEngine::new();
        let mut last = 0i64;
        for _ in 0..64 {
            engine.defer(AckCommand::PlayerInitialized);
            let ts = engine.flush().unwrap();
            assert!(ts < 0, "timestamp {ts} must be negative");
            assert_eq!(ts & 1, 1, "timestamp {ts} must be odd");
            assert!(ts < last, "timestamp {ts} must decrease below {last}");
            last = ts;
        }
    }

    #[test]
    fn flush_without_commands_is_a_no_op() {
        let mut engine = AckEngine::new();
        assert_eq!(engine.flush(), None);
        assert_eq!(engine.pending_batches(), 0);
    }

    #[test]
    fn execute_drains_exactly_one_batch() {
        let mut engine = AckEngine::new();
        engine.defer(AckCommand::PlayerInitialized);
        engine.defer(AckCommand::SelfImmobile { immobile: true });
        let ts = engine.flush().unwrap();

        let batch = engine.execute(ts).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(engine.execute(ts).is_none(), "timestamps fire once");
        assert!(engine.execute(12345).is_none(), "foreign timestamps do not match");
    }

    #[test]
    fn drop_all_discards_pending_work() {
        let mut engine = AckEngine::new();
        engine.defer(AckCommand::PlayerInitialized);
        let ts = engine.flush().unwrap();
        engine.defer(AckCommand::PlayerInitialized);

        engine.drop_all();
        assert!(engine.execute(ts).is_none());
        assert!(!engine.has_batch());
    }
}

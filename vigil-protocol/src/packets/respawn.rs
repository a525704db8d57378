//! Respawn negotiation.

use glam::Vec3;

/// The server is still looking for a spawn position.
pub const RESPAWN_STATE_SEARCHING_FOR_SPAWN: u8 = 0;
/// The server picked a spawn position and is ready.
pub const RESPAWN_STATE_READY_TO_SPAWN: u8 = 1;
/// The client confirmed it is ready to spawn.
pub const RESPAWN_STATE_CLIENT_READY_TO_SPAWN: u8 = 2;

/// A step of the respawn handshake; flows in both directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Respawn {
    /// The spawn position, meaningful in the server-sent states.
    pub position: Vec3,
    /// One of the `RESPAWN_STATE_*` constants.
    pub state: u8,
    /// Runtime ID of the respawning player.
    pub entity_runtime_id: u64,
}

//! Player position updates.

use glam::Vec3;

/// Ordinary movement.
pub const MOVE_PLAYER_MODE_NORMAL: u8 = 0;
/// Position reset without interpolation.
pub const MOVE_PLAYER_MODE_RESET: u8 = 1;
/// Server-initiated teleport.
pub const MOVE_PLAYER_MODE_TELEPORT: u8 = 2;
/// Rotation-only update.
pub const MOVE_PLAYER_MODE_ROTATION: u8 = 3;

/// A player moved to an absolute position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovePlayer {
    /// Runtime ID of the moving player.
    pub entity_runtime_id: u64,
    /// The new head position.
    pub position: Vec3,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Head yaw in degrees.
    pub head_yaw: f32,
    /// One of the `MOVE_PLAYER_MODE_*` constants.
    pub mode: u8,
    /// Whether the player is on the ground.
    pub on_ground: bool,
    /// Runtime ID of the entity being ridden, or 0.
    pub ridden_entity_runtime_id: u64,
    /// Server tick of the move; zeroed by the proxy when re-broadcast so the
    /// client does not reject it as stale.
    pub tick: u64,
}

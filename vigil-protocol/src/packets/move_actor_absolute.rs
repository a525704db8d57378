//! Absolute entity position updates.

use glam::Vec3;

/// Move flag: the entity is on the ground.
pub const MOVE_ACTOR_FLAG_ON_GROUND: u8 = 1 << 0;
/// Move flag: the move is a teleport.
pub const MOVE_ACTOR_FLAG_TELEPORT: u8 = 1 << 1;

/// An entity moved to an absolute position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveActorAbsolute {
    /// Runtime ID of the moving entity.
    pub entity_runtime_id: u64,
    /// Bitset of `MOVE_ACTOR_FLAG_*` values.
    pub flags: u8,
    /// The new position.
    pub position: Vec3,
    /// The new rotation (pitch, head yaw, yaw) in degrees.
    pub rotation: Vec3,
}

impl MoveActorAbsolute {
    /// Returns whether the move is flagged as a teleport.
    #[must_use]
    pub const fn is_teleport(&self) -> bool {
        self.flags & MOVE_ACTOR_FLAG_TELEPORT != 0
    }
}

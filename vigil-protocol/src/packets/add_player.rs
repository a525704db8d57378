//! Player entity spawns.

use glam::Vec3;

use super::ActorMetadata;

/// Another player was spawned into the client's view.
#[derive(Clone, Debug)]
pub struct AddPlayer {
    /// The player's UUID as a string.
    pub uuid: String,
    /// The player's username.
    pub username: String,
    /// The player's runtime ID.
    pub entity_runtime_id: u64,
    /// Spawn position of the player's head.
    pub position: Vec3,
    /// Initial velocity.
    pub velocity: Vec3,
    /// Spawn pitch in degrees.
    pub pitch: f32,
    /// Spawn yaw in degrees.
    pub yaw: f32,
    /// Spawn head yaw in degrees.
    pub head_yaw: f32,
    /// Initial metadata.
    pub metadata: ActorMetadata,
}

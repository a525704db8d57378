//! Non-player entity spawns.

use glam::Vec3;

use super::ActorMetadata;

/// An entity was spawned into the client's view.
#[derive(Clone, Debug)]
pub struct AddActor {
    /// The entity's unique (persistent) ID.
    pub entity_unique_id: i64,
    /// The entity's runtime ID.
    pub entity_runtime_id: u64,
    /// Namespaced actor type, e.g. `minecraft:zombie`.
    pub actor_type: String,
    /// Spawn position.
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

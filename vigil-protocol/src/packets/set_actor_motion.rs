//! Server-initiated velocity impulses (knockback and similar).

use glam::Vec3;

/// An instantaneous velocity was applied to an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetActorMotion {
    /// Runtime ID of the affected entity.
    pub entity_runtime_id: u64,
    /// The velocity the client must adopt.
    pub velocity: Vec3,
    /// Server tick of the impulse.
    pub tick: u64,
}

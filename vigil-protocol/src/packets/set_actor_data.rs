//! Actor metadata updates.

use super::ActorMetadata;

/// An entity's metadata changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetActorData {
    /// Runtime ID of the affected entity.
    pub entity_runtime_id: u64,
    /// The changed metadata entries.
    pub metadata: ActorMetadata,
    /// Server tick of the change; zeroed by the proxy when re-broadcast.
    pub tick: u64,
}

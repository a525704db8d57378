//! Entity despawns.

/// An entity left the client's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveActor {
    /// The unique (persistent) ID of the removed entity.
    pub entity_unique_id: i64,
}

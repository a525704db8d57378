//! The client's requested view distance.

/// Sent by the client to request a chunk radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestChunkRadius {
    /// Requested radius, in chunks.
    pub chunk_radius: i32,
    /// The maximum radius the client will accept.
    pub max_chunk_radius: i32,
}

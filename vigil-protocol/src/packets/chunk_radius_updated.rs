//! The server's answer to a chunk radius request.

/// The effective chunk radius granted by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRadiusUpdated {
    /// Granted radius, in chunks.
    pub chunk_radius: i32,
}

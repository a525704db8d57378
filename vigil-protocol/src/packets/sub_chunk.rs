//! Individual sub-chunk payloads sent for incremental column updates.

use bytes::Bytes;
use glam::IVec3;

/// The sub-chunk entry decoded successfully.
pub const SUB_CHUNK_RESULT_SUCCESS: u8 = 1;
/// The sub-chunk entry is entirely air and carries no payload.
pub const SUB_CHUNK_RESULT_SUCCESS_ALL_AIR: u8 = 6;

/// One sub-chunk within a [`SubChunk`] batch.
#[derive(Clone, Debug)]
pub struct SubChunkEntry {
    /// Offset of this entry from the batch position, in sub-chunks.
    pub offset: [i8; 3],
    /// One of the `SUB_CHUNK_RESULT_*` constants.
    pub result: u8,
    /// The serialized sub-chunk payload.
    pub payload: Bytes,
}

/// A batch of sub-chunk payloads.
#[derive(Clone, Debug)]
pub struct SubChunk {
    /// Whether the payloads reference client-side cache blobs.
    pub cache_enabled: bool,
    /// Dimension the sub-chunks belong to.
    pub dimension: i32,
    /// Base position of the batch, in sub-chunks.
    pub position: IVec3,
    /// The entries in the batch.
    pub entries: Vec<SubChunkEntry>,
}

//! Full chunk column payloads.

use bytes::Bytes;

use super::ChunkPos;

/// Sub-chunk count sentinel: the payload covers a limited sub-chunk request.
pub const SUB_CHUNK_REQUEST_MODE_LIMITED: u32 = u32::MAX - 1;
/// Sub-chunk count sentinel: the payload covers a limitless sub-chunk request.
pub const SUB_CHUNK_REQUEST_MODE_LIMITLESS: u32 = u32::MAX;

/// A serialized chunk column sent to the client.
#[derive(Clone, Debug)]
pub struct LevelChunk {
    /// The column's coordinate, in chunks.
    pub position: ChunkPos,
    /// Number of sub-chunks in the payload, or one of the
    /// `SUB_CHUNK_REQUEST_MODE_*` sentinels.
    pub sub_chunk_count: u32,
    /// Whether the payload references client-side cache blobs. The proxy
    /// does not speak the cache protocol and rejects such chunks.
    pub cache_enabled: bool,
    /// The compressed column payload; decoding is delegated to the host's
    /// chunk codec.
    pub payload: Bytes,
}

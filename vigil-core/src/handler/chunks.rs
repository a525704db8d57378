//! World shadow maintenance.
//!
//! Chunk payloads are deferred through the acknowledgement engine so the
//! shadow only contains terrain the client has confirmed receiving; block
//! updates likewise. Columns the player walked away from are evicted every
//! input.

use vigil_protocol::packets::{
    ChunkPos, ClientPacket, ServerPacket, SUB_CHUNK_REQUEST_MODE_LIMITED,
    SUB_CHUNK_REQUEST_MODE_LIMITLESS,
};

use super::{Handler, PacketVerdict};
use crate::ack::AckCommand;
use crate::config::AuthorityMode;
use crate::error::HandlerError;
use crate::session::{DebugMode, Player};

/// Default view radius before the server grants one.
const DEFAULT_CHUNK_RADIUS: i32 = 8;

/// Maintains the per-player world shadow.
pub struct ChunksHandler {
    chunk_radius: i32,
}

impl ChunksHandler {
    /// Creates the handler with the default radius.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunk_radius: DEFAULT_CHUNK_RADIUS,
        }
    }
}

impl Default for ChunksHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ChunksHandler {
    fn id(&self) -> &'static str {
        "chunks"
    }

    fn handle_client(
        &mut self,
        packet: &mut ClientPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        match packet {
            ClientPacket::PlayerAuthInput(input) => {
                let center = ChunkPos::new(
                    (input.position.x / 16.0).floor() as i32,
                    (input.position.z / 16.0).floor() as i32,
                );
                player.world.clean_chunks(self.chunk_radius, center);
            }
            ClientPacket::RequestChunkRadius(req) => {
                self.chunk_radius = req.chunk_radius;
            }
            _ => {}
        }
        Ok(PacketVerdict::Continue)
    }

    fn handle_server(
        &mut self,
        packet: &mut ServerPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        match packet {
            ServerPacket::ChunkRadiusUpdated(update) => {
                self.chunk_radius = update.chunk_radius;
            }
            ServerPacket::UpdateBlock(update) => {
                player.acks.defer(AckCommand::SetBlock {
                    position: update.position,
                    runtime_id: update.new_block_runtime_id,
                });
            }
            ServerPacket::LevelChunk(chunk) => {
                // Limited sub-chunk request modes deliver terrain through
                // SubChunk packets instead; nothing to decode here.
                if chunk.sub_chunk_count == SUB_CHUNK_REQUEST_MODE_LIMITED
                    || chunk.sub_chunk_count == SUB_CHUNK_REQUEST_MODE_LIMITLESS
                {
                    return Ok(PacketVerdict::Continue);
                }
                if player.authority == AuthorityMode::None {
                    return Ok(PacketVerdict::Continue);
                }

                player.debug_message(
                    DebugMode::Chunks,
                    format!("queued chunk at {:?}", chunk.position),
                );
                player.acks.defer(AckCommand::DecodeChunk {
                    position: chunk.position,
                    sub_chunk_count: chunk.sub_chunk_count,
                    cache_enabled: chunk.cache_enabled,
                    payload: chunk.payload.clone(),
                });
            }
            ServerPacket::SubChunk(batch) => {
                if player.authority == AuthorityMode::None {
                    return Ok(PacketVerdict::Continue);
                }

                player.acks.defer(AckCommand::DecodeSubChunks {
                    position: batch.position,
                    entries: batch
                        .entries
                        .iter()
                        .map(|e| (e.offset, e.result, e.payload.clone()))
                        .collect(),
                    cache_enabled: batch.cache_enabled,
                });
            }
            _ => {}
        }
        Ok(PacketVerdict::Continue)
    }
}

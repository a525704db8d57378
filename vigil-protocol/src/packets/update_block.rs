//! Single-block world updates.

use glam::IVec3;

/// Update flag: notify neighbours of the change.
pub const BLOCK_UPDATE_NEIGHBOURS: u32 = 1 << 0;
/// Update flag: send the change to the network.
pub const BLOCK_UPDATE_NETWORK: u32 = 1 << 1;

/// A block changed at a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateBlock {
    /// The position of the changed block.
    pub position: IVec3,
    /// Runtime ID of the new block.
    pub new_block_runtime_id: u32,
    /// Bitset of `BLOCK_UPDATE_*` flags.
    pub flags: u32,
    /// The storage layer the change applies to; the proxy only tracks
    /// layer 0.
    pub layer: u32,
}

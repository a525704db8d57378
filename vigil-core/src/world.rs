//! The per-player world shadow.
//!
//! A faithful copy of the world state the client has been shown, assembled
//! from intercepted chunk and block packets. The movement simulation and the
//! combat checks query it instead of the upstream server so that the proxy
//! judges the player against the world the *client* can see.

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;
use vigil_protocol::packets::ChunkPos;
use vigil_utils::Aabb;

use crate::block::{BlockInfo, BlockTable, ChunkColumn, AIR_RUNTIME_ID};

/// Extra chunks kept beyond the view radius before eviction kicks in, so a
/// player walking along a chunk border does not thrash the store.
pub const CHUNK_EVICTION_SLACK: i32 = 4;

/// The shadow copy of the client-visible world.
pub struct WorldShadow {
    chunks: FxHashMap<ChunkPos, Box<dyn ChunkColumn>>,
    overrides: FxHashMap<IVec3, u32>,
}

impl WorldShadow {
    /// Creates an empty shadow.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: FxHashMap::default(),
            overrides: FxHashMap::default(),
        }
    }

    /// Returns the chunk coordinate containing the block position `pos`.
    #[must_use]
    pub fn chunk_pos_of(pos: IVec3) -> ChunkPos {
        ChunkPos::new(pos.x >> 4, pos.z >> 4)
    }

    /// Returns whether the column at `pos` has been received.
    #[must_use]
    pub fn chunk_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Inserts a decoded column, replacing any previous one. Per-block
    /// overrides inside the column are discarded; the new column is the
    /// fresher state.
    pub fn add_chunk(&mut self, pos: ChunkPos, column: Box<dyn ChunkColumn>) {
        self.overrides.retain(|p, _| Self::chunk_pos_of(*p) != pos);
        self.chunks.insert(pos, column);
    }

    /// The block runtime ID at `pos`. Unloaded positions are air.
    #[must_use]
    pub fn block_at(&self, pos: IVec3) -> u32 {
        if let Some(id) = self.overrides.get(&pos) {
            return *id;
        }
        match self.chunks.get(&Self::chunk_pos_of(pos)) {
            Some(column) => column.block((pos.x & 15) as u8, pos.y, (pos.z & 15) as u8),
            None => AIR_RUNTIME_ID,
        }
    }

    /// The properties of the block at `pos`.
    #[must_use]
    pub fn block_info_at(&self, pos: IVec3) -> &'static BlockInfo {
        BlockTable::global().info_or_air(self.block_at(pos))
    }

    /// Overrides a single block.
    pub fn set_block(&mut self, pos: IVec3, runtime_id: u32) {
        self.overrides.insert(pos, runtime_id);
    }

    /// Evicts every column outside the Chebyshev ball of
    /// `radius + CHUNK_EVICTION_SLACK` around `center`.
    pub fn clean_chunks(&mut self, radius: i32, center: ChunkPos) {
        let keep = radius + CHUNK_EVICTION_SLACK;
        self.chunks
            .retain(|pos, _| (pos.x - center.x).abs() <= keep && (pos.y - center.y).abs() <= keep);
        self.overrides
            .retain(|pos, _| {
                let cp = Self::chunk_pos_of(*pos);
                (cp.x - center.x).abs() <= keep && (cp.y - center.y).abs() <= keep
            });
    }

    /// Removes and returns the column at `pos`, for in-place sub-chunk
    /// folding.
    pub fn take_chunk(&mut self, pos: ChunkPos) -> Option<Box<dyn ChunkColumn>> {
        self.chunks.remove(&pos)
    }

    /// Number of stored columns.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Collects the positions and runtime IDs of every block whose cube
    /// intersects `aabb`.
    #[must_use]
    pub fn nearby_blocks(&self, aabb: &Aabb) -> Vec<(IVec3, u32)> {
        let mut out = Vec::new();
        self.for_blocks_in(aabb, |pos, id| out.push((pos, id)));
        out
    }

    /// Collects the collision boxes of every solid block whose cube
    /// intersects `aabb`.
    #[must_use]
    pub fn nearby_block_boxes(&self, aabb: &Aabb) -> Vec<Aabb> {
        let table = BlockTable::global();
        let mut out = Vec::new();
        self.for_blocks_in(aabb, |pos, id| {
            let info = table.info_or_air(id);
            if info.has_collision {
                let min = Vec3::new(pos.x as f32, pos.y as f32, pos.z as f32);
                let cube = Aabb::new(min, min + Vec3::new(1.0, info.collision_height, 1.0));
                if cube.intersects(aabb) {
                    out.push(cube);
                }
            }
        });
        out
    }

    /// Returns whether any block intersecting `aabb` is a liquid.
    #[must_use]
    pub fn touches_liquid(&self, aabb: &Aabb) -> bool {
        let table = BlockTable::global();
        let mut found = false;
        self.for_blocks_in(aabb, |_, id| {
            found |= table.info_or_air(id).liquid;
        });
        found
    }

    fn for_blocks_in(&self, aabb: &Aabb, mut f: impl FnMut(IVec3, u32)) {
        let min = aabb.min.floor().as_ivec3();
        let max = aabb.max.floor().as_ivec3();
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let pos = IVec3::new(x, y, z);
                    f(pos, self.block_at(pos));
                }
            }
        }
    }
}

impl Default for WorldShadow {
    fn default() -> Self {
        Self::new()
    }
}

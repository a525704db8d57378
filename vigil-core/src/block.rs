//! Interfaces to the host's block and chunk machinery.
//!
//! Block definitions and the chunk compression codec live in the host
//! library; the core only needs a handful of per-block properties, looked up
//! by runtime ID through a process-wide table that is populated once at
//! startup and immutable afterwards.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::error::ChunkDecodeError;

/// The runtime ID the table builder assigns to air.
pub const AIR_RUNTIME_ID: u32 = 0;

/// The properties of one block the anti-cheat consumes.
#[derive(Clone, Debug)]
pub struct BlockInfo {
    /// Namespaced block name, for log lines only.
    pub name: String,
    /// Per-block friction factor; multiplied by 0.6 while standing on the
    /// block. Defaults to 0.91, ice-like blocks are higher.
    pub friction_factor: f32,
    /// Whether the block can be climbed (ladders, vines).
    pub climbable: bool,
    /// Whether the block is a liquid.
    pub liquid: bool,
    /// Whether the block contributes a collision box.
    pub has_collision: bool,
    /// Height of the collision box; 1.0 for full cubes, 0.5 for slabs.
    pub collision_height: f32,
}

impl BlockInfo {
    /// A plain solid cube with default friction.
    #[must_use]
    pub fn solid(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friction_factor: 0.91,
            climbable: false,
            liquid: false,
            has_collision: true,
            collision_height: 1.0,
        }
    }

    /// A bottom slab: half-height collision volume.
    #[must_use]
    pub fn slab(name: impl Into<String>) -> Self {
        Self {
            collision_height: 0.5,
            ..Self::solid(name)
        }
    }

    /// A block without any collision volume.
    #[must_use]
    pub fn passable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friction_factor: 0.91,
            climbable: false,
            liquid: false,
            has_collision: false,
            collision_height: 0.0,
        }
    }

    /// A climbable, non-solid block.
    #[must_use]
    pub fn climbable(name: impl Into<String>) -> Self {
        Self {
            climbable: true,
            ..Self::passable(name)
        }
    }

    /// A liquid block.
    #[must_use]
    pub fn liquid(name: impl Into<String>) -> Self {
        Self {
            liquid: true,
            ..Self::passable(name)
        }
    }
}

/// The process-wide runtime-ID → block-properties table.
pub struct BlockTable {
    infos: FxHashMap<u32, BlockInfo>,
}

static TABLE: OnceLock<BlockTable> = OnceLock::new();

impl BlockTable {
    /// Creates an empty table containing only air.
    #[must_use]
    pub fn new() -> Self {
        let mut infos = FxHashMap::default();
        infos.insert(AIR_RUNTIME_ID, BlockInfo::passable("minecraft:air"));
        Self { infos }
    }

    /// Registers a block under `runtime_id`, replacing any previous entry.
    pub fn insert(&mut self, runtime_id: u32, info: BlockInfo) {
        self.infos.insert(runtime_id, info);
    }

    /// Installs `table` as the process-wide table. Returns an error if a
    /// table was already installed.
    pub fn init(table: Self) -> Result<(), Self> {
        TABLE.set(table)
    }

    /// Returns the process-wide table.
    ///
    /// # Panics
    ///
    /// Panics if [`BlockTable::init`] has not run; the host must install the
    /// table before accepting connections.
    #[must_use]
    pub fn global() -> &'static Self {
        TABLE.get().expect("block table must be initialized at startup")
    }

    /// Looks up the properties of `runtime_id`.
    #[must_use]
    pub fn info(&self, runtime_id: u32) -> Option<&BlockInfo> {
        self.infos.get(&runtime_id)
    }

    /// Looks up `runtime_id`, logging and substituting air for IDs the host
    /// never registered.
    #[must_use]
    pub fn info_or_air(&self, runtime_id: u32) -> &BlockInfo {
        self.infos.get(&runtime_id).unwrap_or_else(|| {
            log::error!("unable to find block with runtime ID {runtime_id}");
            &self.infos[&AIR_RUNTIME_ID]
        })
    }
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded chunk column, queried by block position.
///
/// Implementations come from the host's chunk library; the core never looks
/// inside them beyond this interface.
pub trait ChunkColumn: Send {
    /// The block runtime ID at column-local `x`/`z` (0..16) and world `y`.
    /// Out-of-range positions return air.
    fn block(&self, x: u8, y: i32, z: u8) -> u32;
}

/// The host's chunk payload decoder.
pub trait ChunkCodec: Send + Sync {
    /// Decodes a serialized column into a queryable one. `scratch` is pool
    /// memory the decoder may use freely; the caller returns it to the pool.
    fn decode(
        &self,
        payload: &[u8],
        sub_chunk_count: u32,
        scratch: &mut Vec<u8>,
    ) -> Result<Box<dyn ChunkColumn>, ChunkDecodeError>;

    /// Folds one serialized sub-chunk into `column` (a fresh all-air column
    /// when `None`) at vertical sub-chunk index `y_index`. An empty payload
    /// fills the sub-chunk with air.
    fn apply_sub_chunk(
        &self,
        column: Option<Box<dyn ChunkColumn>>,
        y_index: i8,
        payload: &[u8],
        scratch: &mut Vec<u8>,
    ) -> Result<Box<dyn ChunkColumn>, ChunkDecodeError>;
}

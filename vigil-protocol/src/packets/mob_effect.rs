//! Status effect changes.

/// An effect was added.
pub const MOB_EFFECT_ADD: u8 = 1;
/// An existing effect was modified.
pub const MOB_EFFECT_MODIFY: u8 = 2;
/// An effect was removed.
pub const MOB_EFFECT_REMOVE: u8 = 3;

/// Effect ID for speed.
pub const EFFECT_SPEED: i32 = 1;
/// Effect ID for slowness.
pub const EFFECT_SLOWNESS: i32 = 2;
/// Effect ID for jump boost.
pub const EFFECT_JUMP_BOOST: i32 = 3;

/// A status effect changed on an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MobEffect {
    /// Runtime ID of the affected entity.
    pub entity_runtime_id: u64,
    /// One of the `MOB_EFFECT_*` operations.
    pub operation: u8,
    /// The effect type identifier.
    pub effect_type: i32,
    /// Effect amplifier, zero-based.
    pub amplifier: i32,
    /// Remaining duration in ticks.
    pub duration: i32,
    /// Server tick of the change.
    pub tick: u64,
}

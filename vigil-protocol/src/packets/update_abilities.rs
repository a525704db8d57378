//! Player ability synchronization.

/// The ability state of a player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateAbilities {
    /// Unique ID of the affected player.
    pub entity_unique_id: i64,
    /// Whether the player is currently flying.
    pub flying: bool,
    /// Whether the player may toggle flight.
    pub may_fly: bool,
    /// Whether the player clips through blocks.
    pub no_clip: bool,
    /// Flight speed, per tick.
    pub fly_speed: f32,
    /// Walk speed, per tick.
    pub walk_speed: f32,
}

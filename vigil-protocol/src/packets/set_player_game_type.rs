//! Game mode changes.

/// Survival mode.
pub const GAME_TYPE_SURVIVAL: i32 = 0;
/// Creative mode.
pub const GAME_TYPE_CREATIVE: i32 = 1;
/// Adventure mode.
pub const GAME_TYPE_ADVENTURE: i32 = 2;
/// Spectator mode.
pub const GAME_TYPE_SPECTATOR: i32 = 6;

/// The player's game mode changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetPlayerGameType {
    /// One of the `GAME_TYPE_*` constants.
    pub game_type: i32,
}

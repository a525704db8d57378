//! The world-join packet, carrying the movement authority settings the
//! proxy depends on.

use glam::Vec3;

/// The movement authority mode granted to the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerMovementMode {
    /// The client is trusted with its own movement.
    Client,
    /// The server simulates movement; no rewind support.
    Server,
    /// The server simulates movement and the client supports rewind
    /// corrections. Required by the proxy.
    ServerWithRewind,
}

/// Movement-related settings sent on world join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerMovementSettings {
    /// The authority mode the client must use.
    pub movement_type: PlayerMovementMode,
    /// Number of simulation frames the client keeps for rewinding.
    pub rewind_history_size: i32,
    /// Whether block breaking is server-authoritative.
    pub server_authoritative_block_breaking: bool,
}

/// The subset of the world-join packet the proxy consumes.
#[derive(Clone, Debug)]
pub struct StartGame {
    /// The joining player's unique ID.
    pub entity_unique_id: i64,
    /// The joining player's runtime ID.
    pub entity_runtime_id: u64,
    /// The player's initial game mode.
    pub player_game_mode: i32,
    /// The player's initial head position.
    pub player_position: Vec3,
    /// Initial pitch in degrees.
    pub pitch: f32,
    /// Initial yaw in degrees.
    pub yaw: f32,
    /// The movement settings, overridden by the proxy before forwarding.
    pub movement_settings: PlayerMovementSettings,
}

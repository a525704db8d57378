//! The client's per-tick authoritative input report.
//!
//! Sent once per client simulation frame in server-authoritative movement
//! modes. Carries the held inputs, the client's predicted position and
//! movement delta, and the client's simulation frame counter. The entire
//! per-player tick pipeline is driven off this packet.

use glam::{Vec2, Vec3};

/// Input-flag bit indices for [`PlayerAuthInput::input_data`].
pub mod input_flags {
    /// The jump key is held this frame.
    pub const JUMP_DOWN: u64 = 1 << 3;
    /// The sprint key is held this frame.
    pub const SPRINT_DOWN: u64 = 1 << 4;
    /// The client considers itself jumping.
    pub const JUMPING: u64 = 1 << 6;
    /// The client considers itself sneaking.
    pub const SNEAKING: u64 = 1 << 8;
    /// The sneak key is held this frame.
    pub const SNEAK_DOWN: u64 = 1 << 9;
    /// The client considers itself sprinting.
    pub const SPRINTING: u64 = 1 << 20;
    /// Sprinting began this frame.
    pub const START_SPRINTING: u64 = 1 << 25;
    /// Sprinting ended this frame.
    pub const STOP_SPRINTING: u64 = 1 << 26;
    /// Sneaking began this frame.
    pub const START_SNEAKING: u64 = 1 << 27;
    /// Sneaking ended this frame.
    pub const STOP_SNEAKING: u64 = 1 << 28;
    /// A jump was initiated this frame.
    pub const START_JUMPING: u64 = 1 << 31;
    /// The client swung at air without hitting an entity.
    pub const MISSED_SWING: u64 = 1 << 39;
}

/// Input mode for touch-screen clients; swing handling differs there.
pub const INPUT_MODE_TOUCH: u32 = 2;

/// The client's authoritative input packet, one per simulation frame.
#[derive(Clone, Debug)]
pub struct PlayerAuthInput {
    /// Camera pitch in degrees.
    pub pitch: f32,
    /// Camera yaw in degrees.
    pub yaw: f32,
    /// Head yaw in degrees; can differ from `yaw` on some input modes.
    pub head_yaw: f32,
    /// The client's eye position.
    pub position: Vec3,
    /// Raw directional input: X is strafe, Y is forward, both in [-1, 1].
    pub move_vector: Vec2,
    /// Bitset of [`input_flags`] values held or edge-triggered this frame.
    pub input_data: u64,
    /// The device input mode the client reports.
    pub input_mode: u32,
    /// The movement delta the client predicted for this frame.
    pub delta: Vec3,
    /// The client's simulation frame counter.
    pub tick: u64,
}

impl PlayerAuthInput {
    /// Returns whether `flag` (one of [`input_flags`]) is set.
    #[must_use]
    pub const fn has_flag(&self, flag: u64) -> bool {
        self.input_data & flag != 0
    }
}

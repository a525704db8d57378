//! Movement prediction corrections.
//!
//! In the server-with-rewind movement mode the client accepts this packet,
//! rewinds its local simulation to `tick` and replays its inputs from the
//! corrected state.

use glam::Vec3;

/// A correction of the client's predicted movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrectPlayerMovePrediction {
    /// The authoritative head position.
    pub position: Vec3,
    /// The authoritative velocity.
    pub delta: Vec3,
    /// Whether the player is on the ground at the corrected position.
    pub on_ground: bool,
    /// The client simulation frame the correction applies to.
    pub tick: u64,
}

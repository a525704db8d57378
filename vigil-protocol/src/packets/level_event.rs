//! Generic world events (particles, sounds, simulation control).

use glam::Vec3;

/// A world event at a position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelEvent {
    /// The event type identifier.
    pub event_type: i32,
    /// Position of the event; some event types reuse this as a data field.
    pub position: Vec3,
    /// Extra event data.
    pub event_data: i32,
}

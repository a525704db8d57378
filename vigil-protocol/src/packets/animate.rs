//! Animation notifications; arm swings feed the click tracker.

/// The animate action for an arm swing.
pub const ANIMATE_ACTION_SWING_ARM: i32 = 1;

/// An entity animation event sent by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Animate {
    /// The animation performed.
    pub action_type: i32,
    /// Runtime ID of the animating entity.
    pub entity_runtime_id: u64,
}

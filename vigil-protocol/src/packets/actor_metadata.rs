//! The slice of actor metadata the anti-cheat consumes.
//!
//! The full metadata dictionary is a heterogeneous key/value map; the
//! transport layer projects the handful of keys the proxy cares about into
//! this struct and drops the rest.

/// Actor data flag: the actor cannot move.
pub const DATA_FLAG_IMMOBILE: i64 = 1 << 16;

/// Typed view over an actor metadata dictionary.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActorMetadata {
    /// The actor flag bitset, if present in the dictionary.
    pub flags: Option<i64>,
    /// Bounding box width override.
    pub bounding_box_width: Option<f32>,
    /// Bounding box height override.
    pub bounding_box_height: Option<f32>,
    /// Actor scale override.
    pub scale: Option<f32>,
}

impl ActorMetadata {
    /// Returns whether `flag` is present and set in the flag bitset.
    #[must_use]
    pub fn has_flag(&self, flag: i64) -> bool {
        self.flags.is_some_and(|f| f & flag != 0)
    }
}

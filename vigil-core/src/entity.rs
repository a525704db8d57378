//! Tracking of non-self entities and their position history.
//!
//! Combat checks must reconstruct where an entity was at the tick a laggy
//! client believed it attacked. Every tracked entity keeps a fixed-capacity
//! ring of `(tick, position)` samples recorded once per server tick; the
//! rewind lookup walks it backwards.

use glam::Vec3;
use rustc_hash::FxHashMap;
use vigil_utils::Aabb;

/// Default number of position samples kept per entity.
pub const DEFAULT_HISTORY_CAPACITY: usize = 6;

/// Upper bound on the configurable history capacity, matching the rewind
/// history size forced onto the client.
pub const MAX_HISTORY_CAPACITY: usize = 100;

/// Eye height of a player entity; player history samples are stored at foot
/// level by subtracting this from the server-sent position.
pub const PLAYER_EYE_HEIGHT: f32 = 1.62;

/// One historical position sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoricalPosition {
    /// The server tick the sample was taken at.
    pub tick: u64,
    /// The entity's position at that tick.
    pub position: Vec3,
}

/// A fixed-capacity ring of position samples, ordered by tick.
#[derive(Clone, Debug)]
pub struct HistoryRing {
    samples: std::collections::VecDeque<HistoricalPosition>,
    capacity: usize,
}

impl HistoryRing {
    /// Creates a ring holding at most `capacity` samples, clamped to
    /// [`MAX_HISTORY_CAPACITY`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HISTORY_CAPACITY);
        Self {
            samples: std::collections::VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a sample, evicting the oldest one once full. Samples must
    /// arrive with non-decreasing ticks; a stale tick is ignored.
    pub fn push(&mut self, tick: u64, position: Vec3) {
        if self.samples.back().is_some_and(|s| tick < s.tick) {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(HistoricalPosition { tick, position });
    }

    /// Returns the position with the greatest sample tick `<= tick`, or the
    /// oldest sample when `tick` predates the whole ring.
    #[must_use]
    pub fn rewind(&self, tick: u64) -> Option<Vec3> {
        if let Some(s) = self.samples.iter().rev().find(|s| s.tick <= tick) {
            return Some(s.position);
        }
        self.samples.front().map(|s| s.position)
    }

    /// Number of samples currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns whether the ring holds no samples yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The oldest sample in the ring.
    #[must_use]
    pub fn oldest(&self) -> Option<&HistoricalPosition> {
        self.samples.front()
    }
}

/// A non-self entity mirrored from intercepted spawn and move packets.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Whether this entity is a player; player positions arrive at eye level
    /// and are stored at foot level.
    pub is_player: bool,
    /// Current (foot) position.
    pub position: Vec3,
    /// Last velocity impulse the server sent for this entity.
    pub recv_velocity: Vec3,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
    /// Model scale applied to the bounding box.
    pub scale: f32,
    /// The position history backing rewind lookups.
    pub history: HistoryRing,
}

impl Entity {
    /// Creates an entity at `position` with the default humanoid bounds.
    #[must_use]
    pub fn new(position: Vec3, velocity: Vec3, history_capacity: usize, is_player: bool) -> Self {
        let position = if is_player {
            position - Vec3::new(0.0, PLAYER_EYE_HEIGHT, 0.0)
        } else {
            position
        };
        Self {
            is_player,
            position,
            recv_velocity: velocity,
            width: 0.6,
            height: 1.8,
            scale: 1.0,
            history: HistoryRing::new(history_capacity),
        }
    }

    /// The entity's bounding box at `at` (foot position).
    #[must_use]
    pub fn aabb_at(&self, at: Vec3) -> Aabb {
        Aabb::from_dimensions(self.width * self.scale, self.height * self.scale).translate(at)
    }

    /// Moves the entity. Player positions arrive at eye level.
    pub fn move_to(&mut self, position: Vec3) {
        self.position = if self.is_player {
            position - Vec3::new(0.0, PLAYER_EYE_HEIGHT, 0.0)
        } else {
            position
        };
    }

    /// Records the current position into the history ring.
    pub fn tick(&mut self, tick: u64) {
        self.history.push(tick, self.position);
    }
}

/// All entities visible to one player session.
pub struct EntityTracker {
    entities: FxHashMap<u64, Entity>,
    history_capacity: usize,
}

impl EntityTracker {
    /// Creates a tracker whose entities keep `history_capacity` samples.
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            entities: FxHashMap::default(),
            history_capacity: history_capacity.clamp(1, MAX_HISTORY_CAPACITY),
        }
    }

    /// The history capacity new entities are created with.
    #[must_use]
    pub const fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    /// Inserts `entity` under `runtime_id`, replacing any previous entry.
    pub fn add_entity(&mut self, runtime_id: u64, entity: Entity) {
        debug_assert_ne!(runtime_id, 0, "entity runtime IDs are non-zero");
        self.entities.insert(runtime_id, entity);
    }

    /// Removes the entity under `runtime_id`.
    pub fn remove_entity(&mut self, runtime_id: u64) {
        self.entities.remove(&runtime_id);
    }

    /// Looks up an entity.
    #[must_use]
    pub fn find(&self, runtime_id: u64) -> Option<&Entity> {
        self.entities.get(&runtime_id)
    }

    /// Looks up an entity mutably.
    #[must_use]
    pub fn find_mut(&mut self, runtime_id: u64) -> Option<&mut Entity> {
        self.entities.get_mut(&runtime_id)
    }

    /// Records a history sample for every entity at `tick`.
    pub fn tick(&mut self, tick: u64) {
        for entity in self.entities.values_mut() {
            entity.tick(tick);
        }
    }

    /// Reconstructs the (foot) position of `runtime_id` at `tick`.
    #[must_use]
    pub fn rewind_position(&self, runtime_id: u64, tick: u64) -> Option<Vec3> {
        self.find(runtime_id)?.history.rewind(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_evicts_oldest_at_capacity() {
        let mut ring = HistoryRing::new(3);
        for t in 0..5u64 {
            ring.push(t, Vec3::splat(t as f32));
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.oldest().unwrap().tick, 2);
    }

    #[test]
    fn ring_ignores_stale_ticks() {
        let mut ring = HistoryRing::new(4);
        ring.push(10, Vec3::ZERO);
        ring.push(9, Vec3::ONE);
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn rewind_picks_greatest_tick_at_or_before() {
        let mut ring = HistoryRing::new(8);
        ring.push(10, Vec3::splat(1.0));
        ring.push(12, Vec3::splat(2.0));
        ring.push(14, Vec3::splat(3.0));
        assert_eq!(ring.rewind(13), Some(Vec3::splat(2.0)));
        assert_eq!(ring.rewind(14), Some(Vec3::splat(3.0)));
        // Before the whole ring: the oldest sample wins.
        assert_eq!(ring.rewind(3), Some(Vec3::splat(1.0)));
    }

    #[test]
    fn player_positions_are_stored_at_foot_level() {
        let e = Entity::new(Vec3::new(0.0, 66.62, 0.0), Vec3::ZERO, 6, true);
        assert!((e.position.y - 65.0).abs() < 1e-6);

        let mut tracker = EntityTracker::new(6);
        tracker.add_entity(7, e);
        tracker.tick(1);
        let pos = tracker.rewind_position(7, 1).unwrap();
        assert!((pos.y - 65.0).abs() < 1e-6);
    }
}
